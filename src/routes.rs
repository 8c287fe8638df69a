use std::collections::HashMap;

use chrono::Datelike;
use rocket::form::Form;
use rocket::fs::TempFile;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::response::Redirect;
use rocket::{Request, State};
use rocket_dyn_templates::{context, Template};
use sqlx::{Pool, Sqlite};
use tracing::info;

use crate::config::AppConfig;
use crate::db::find_log_by_date;
use crate::error::AppError;
use crate::homework::{
    generate_for_date, list_history, review_log, submit_answers, today_view, AnswerSubmission,
    Generation, TodayView,
};
use crate::models::LoggedQuestion;
use crate::schedule::{plan_for, week, weekday_name, AnswerInput, DayPlan};

pub const REST_DAY_MESSAGE: &str = "🎉 Today is a rest day! Enjoy your break.";

#[get("/")]
pub async fn home(
    db: &State<Pool<Sqlite>>,
    config: &State<AppConfig>,
) -> Result<Template, AppError> {
    let today = config.today();
    let is_generated = find_log_by_date(db, today).await?.is_some();
    let schedule: Vec<&DayPlan> = week().collect();

    Ok(Template::render(
        "home",
        context! {
            title: "Daily Homework",
            student_name: &config.student_name,
            day_name: weekday_name(today.weekday()),
            date_str: today.format("%d %B, %Y").to_string(),
            is_generated: is_generated,
            day_config: plan_for(today.weekday()),
            schedule: schedule,
        },
    ))
}

#[post("/generate_questions")]
pub async fn generate_questions(
    db: &State<Pool<Sqlite>>,
    config: &State<AppConfig>,
) -> Result<Redirect, AppError> {
    let generation = generate_for_date(db, config.today()).await?;
    if let Some(log) = generation.log() {
        info!(
            log_id = log.id,
            created = matches!(generation, Generation::Created(_)),
            "Assignment ready"
        );
    }

    Ok(Redirect::to(uri!(today)))
}

#[derive(Responder)]
pub enum TodayResponse {
    Page(Template),
    Redirect(Redirect),
}

fn homework_page(
    day_name: &str,
    message: Option<&str>,
    log_id: Option<i64>,
    questions: &[LoggedQuestion],
    input: AnswerInput,
    placeholder: &str,
    is_submitted: bool,
) -> Template {
    Template::render(
        "homework",
        context! {
            title: format!("{} Homework", day_name),
            day_name: day_name,
            message: message.unwrap_or_default(),
            log_id: log_id.unwrap_or_default(),
            questions: questions,
            input_type: if input == AnswerInput::Upload { "file" } else { "textarea" },
            placeholder: placeholder,
            is_submitted: is_submitted,
        },
    )
}

#[get("/today")]
pub async fn today(
    db: &State<Pool<Sqlite>>,
    config: &State<AppConfig>,
) -> Result<TodayResponse, AppError> {
    let page = match today_view(db, config.today()).await? {
        TodayView::RestDay { day_name } => homework_page(
            day_name,
            Some(REST_DAY_MESSAGE),
            None,
            &[],
            AnswerInput::Text,
            "",
            false,
        ),
        TodayView::NotGenerated { .. } => {
            return Ok(TodayResponse::Redirect(Redirect::to(uri!(home))));
        }
        TodayView::Ready {
            day_name,
            log_id,
            questions,
            input,
            placeholder,
            is_submitted,
        } => homework_page(
            day_name,
            None,
            Some(log_id),
            &questions,
            input,
            placeholder,
            is_submitted,
        ),
    };

    Ok(TodayResponse::Page(page))
}

/// Posted homework sheet. Answers arrive as `answer[<position>]`.
#[derive(FromForm)]
pub struct AnswerSheet<'r> {
    answer: HashMap<usize, String>,
    file: Option<TempFile<'r>>,
}

/// Last path component of a client-supplied file name, as the student sent it.
pub fn base_file_name(raw: &str) -> Option<&str> {
    raw.rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .map(str::trim)
        .filter(|name| !name.is_empty())
}

fn upload_name(file: &TempFile<'_>) -> Option<String> {
    if file.len() == 0 {
        return None;
    }
    let raw = file.raw_name()?.dangerous_unsafe_unsanitized_raw().as_str();
    base_file_name(raw).map(String::from)
}

#[post("/submit_answers/<log_id>", data = "<sheet>")]
pub async fn submit_answers_route(
    log_id: i64,
    sheet: Form<AnswerSheet<'_>>,
    db: &State<Pool<Sqlite>>,
) -> Result<Redirect, AppError> {
    let sheet = sheet.into_inner();
    let submission = AnswerSubmission {
        upload: sheet.file.as_ref().and_then(upload_name),
        answers: sheet.answer,
    };

    submit_answers(db, log_id, &submission).await?;
    Ok(Redirect::to(uri!(today)))
}

#[get("/record")]
pub async fn record_menu(db: &State<Pool<Sqlite>>) -> Result<Template, AppError> {
    let logs = list_history(db).await?;

    Ok(Template::render(
        "record",
        context! {
            title: "Homework Record",
            logs: logs,
        },
    ))
}

#[get("/record/<log_id>")]
pub async fn view_record(db: &State<Pool<Sqlite>>, log_id: i64) -> Result<Template, AppError> {
    let review = review_log(db, log_id).await?;

    Ok(Template::render(
        "view_record",
        context! {
            title: format!("Homework for {}", review.date_given),
            log: review,
        },
    ))
}

#[catch(404)]
pub fn not_found(_req: &Request) -> Custom<Template> {
    Custom(
        Status::NotFound,
        Template::render(
            "error",
            context! {
                title: "Not Found",
                message: "404 - Page Not Found. Did you take a wrong turn?",
            },
        ),
    )
}

#[catch(500)]
pub fn internal_error(_req: &Request) -> Custom<Template> {
    Custom(
        Status::InternalServerError,
        Template::render(
            "error",
            context! {
                title: "Error",
                message: "Something went wrong while handling your request.",
            },
        ),
    )
}
