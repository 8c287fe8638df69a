use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use rand::Rng;
use sqlx::{Pool, Sqlite};
use tracing::{info, instrument, warn};

use crate::db::{
    find_log_by_date, get_log, get_question, insert_log, list_logs, list_questions_by_day,
    update_log_questions,
};
use crate::error::AppError;
use crate::models::{
    AssignmentLog, LogReview, LogSummary, LoggedQuestion, Question, ReviewedQuestion,
    CANONICAL_UNAVAILABLE, NOT_SUBMITTED,
};
use crate::schedule::{parse_weekday, plan_for, weekday_name, AnswerInput, DayPlan};

#[derive(Debug)]
pub enum Generation {
    RestDay,
    AlreadyGenerated(AssignmentLog),
    Created(AssignmentLog),
}

impl Generation {
    pub fn log(&self) -> Option<&AssignmentLog> {
        match self {
            Generation::RestDay => None,
            Generation::AlreadyGenerated(log) | Generation::Created(log) => Some(log),
        }
    }
}

/// Picks `count` distinct questions uniformly at random. The caller
/// guarantees `count <= bank.len()`.
pub fn draw_questions<R: Rng + ?Sized>(
    bank: &[Question],
    count: usize,
    rng: &mut R,
) -> Vec<LoggedQuestion> {
    rand::seq::index::sample(rng, bank.len(), count)
        .into_iter()
        .map(|idx| LoggedQuestion::unanswered(&bank[idx]))
        .collect()
}

/// Creates the assignment for `date` unless it is a rest day or one already
/// exists. Calling it again for the same date never reshuffles.
#[instrument(skip(pool))]
pub async fn generate_for_date(
    pool: &Pool<Sqlite>,
    date: NaiveDate,
) -> Result<Generation, AppError> {
    let plan = plan_for(date.weekday());
    if plan.is_rest_day() {
        info!(weekday = plan.name, "Rest day, nothing to generate");
        return Ok(Generation::RestDay);
    }

    if let Some(existing) = find_log_by_date(pool, date).await? {
        return Ok(Generation::AlreadyGenerated(existing));
    }

    let bank = list_questions_by_day(pool, plan.name).await?;
    if bank.len() < plan.count {
        return Err(AppError::InsufficientBank {
            weekday: plan.name.to_string(),
            available: bank.len(),
            required: plan.count,
        });
    }

    let selected = draw_questions(&bank, plan.count, &mut rand::rng());

    match insert_log(pool, date, plan.name, &selected).await? {
        Some(id) => {
            info!(log_id = id, count = selected.len(), "Generated assignment");
            let log = get_log(pool, id)
                .await?
                .ok_or_else(|| AppError::Internal(format!("Log {} vanished after insert", id)))?;
            Ok(Generation::Created(log))
        }
        None => {
            warn!("Assignment for this date was created concurrently");
            let existing = find_log_by_date(pool, date).await?.ok_or_else(|| {
                AppError::Internal(format!("Log for {} missing after conflict", date))
            })?;
            Ok(Generation::AlreadyGenerated(existing))
        }
    }
}

/// Answers posted for a log, keyed by 1-based question position.
#[derive(Debug, Default, Clone)]
pub struct AnswerSubmission {
    pub answers: HashMap<usize, String>,
    pub upload: Option<String>,
}

impl AnswerSubmission {
    fn answer_at(&self, position: usize) -> &str {
        self.answers
            .get(&position)
            .map(|answer| answer.trim())
            .unwrap_or_default()
    }
}

/// Applies a submission to the stored questions, keeping their order.
/// A blank answer never replaces one that already holds text.
pub fn fill_answers(
    questions: Vec<LoggedQuestion>,
    submission: &AnswerSubmission,
    input: AnswerInput,
) -> Vec<LoggedQuestion> {
    let upload = match input {
        AnswerInput::Upload => submission.upload.as_deref().filter(|name| !name.is_empty()),
        AnswerInput::Text => None,
    };

    questions
        .into_iter()
        .enumerate()
        .map(|(idx, mut question)| {
            let typed = submission.answer_at(idx + 1);
            let answer = match upload {
                Some(name) => format!("File uploaded: {}", name),
                None if !typed.is_empty() => typed.to_string(),
                None if question.is_answered() && question.submitted_answer != NOT_SUBMITTED => {
                    question.submitted_answer.clone()
                }
                None => NOT_SUBMITTED.to_string(),
            };
            question.submitted_answer = answer;
            question
        })
        .collect()
}

fn plan_of(log: &AssignmentLog) -> &'static DayPlan {
    plan_for(log.date_given.weekday())
}

#[instrument(skip(pool, submission))]
pub async fn submit_answers(
    pool: &Pool<Sqlite>,
    log_id: i64,
    submission: &AnswerSubmission,
) -> Result<AssignmentLog, AppError> {
    let mut log = get_log(pool, log_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Assignment log {} not found", log_id)))?;

    let input = plan_of(&log).input();
    log.questions = fill_answers(std::mem::take(&mut log.questions), submission, input);
    update_log_questions(pool, log.id, &log.questions).await?;

    info!(log_id, "Answers recorded");
    Ok(log)
}

#[instrument(skip(pool))]
pub async fn list_history(pool: &Pool<Sqlite>) -> Result<Vec<LogSummary>, AppError> {
    let logs = list_logs(pool).await?;
    Ok(logs.iter().map(LogSummary::from).collect())
}

#[instrument(skip(pool))]
pub async fn review_log(pool: &Pool<Sqlite>, log_id: i64) -> Result<LogReview, AppError> {
    let log = get_log(pool, log_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Log {} not found", log_id)))?;

    let mut questions = Vec::with_capacity(log.questions.len());
    for (idx, logged) in log.questions.iter().enumerate() {
        let correct_answer = match get_question(pool, logged.id).await? {
            Some(original) => original.canonical_answer,
            None => CANONICAL_UNAVAILABLE.to_string(),
        };
        questions.push(ReviewedQuestion {
            position: idx + 1,
            id: logged.id,
            text: logged.text.clone(),
            submitted_answer: logged.submitted_answer.clone(),
            correct_answer,
        });
    }

    let day_type = parse_weekday(&log.day_of_week)
        .map(|weekday| plan_for(weekday).kind)
        .unwrap_or_else(|| plan_of(&log).kind);

    Ok(LogReview {
        id: log.id,
        date_given: log.date_given,
        is_answered: log.is_answered(),
        day_of_week: log.day_of_week,
        day_type: day_type.to_string(),
        questions,
    })
}

#[derive(Debug)]
pub enum TodayView {
    RestDay {
        day_name: &'static str,
    },
    NotGenerated {
        day_name: &'static str,
    },
    Ready {
        day_name: &'static str,
        log_id: i64,
        questions: Vec<LoggedQuestion>,
        input: AnswerInput,
        placeholder: &'static str,
        is_submitted: bool,
    },
}

/// What the student should see for `date`. Rest days never touch the store.
#[instrument(skip(pool))]
pub async fn today_view(pool: &Pool<Sqlite>, date: NaiveDate) -> Result<TodayView, AppError> {
    let plan = plan_for(date.weekday());
    let day_name = weekday_name(date.weekday());

    if plan.is_rest_day() {
        return Ok(TodayView::RestDay { day_name });
    }

    match find_log_by_date(pool, date).await? {
        None => Ok(TodayView::NotGenerated { day_name }),
        Some(log) => Ok(TodayView::Ready {
            day_name,
            log_id: log.id,
            is_submitted: log.is_answered(),
            questions: log.questions,
            input: plan.input(),
            placeholder: plan.placeholder,
        }),
    }
}
