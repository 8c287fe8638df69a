use crate::error::AppError;
use crate::models::{AssignmentLog, DbAssignmentLog, DbQuestion, LoggedQuestion, Question};
use crate::schedule::{week, DayPlan};
use chrono::NaiveDate;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::types::Json;
use sqlx::{Executor, Pool, Sqlite};
use std::str::FromStr;
use tracing::{info, instrument};

/// Questions generated per non-rest weekday on first start.
pub const SEED_PER_DAY: usize = 110;
/// Below this many rows in total the bank is considered unpopulated.
pub const SEED_THRESHOLD: i64 = 500;

#[instrument]
pub async fn connect(database_url: &str) -> Result<Pool<Sqlite>, AppError> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Applies pending migrations and seeds the question bank.
#[instrument(skip(pool))]
pub async fn prepare_database(pool: &Pool<Sqlite>) -> Result<(), AppError> {
    info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Migrations completed successfully");

    seed_if_empty(pool).await?;
    Ok(())
}

#[instrument(skip(pool))]
pub async fn count_questions(pool: &Pool<Sqlite>) -> Result<i64, AppError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM questions")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

#[instrument(skip(executor, text, answer))]
pub async fn insert_question<'e, E>(
    executor: E,
    day_type: &str,
    text: &str,
    answer: &str,
) -> Result<i64, AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let res =
        sqlx::query("INSERT INTO questions (day_type, question_text, answer) VALUES (?, ?, ?)")
            .bind(day_type)
            .bind(text)
            .bind(answer)
            .execute(executor)
            .await?;

    Ok(res.last_insert_rowid())
}

fn seed_question(plan: &DayPlan, ordinal: usize) -> (String, String) {
    let prefix = format!("[{} - {}] Q{}:", plan.name, plan.kind, ordinal);
    let text = match plan.name {
        "Thursday" => format!(
            "{} Draw and label the structure of a neuron. (QID:{})",
            prefix, ordinal
        ),
        "Friday" => format!(
            "{} Observe the burning of magnesium ribbon and list two observations. (QID:{})",
            prefix, ordinal
        ),
        _ => format!("{} What is the role of mitochondria in a cell?", prefix),
    };
    let answer = format!(
        "Mitochondria are the powerhouse of the cell, generating ATP through cellular respiration. (Answer {})",
        ordinal
    );
    (text, answer)
}

/// Fills the bank when it holds fewer than [`SEED_THRESHOLD`] rows. Returns
/// how many questions were inserted, zero when the bank was already populated.
#[instrument(skip(pool))]
pub async fn seed_if_empty(pool: &Pool<Sqlite>) -> Result<u64, AppError> {
    let existing = count_questions(pool).await?;
    if existing >= SEED_THRESHOLD {
        info!(existing, "Question bank already populated");
        return Ok(0);
    }

    info!(existing, "Populating initial question bank");
    let mut tx = pool.begin().await?;
    let mut inserted = 0;

    for plan in week().filter(|plan| !plan.is_rest_day()) {
        for ordinal in 1..=SEED_PER_DAY {
            let (text, answer) = seed_question(plan, ordinal);
            insert_question(&mut *tx, plan.name, &text, &answer).await?;
            inserted += 1;
        }
    }

    tx.commit().await?;
    info!(inserted, "Question bank populated");
    Ok(inserted)
}

#[instrument(skip(pool))]
pub async fn list_questions_by_day(
    pool: &Pool<Sqlite>,
    day_type: &str,
) -> Result<Vec<Question>, AppError> {
    info!("Listing bank questions for weekday");
    let rows = sqlx::query_as::<_, DbQuestion>(
        "SELECT id, day_type, question_text, answer FROM questions WHERE day_type = ?",
    )
    .bind(day_type)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Question::from).collect())
}

#[instrument(skip(pool))]
pub async fn get_question(pool: &Pool<Sqlite>, id: i64) -> Result<Option<Question>, AppError> {
    let row = sqlx::query_as::<_, DbQuestion>(
        "SELECT id, day_type, question_text, answer FROM questions WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(Question::from))
}

const LOG_COLUMNS: &str = "id, date_given, day_of_week, questions_json, created_at";

#[instrument(skip(pool))]
pub async fn find_log_by_date(
    pool: &Pool<Sqlite>,
    date: NaiveDate,
) -> Result<Option<AssignmentLog>, AppError> {
    let row = sqlx::query_as::<_, DbAssignmentLog>(&format!(
        "SELECT {} FROM homework_log WHERE date_given = ?",
        LOG_COLUMNS
    ))
    .bind(date)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(AssignmentLog::from))
}

#[instrument(skip(pool))]
pub async fn get_log(pool: &Pool<Sqlite>, id: i64) -> Result<Option<AssignmentLog>, AppError> {
    let row = sqlx::query_as::<_, DbAssignmentLog>(&format!(
        "SELECT {} FROM homework_log WHERE id = ?",
        LOG_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(AssignmentLog::from))
}

/// Inserts the log for `date`. Returns `None` when a log for that date
/// already exists; the unique constraint on `date_given` decides the winner.
#[instrument(skip(pool, questions), fields(count = questions.len()))]
pub async fn insert_log(
    pool: &Pool<Sqlite>,
    date: NaiveDate,
    day_of_week: &str,
    questions: &[LoggedQuestion],
) -> Result<Option<i64>, AppError> {
    info!("Logging assignment");
    let res = sqlx::query(
        "INSERT INTO homework_log (date_given, day_of_week, questions_json)
         VALUES (?, ?, ?)
         ON CONFLICT(date_given) DO NOTHING",
    )
    .bind(date)
    .bind(day_of_week)
    .bind(Json(questions))
    .execute(pool)
    .await?;

    if res.rows_affected() == 0 {
        return Ok(None);
    }
    Ok(Some(res.last_insert_rowid()))
}

#[instrument(skip(pool, questions))]
pub async fn update_log_questions(
    pool: &Pool<Sqlite>,
    id: i64,
    questions: &[LoggedQuestion],
) -> Result<(), AppError> {
    info!("Updating logged answers");
    let res = sqlx::query("UPDATE homework_log SET questions_json = ? WHERE id = ?")
        .bind(Json(questions))
        .bind(id)
        .execute(pool)
        .await?;

    if res.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Assignment log {} not found", id)));
    }
    Ok(())
}

#[instrument(skip(pool))]
pub async fn list_logs(pool: &Pool<Sqlite>) -> Result<Vec<AssignmentLog>, AppError> {
    info!("Listing assignment logs");
    let rows = sqlx::query_as::<_, DbAssignmentLog>(&format!(
        "SELECT {} FROM homework_log ORDER BY date_given DESC",
        LOG_COLUMNS
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(AssignmentLog::from).collect())
}
