use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

pub const NOT_SUBMITTED: &str = "N/A (Not Submitted)";
pub const CANONICAL_UNAVAILABLE: &str = "N/A";

#[derive(Serialize, Debug, Clone)]
pub struct Question {
    pub id: i64,
    pub day_type: String,
    pub text: String,
    pub canonical_answer: String,
}

#[derive(sqlx::FromRow, Clone)]
pub struct DbQuestion {
    pub id: i64,
    pub day_type: String,
    pub question_text: String,
    pub answer: Option<String>,
}

impl From<DbQuestion> for Question {
    fn from(question: DbQuestion) -> Self {
        Self {
            id: question.id,
            day_type: question.day_type,
            text: question.question_text,
            canonical_answer: question.answer.unwrap_or_default(),
        }
    }
}

/// One entry of a log's question document. `submitted_answer` stays empty
/// until the student hands in the sheet.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LoggedQuestion {
    pub id: i64,
    pub text: String,
    #[serde(default)]
    pub submitted_answer: String,
}

impl LoggedQuestion {
    pub fn unanswered(question: &Question) -> Self {
        Self {
            id: question.id,
            text: question.text.clone(),
            submitted_answer: String::new(),
        }
    }

    pub fn is_answered(&self) -> bool {
        !self.submitted_answer.is_empty()
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct AssignmentLog {
    pub id: i64,
    pub date_given: NaiveDate,
    pub day_of_week: String,
    pub questions: Vec<LoggedQuestion>,
    pub created_at: Option<NaiveDateTime>,
}

impl AssignmentLog {
    pub fn is_answered(&self) -> bool {
        self.questions.iter().any(LoggedQuestion::is_answered)
    }
}

#[derive(sqlx::FromRow)]
pub struct DbAssignmentLog {
    pub id: i64,
    pub date_given: NaiveDate,
    pub day_of_week: String,
    pub questions_json: Json<Vec<LoggedQuestion>>,
    pub created_at: Option<NaiveDateTime>,
}

impl From<DbAssignmentLog> for AssignmentLog {
    fn from(db: DbAssignmentLog) -> Self {
        Self {
            id: db.id,
            date_given: db.date_given,
            day_of_week: db.day_of_week,
            questions: db.questions_json.0,
            created_at: db.created_at,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LogSummary {
    pub id: i64,
    pub date_given: NaiveDate,
    pub day_of_week: String,
    pub is_answered: bool,
}

impl From<&AssignmentLog> for LogSummary {
    fn from(log: &AssignmentLog) -> Self {
        Self {
            id: log.id,
            date_given: log.date_given,
            day_of_week: log.day_of_week.clone(),
            is_answered: log.is_answered(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ReviewedQuestion {
    pub position: usize,
    pub id: i64,
    pub text: String,
    pub submitted_answer: String,
    pub correct_answer: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LogReview {
    pub id: i64,
    pub date_given: NaiveDate,
    pub day_of_week: String,
    pub day_type: String,
    pub is_answered: bool,
    pub questions: Vec<ReviewedQuestion>,
}
