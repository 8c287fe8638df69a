use std::env;

use chrono::{Local, NaiveDate};
use tracing::info;

use crate::error::AppError;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://homework_data.db";
pub const DEFAULT_STUDENT_NAME: &str = "Student";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub student_name: String,
    /// Pins "today" to a fixed date instead of the local calendar.
    pub fixed_date: Option<NaiveDate>,
    pub otlp_endpoint: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            student_name: DEFAULT_STUDENT_NAME.to_string(),
            fixed_date: None,
            otlp_endpoint: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let fixed_date = match optional_env("HOMEWORK_DATE") {
            Some(raw) => Some(NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|e| {
                AppError::Config(format!("Invalid value for HOMEWORK_DATE: {}", e))
            })?),
            None => None,
        };

        let config = Self {
            database_url: optional_env("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            student_name: optional_env("STUDENT_NAME")
                .unwrap_or_else(|| DEFAULT_STUDENT_NAME.to_string()),
            fixed_date,
            otlp_endpoint: optional_env("OTEL_EXPORTER_OTLP_ENDPOINT"),
        };

        info!(
            database_url = %config.database_url,
            fixed_date = ?config.fixed_date,
            "Loaded configuration"
        );
        Ok(config)
    }

    pub fn with_fixed_date(mut self, date: NaiveDate) -> Self {
        self.fixed_date = Some(date);
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.fixed_date
            .unwrap_or_else(|| Local::now().date_naive())
    }
}

/// Unset and blank variables are treated the same.
fn optional_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
