#[macro_use]
extern crate rocket;

mod api;
mod config;
mod db;
mod env;
mod error;
mod homework;
mod models;
mod routes;
mod schedule;
mod telemetry;
#[cfg(test)]
mod test;

use std::sync::Mutex;

use api::{api_get_record, api_get_records, health, not_found_api};
use config::AppConfig;
use error::AppError;
use rocket::{Build, Rocket};
use rocket_dyn_templates::Template;
use routes::{
    generate_questions, home, internal_error, not_found, record_menu, submit_answers_route,
    today, view_record,
};
use sqlx::SqlitePool;
use telemetry::{init_tracing, shutdown_telemetry, OtelGuard, TelemetryFairing};
use thiserror::Error;
use tracing::info;

pub static TELEMETRY_GUARD: Mutex<Option<OtelGuard>> = Mutex::new(None);

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
    #[error("{0}")]
    Rocket(#[from] Box<rocket::Error>),
    #[error("Application error: {0}")]
    App(#[from] AppError),
}

impl From<rocket::Error> for Error {
    fn from(value: rocket::Error) -> Self {
        Error::Rocket(Box::new(value))
    }
}

#[rocket::main]
async fn main() -> Result<(), Error> {
    let env_files = env::load_environment()
        .map_err(|e| anyhow::anyhow!("Failed to load environment: {}", e))?;
    let config = AppConfig::from_env()?;
    init_tracing(config.otlp_endpoint.as_deref())?;
    env_files.log();

    let pool = db::connect(&config.database_url).await?;
    db::prepare_database(&pool).await?;

    let result = init_rocket(pool, config).launch().await;
    shutdown_telemetry();
    result?;

    Ok(())
}

pub fn init_rocket(pool: SqlitePool, config: AppConfig) -> Rocket<Build> {
    info!(student = %config.student_name, "Starting daily homework");

    rocket::build()
        .manage(pool)
        .manage(config)
        .mount(
            "/",
            routes![
                home,
                generate_questions,
                today,
                submit_answers_route,
                record_menu,
                view_record,
            ],
        )
        .mount("/api", routes![health, api_get_records, api_get_record])
        .register("/", catchers![not_found, internal_error])
        .register("/api", catchers![not_found_api])
        .attach(Template::fairing())
        .attach(TelemetryFairing)
}
