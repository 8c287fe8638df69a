use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::{json, Json, Value};
use rocket::{Request, State};
use sqlx::{Pool, Sqlite};

use crate::homework::{list_history, review_log};
use crate::models::{LogReview, LogSummary};

#[get("/health")]
pub fn health() -> &'static str {
    "OK"
}

#[get("/records")]
pub async fn api_get_records(db: &State<Pool<Sqlite>>) -> Result<Json<Vec<LogSummary>>, Status> {
    let logs = list_history(db).await?;
    Ok(Json(logs))
}

#[get("/records/<id>")]
pub async fn api_get_record(
    id: i64,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<LogReview>, Status> {
    let review = review_log(db, id).await?;
    Ok(Json(review))
}

#[catch(404)]
pub fn not_found_api(_req: &Request) -> Custom<Json<Value>> {
    let error_json = json!({
        "error": "Not Found",
        "message": "Resource not found"
    });

    Custom(Status::NotFound, Json(error_json))
}
