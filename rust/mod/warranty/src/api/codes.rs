use axum::{
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json,
};
use serde::Serialize;

use garage_core::{ListResult, ServiceError};

use super::AppState;
use crate::model::{IssueRequest, ListFilter, UpdateRequest, WarrantyRecord};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/codes", get(list_codes).post(issue_code))
        .route("/codes/next", get(next_code))
        .route("/codes/{code}", get(get_code).patch(update_code).delete(delete_code))
}

#[derive(Serialize)]
struct NextCode {
    code: String,
    grouped: String,
}

async fn list_codes(
    State(svc): State<AppState>,
    Query(filter): Query<ListFilter>,
) -> Result<Json<ListResult<WarrantyRecord>>, ServiceError> {
    Ok(Json(svc.list(&filter, chrono::Utc::now())?))
}

async fn issue_code(
    State(svc): State<AppState>,
    Json(body): Json<IssueRequest>,
) -> Result<(StatusCode, Json<WarrantyRecord>), ServiceError> {
    Ok((StatusCode::CREATED, Json(svc.issue(&body)?)))
}

async fn next_code(State(svc): State<AppState>) -> Result<Json<NextCode>, ServiceError> {
    let code = svc.next_code()?;
    Ok(Json(NextCode {
        grouped: code.grouped(),
        code: code.as_str().to_string(),
    }))
}

async fn get_code(
    State(svc): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<WarrantyRecord>, ServiceError> {
    Ok(Json(svc.get(&code)?))
}

async fn update_code(
    State(svc): State<AppState>,
    Path(code): Path<String>,
    Json(body): Json<UpdateRequest>,
) -> Result<Json<WarrantyRecord>, ServiceError> {
    Ok(Json(svc.update(&code, &body)?))
}

async fn delete_code(
    State(svc): State<AppState>,
    Path(code): Path<String>,
) -> Result<StatusCode, ServiceError> {
    svc.delete(&code)?;
    Ok(StatusCode::NO_CONTENT)
}
