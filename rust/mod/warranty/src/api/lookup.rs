use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json,
};

use super::AppState;
use crate::lookup::{lookup, LookupOutcome};

pub fn routes() -> Router<AppState> {
    Router::new().route("/lookup/{code}", get(lookup_code))
}

async fn lookup_code(
    State(svc): State<AppState>,
    Path(code): Path<String>,
) -> (StatusCode, Json<LookupOutcome>) {
    let outcome = lookup(svc.registry(), &code, chrono::Utc::now());
    let status = match &outcome {
        LookupOutcome::Found(_) => StatusCode::OK,
        LookupOutcome::InvalidCode { .. } => StatusCode::BAD_REQUEST,
        LookupOutcome::NotFound { .. } => StatusCode::NOT_FOUND,
        LookupOutcome::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status, Json(outcome))
}
