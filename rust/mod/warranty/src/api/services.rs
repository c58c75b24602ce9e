use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json,
};
use serde::Deserialize;

use garage_core::ServiceError;

use super::AppState;
use crate::catalog::CatalogEntry;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/services", get(list_services).post(add_service))
        .route("/services/{label}", delete(remove_service))
}

#[derive(Deserialize)]
struct AddServiceBody {
    label: String,
}

async fn list_services(State(svc): State<AppState>) -> Result<Json<Vec<CatalogEntry>>, ServiceError> {
    Ok(Json(svc.list_services()?))
}

async fn add_service(
    State(svc): State<AppState>,
    Json(body): Json<AddServiceBody>,
) -> Result<(StatusCode, Json<CatalogEntry>), ServiceError> {
    Ok((StatusCode::CREATED, Json(svc.add_service(&body.label)?)))
}

async fn remove_service(
    State(svc): State<AppState>,
    Path(label): Path<String>,
) -> Result<StatusCode, ServiceError> {
    svc.remove_service(&label)?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use serde_json::json;

    use super::super::{router, testutil::call};
    use crate::service::testutil;

    #[tokio::test]
    async fn add_and_remove_label() {
        let (svc, _dir) = testutil::service();
        let app = router(Arc::new(svc));

        let (status, body) = call(&app, "POST", "/services", Some(json!({"label": "Seramik Kaplama"}))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["base"], false);

        let (_, body) = call(&app, "GET", "/services", None).await;
        assert_eq!(body.as_array().unwrap().len(), 3);

        let (status, _) = call(&app, "DELETE", "/services/Seramik%20Kaplama", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = call(&app, "DELETE", "/services/PPF", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
