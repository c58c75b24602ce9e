pub mod codes;
pub mod lookup;
pub mod services;

use std::sync::Arc;

use axum::Router;

use crate::service::WarrantyService;

/// Shared application state.
pub type AppState = Arc<WarrantyService>;

/// Build the warranty API router. Paths are relative to the module prefix.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(codes::routes())
        .merge(services::routes())
        .merge(lookup::routes())
        .with_state(state)
}
