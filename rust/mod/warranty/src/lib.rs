//! Warranty codes for vehicle customization work.
//!
//! Operators issue 16-digit codes tied to a plate, a coverage window and the
//! services performed; customers look the code up without authenticating.

pub mod api;
pub mod catalog;
pub mod code;
pub mod generator;
pub mod lookup;
pub mod model;
pub mod registry;
pub mod service;
pub mod validate;

use std::sync::Arc;

use axum::Router;
use garage_core::Module;

use service::WarrantyService;

/// Warranty module, mounted under `/warranty`.
pub struct WarrantyModule {
    service: Arc<WarrantyService>,
}

impl WarrantyModule {
    pub fn new(service: WarrantyService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

impl Module for WarrantyModule {
    fn name(&self) -> &str {
        "warranty"
    }

    fn routes(&self) -> Router {
        api::router(self.service.clone())
    }
}
