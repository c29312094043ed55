//! The HTTP surface of the iris server.
//!
//! Every failure is answered with status 500 and a `{"error": <message>}` body.

mod health;
mod predict;
mod selftest;

use actix_web::{HttpResponse, ResponseError, http::StatusCode, web};
use serde_json::json;

use crate::error::ServiceErr;

pub use health::SERVICE_NAME;

/// Registers the `/predict`, `/health` and `/test` routes.
///
/// The app must carry a `web::Data<PredictionService>`.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/predict", web::post().to(predict::predict))
        .route("/health", web::get().to(health::health))
        .route("/test", web::get().to(selftest::self_test));
}

impl ResponseError for ServiceErr {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}
