use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::{labels::SPECIES, service::PredictionService};

pub const SERVICE_NAME: &str = "embedded ml - iris classifier";

#[derive(Serialize)]
struct Health<'a> {
    status: &'static str,
    service: &'static str,
    model: &'a str,
    classes: [&'static str; 3],
}

/// `GET /health`: reports that the server is up and which model it serves.
pub async fn health(service: web::Data<PredictionService>) -> HttpResponse {
    HttpResponse::Ok().json(Health {
        status: "healthy",
        service: SERVICE_NAME,
        model: service.model_description(),
        classes: SPECIES,
    })
}
