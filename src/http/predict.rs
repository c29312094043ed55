use actix_web::{HttpResponse, web};
use log::warn;
use serde::Serialize;
use serde_json::Value;

use crate::{error::ServiceErr, features::FeatureVector, service::PredictionService};

#[derive(Serialize)]
struct PredictResponse {
    input: FeatureVector,
    predicted_class: i64,
    species: &'static str,
    latency_ms: String,
}

/// `POST /predict`: classifies the sample in the json body.
pub async fn predict(
    service: web::Data<PredictionService>,
    body: web::Bytes,
) -> Result<HttpResponse, ServiceErr> {
    let payload: Value = serde_json::from_slice(&body)
        .map_err(|e| ServiceErr::invalid_input(format!("malformed json body: {e}")))?;

    let prediction = web::block(move || service.predict_json(&payload))
        .await
        .map_err(ServiceErr::inference)?
        .inspect_err(|e| warn!("prediction failed: {e}"))?;

    Ok(HttpResponse::Ok().json(PredictResponse {
        input: prediction.features,
        predicted_class: prediction.class,
        species: prediction.species,
        latency_ms: prediction.latency_ms(),
    }))
}
