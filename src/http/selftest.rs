use actix_web::{HttpResponse, web};
use log::warn;

use crate::{error::ServiceErr, service::PredictionService};

/// `GET /test`: runs the reference samples through the pipeline.
pub async fn self_test(service: web::Data<PredictionService>) -> Result<HttpResponse, ServiceErr> {
    let report = web::block(move || service.self_test())
        .await
        .map_err(ServiceErr::inference)?
        .inspect_err(|e| warn!("self test failed: {e}"))?;

    Ok(HttpResponse::Ok().json(report))
}
