use actix_web::{App, HttpServer, middleware::Logger, web};
use anyhow::Context;
use env_logger::Env;
use log::{error, info};

use iris_server::{PredictionService, ServiceConfig, http};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cfg = ServiceConfig::from_env()
        .map_err(anyhow::Error::msg)
        .context("invalid configuration")?;

    info!("loading onnx model from {}", cfg.model.source);
    let service = PredictionService::from_config(&cfg.model)
        .inspect_err(|e| error!("failed to initialize prediction service: {e}"))
        .context("failed to initialize prediction service")?;
    let service = web::Data::new(service);

    let addr = cfg.addr();
    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .wrap(Logger::default())
            .configure(http::routes)
    });
    if let Some(workers) = cfg.http_workers {
        server = server.workers(workers.get());
    }

    let server = server
        .bind(&addr)
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("server on http://{addr}");

    server.run().await?;
    info!("wrapping up, shutting down...");

    Ok(())
}
