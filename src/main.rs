use actix_web::{web, App, HttpServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::CaptureConfig;
use crate::services::metrics_service::MetricsService;

mod captures;
mod commons;
mod config;
mod services;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing with JSON format
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let host = std::env::var("HOST").expect("HOST must be set");
    let port = std::env::var("PORT").expect("PORT must be set");

    let config = web::Data::new(CaptureConfig::from_env());

    let metrics_service = web::Data::new(MetricsService::new(
        &std::env::var("STATSD_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
        std::env::var("STATSD_PORT")
            .unwrap_or_else(|_| "8125".to_string())
            .parse::<u16>()
            .unwrap(),
        &std::env::var("STATSD_PREFIX").unwrap_or_else(|_| "awcs".to_string()),
    ));

    HttpServer::new(move || {
        App::new()
            .app_data(config.clone())
            .app_data(metrics_service.clone())
            .service(web::scope("/v1").configure(captures::capture_controller::configure))
    })
    .bind(format!("{}:{}", host, port))?
    .run()
    .await
}
