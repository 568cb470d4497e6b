use std::collections::HashMap;
use std::time::Instant;

use actix_web::http::{Method, StatusCode};
use actix_web::{web, HttpRequest, HttpResponse, HttpResponseBuilder};
use tracing::info_span;
use uuid::Uuid;

use crate::{
    captures::{
        capture_service::{CaptureError, CaptureService},
        dto::capture_init_response::ErrorResponse,
    },
    config::CaptureConfig,
    services::metrics_service::MetricsService,
};

pub const CAPTURE_KEY_HEADER: &str = "x-awcs-capture-key";

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/capture-init")
            .route(web::post().to(capture_init))
            .route(web::method(Method::OPTIONS).to(capture_preflight))
            .route(web::route().to(method_not_allowed)),
    );
}

/// Every response, error or not, carries the permissive CORS headers so the
/// website can read the body cross-origin.
fn cors_response(status: StatusCode) -> HttpResponseBuilder {
    let mut builder = HttpResponseBuilder::new(status);
    builder
        .insert_header(("Access-Control-Allow-Origin", "*"))
        .insert_header(("Access-Control-Allow-Methods", "POST, OPTIONS"))
        .insert_header((
            "Access-Control-Allow-Headers",
            "Content-Type, x-awcs-capture-key",
        ))
        .insert_header(("Access-Control-Max-Age", "600"));
    builder
}

async fn capture_preflight() -> HttpResponse {
    cors_response(StatusCode::NO_CONTENT).finish()
}

async fn method_not_allowed() -> HttpResponse {
    cors_response(StatusCode::METHOD_NOT_ALLOWED).json(ErrorResponse {
        error: "Method not allowed. Use POST.".to_string(),
        detail: None,
    })
}

async fn capture_init(
    req: HttpRequest,
    body: web::Bytes,
    config: web::Data<CaptureConfig>,
    metrics: web::Data<MetricsService>,
) -> HttpResponse {
    let _span =
        info_span!("capture-init-api", correlation_id = Uuid::new_v4().to_string()).entered();
    let start = Instant::now();
    let mut tags = HashMap::new();
    tags.insert("endpoint".to_string(), "capture_init".to_string());

    let presented_key = req
        .headers()
        .get(CAPTURE_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    let service = CaptureService::new(config.get_ref().clone());

    match service.issue_grant(presented_key, &body).await {
        Ok(grant) => {
            metrics.increment("capture_init.success", Some(tags.clone()));
            metrics.timing("capture_init.duration", start.elapsed(), Some(tags));
            cors_response(StatusCode::OK).json(grant)
        }
        Err(e) => {
            tags.insert("error".to_string(), error_tag(&e).to_string());
            metrics.increment("capture_init.failed", Some(tags.clone()));
            metrics.timing("capture_init.duration", start.elapsed(), Some(tags));
            error_response(&e)
        }
    }
}

fn error_response(error: &CaptureError) -> HttpResponse {
    let status = match error {
        CaptureError::Forbidden => StatusCode::FORBIDDEN,
        CaptureError::InvalidJson | CaptureError::InvalidInput => StatusCode::BAD_REQUEST,
        CaptureError::Misconfigured | CaptureError::Signing(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let detail = match error {
        CaptureError::Signing(source) => Some(source.to_string()),
        _ => None,
    };

    cors_response(status).json(ErrorResponse {
        error: error.to_string(),
        detail,
    })
}

fn error_tag(error: &CaptureError) -> &'static str {
    match error {
        CaptureError::Forbidden => "forbidden",
        CaptureError::Misconfigured => "misconfigured",
        CaptureError::InvalidJson => "invalid_json",
        CaptureError::InvalidInput => "invalid_input",
        CaptureError::Signing(_) => "signing_failed",
    }
}
