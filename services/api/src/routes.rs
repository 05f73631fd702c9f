use crate::infra::AppState;
use application_docs::documents::{document_router, DocumentRouteState};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;

pub(crate) fn with_document_routes(state: DocumentRouteState) -> axum::Router {
    document_router(state)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::{demo_records, DECLINED_ID, PENDING_ID};
    use crate::infra::{build_generator, InMemoryApplicationLookup};
    use application_docs::documents::DocumentConfig;
    use axum::body::Body;
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use rust_decimal_macros::dec;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(ready: bool) -> axum::Router {
        let lookup = Arc::new(InMemoryApplicationLookup::seeded(demo_records()));
        let generator = build_generator(
            lookup,
            DocumentConfig {
                support_email: "support@example.com".to_string(),
                signature: "The Client Services Team".to_string(),
                tax_rate: dec!(0.85),
            },
        )
        .expect("generator builds");

        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };

        with_document_routes(DocumentRouteState {
            generator: Arc::new(generator),
            default_base_uri: "http://localhost:3000/templates".to_string(),
        })
        .layer(Extension(state))
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).expect("request builds")
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn readiness_reflects_flag() {
        let response = app(false).oneshot(get("/ready")).await.expect("responds");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = app(true).oneshot(get("/ready")).await.expect("responds");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn document_route_serves_demo_records() {
        let response = app(true)
            .oneshot(get(&format!("/api/v1/applications/{PENDING_ID}/document")))
            .await
            .expect("responds");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/html; charset=utf-8"
        );
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            format!("inline; filename=\"application-{PENDING_ID}.html\"").as_str()
        );
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        assert!(body.starts_with(b"<!DOCTYPE html>"));

        let response = app(true)
            .oneshot(get(&format!("/api/v1/applications/{DECLINED_ID}/document")))
            .await
            .expect("responds");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
