use crate::cli::ServeArgs;
use crate::demo::demo_records;
use crate::infra::{build_generator, AppState, InMemoryApplicationLookup};
use crate::routes::with_document_routes;
use application_docs::config::AppConfig;
use application_docs::documents::DocumentRouteState;
use application_docs::error::AppError;
use application_docs::telemetry;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let lookup = Arc::new(InMemoryApplicationLookup::seeded(demo_records()));
    let generator = Arc::new(build_generator(lookup, config.documents.clone())?);

    let app = with_document_routes(DocumentRouteState {
        generator,
        default_base_uri: config.templates.base_uri.clone(),
    })
    .layer(Extension(app_state))
    .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(environment = ?config.environment, %addr, "application document service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
