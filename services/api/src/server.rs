use crate::cli::ServeArgs;
use crate::infra::{AppState, ConfiguredClassifier, InMemoryRegistryRepository};
use crate::routes::with_registry_routes;
use ai_act_compass::config::AppConfig;
use ai_act_compass::error::AppError;
use ai_act_compass::telemetry;
use ai_act_compass::workflows::registry::ComplianceRegistryService;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::{AtomicBool, Ordering};
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
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let classifier = ConfiguredClassifier::from_config(config.classifier.clone())?;
    let ai_enabled = classifier.is_live();
    let registry_service = Arc::new(ComplianceRegistryService::new(
        Arc::new(InMemoryRegistryRepository::default()),
        Arc::new(classifier),
    ));

    let app = with_registry_routes(registry_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, ai_enabled, "ai act compass ready");

    axum::serve(listener, app).await?;
    Ok(())
}
