use crate::cli::ServeArgs;
use crate::infra::{AppState, ConsultationState};
use crate::routes::with_consultation_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use reunion_ai::config::AppConfig;
use reunion_ai::error::AppError;
use reunion_ai::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

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

    if !config.analysis.is_configured() {
        warn!("REUNION_API_URL or REUNION_API_KEY missing; analysis requests will fail");
    }
    if !config.contact.has_any() {
        warn!("no consultation contact links configured");
    }

    let consultation_state =
        ConsultationState::from_config(config.analysis.clone(), config.contact.clone())?;

    let app = with_consultation_routes(consultation_state)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "reunion consultation relay ready");

    axum::serve(listener, app).await?;
    Ok(())
}
