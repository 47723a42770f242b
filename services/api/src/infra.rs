use metrics_exporter_prometheus::PrometheusHandle;
use reunion_ai::analysis::{AnalysisClient, BackendAnalysisClient};
use reunion_ai::config::{AnalysisConfig, ContactLinks};
use reunion_ai::consultation::{ConsultationFormData, FormStep};
use reunion_ai::error::AppError;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Shared, immutable dependencies of the consultation endpoints.
#[derive(Clone)]
pub(crate) struct ConsultationState {
    pub(crate) client: Arc<dyn AnalysisClient>,
    pub(crate) analysis_configured: bool,
    pub(crate) contact: ContactLinks,
}

impl ConsultationState {
    pub(crate) fn from_config(
        analysis: AnalysisConfig,
        contact: ContactLinks,
    ) -> Result<Self, AppError> {
        let analysis_configured = analysis.is_configured();
        let client = BackendAnalysisClient::from_config(analysis)?;
        Ok(Self {
            client: Arc::new(client),
            analysis_configured,
            contact,
        })
    }
}

pub(crate) fn load_form(path: &Path) -> Result<ConsultationFormData, AppError> {
    let raw = std::fs::read_to_string(path)?;
    serde_json::from_str(&raw)
        .map_err(|err| AppError::Form(format!("{}: {err}", path.display())))
}

pub(crate) fn parse_step(raw: &str) -> Result<FormStep, String> {
    raw.trim()
        .parse::<u8>()
        .ok()
        .and_then(FormStep::from_number)
        .ok_or_else(|| format!("단계는 1부터 {}까지 입력해주세요. (입력값: '{raw}')", FormStep::COUNT))
}
