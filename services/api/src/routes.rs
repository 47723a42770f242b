use crate::infra::{parse_step, AppState, ConsultationState};
use axum::body::Bytes;
use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use reunion_ai::analysis::{AnalyzeError, AnalyzeErrorCode, ReunionAnalysis};
use reunion_ai::consultation::{
    self, BreakupReason, ConsultationFormData, ContactStatus, Distance, FactorScores, FormStep,
    Gender, ProbabilityLevel, RelationshipDuration, Religion, PERSONALITY_KEYWORDS,
};
use reunion_ai::error::AppError;
use reunion_ai::report::ContactCta;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{info, warn};

const GENERIC_VALIDATION_MESSAGE: &str = "입력값을 확인해주세요.";

#[derive(Debug, Serialize)]
pub(crate) struct AnalyzeResponse {
    pub(crate) analysis: ReunionAnalysis,
}

#[derive(Debug, Serialize)]
pub(crate) struct PreviewResponse {
    pub(crate) scores: FactorScores,
    pub(crate) overall_probability: u8,
    pub(crate) level: ProbabilityLevel,
    pub(crate) level_label: &'static str,
}

#[derive(Debug, Serialize)]
pub(crate) struct StepValidationResponse {
    pub(crate) step: u8,
    pub(crate) title: &'static str,
    pub(crate) valid: bool,
    pub(crate) messages: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct OptionEntry {
    pub(crate) code: &'static str,
    pub(crate) label: &'static str,
}

#[derive(Debug, Serialize)]
pub(crate) struct StepEntry {
    pub(crate) number: u8,
    pub(crate) title: &'static str,
    pub(crate) fields: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct OptionsResponse {
    pub(crate) genders: Vec<OptionEntry>,
    pub(crate) relationship_durations: Vec<OptionEntry>,
    pub(crate) distances: Vec<OptionEntry>,
    pub(crate) contact_statuses: Vec<OptionEntry>,
    pub(crate) breakup_reasons: Vec<OptionEntry>,
    pub(crate) religions: Vec<OptionEntry>,
    pub(crate) personality_keywords: Vec<&'static str>,
    pub(crate) steps: Vec<StepEntry>,
}

pub(crate) fn with_consultation_routes(state: ConsultationState) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/reunion/analyze", post(analyze_endpoint))
        .route("/api/reunion/preview", post(preview_endpoint))
        .route(
            "/api/reunion/steps/:step/validate",
            post(step_validation_endpoint),
        )
        .route("/api/reunion/options", get(options_endpoint))
        .route("/api/reunion/contact", get(contact_endpoint))
        .layer(Extension(state))
}

pub(crate) async fn healthcheck() -> Json<Value> {
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

/// Decode a request body into form data: syntax errors are `BAD_REQUEST`, shape
/// errors `VALIDATION_ERROR`.
fn decode_form(body: &[u8]) -> Result<ConsultationFormData, AnalyzeError> {
    let value: Value = serde_json::from_slice(body).map_err(|_| AnalyzeError::bad_request())?;
    serde_json::from_value(value).map_err(|_| AnalyzeError::validation(GENERIC_VALIDATION_MESSAGE))
}

pub(crate) async fn analyze_endpoint(
    Extension(state): Extension<ConsultationState>,
    body: Bytes,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let result = relay_analysis(&state, &body).await;
    match &result {
        Ok(_) => info!("relay analysis succeeded"),
        Err(err) => warn!(code = %err.code, status = err.status, "relay analysis failed"),
    }
    let analysis = result?;
    Ok(Json(AnalyzeResponse { analysis }))
}

async fn relay_analysis(
    state: &ConsultationState,
    body: &[u8],
) -> Result<ReunionAnalysis, AnalyzeError> {
    if !state.analysis_configured {
        return Err(AnalyzeError::config());
    }

    let form = decode_form(body)?;
    let form = consultation::parse(&form).map_err(|errors| {
        AnalyzeError::validation(errors.first_message().unwrap_or(GENERIC_VALIDATION_MESSAGE))
    })?;

    state.client.analyze(&form).await
}

pub(crate) async fn preview_endpoint(body: Bytes) -> Result<Json<PreviewResponse>, AppError> {
    let form = decode_form(&body)?;
    let scores = FactorScores::fallback(&form);
    let overall_probability = scores.overall();
    let level = ProbabilityLevel::classify(overall_probability);

    Ok(Json(PreviewResponse {
        scores,
        overall_probability,
        level,
        level_label: level.label(),
    }))
}

pub(crate) async fn step_validation_endpoint(
    Path(step): Path<String>,
    body: Bytes,
) -> Result<Json<StepValidationResponse>, AppError> {
    let step = parse_step(&step)
        .map_err(|reason| AnalyzeError::new(AnalyzeErrorCode::BadRequest, 400, reason))?;
    let form = decode_form(&body)?;
    let messages = consultation::validate_step(&form, step);

    Ok(Json(StepValidationResponse {
        step: step.number(),
        title: step.title(),
        valid: messages.is_empty(),
        messages,
    }))
}

macro_rules! option_entries {
    ($set:ty) => {
        <$set>::ALL
            .iter()
            .map(|option| OptionEntry {
                code: option.code(),
                label: option.label(),
            })
            .collect()
    };
}

pub(crate) async fn options_endpoint() -> Json<OptionsResponse> {
    Json(OptionsResponse {
        genders: option_entries!(Gender),
        relationship_durations: option_entries!(RelationshipDuration),
        distances: option_entries!(Distance),
        contact_statuses: option_entries!(ContactStatus),
        breakup_reasons: option_entries!(BreakupReason),
        religions: option_entries!(Religion),
        personality_keywords: PERSONALITY_KEYWORDS.to_vec(),
        steps: FormStep::ALL
            .into_iter()
            .map(|step| StepEntry {
                number: step.number(),
                title: step.title(),
                fields: step.fields().iter().map(|field| field.key()).collect(),
            })
            .collect(),
    })
}

pub(crate) async fn contact_endpoint(
    Extension(state): Extension<ConsultationState>,
) -> Json<ContactCta> {
    Json(ContactCta::from_links(&state.contact))
}
