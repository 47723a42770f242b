use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use super::error::{AnalyzeError, AnalyzeErrorCode};
use super::response::ReunionAnalysis;
use super::transport::{
    AnalysisTransport, ReqwestTransport, TransportError, TransportRequest, TransportResponse,
};
use crate::config::AnalysisConfig;
use crate::consultation::{format_message, ConsultationFormData};

/// Produces a [`ReunionAnalysis`] for a consultation, in a single attempt.
#[async_trait]
pub trait AnalysisClient: Send + Sync {
    async fn analyze(&self, form: &ConsultationFormData) -> Result<ReunionAnalysis, AnalyzeError>;
}

/// Talks to the LLM analysis backend directly.
#[derive(Debug, Clone)]
pub struct BackendAnalysisClient<T = ReqwestTransport> {
    config: AnalysisConfig,
    transport: T,
}

impl BackendAnalysisClient<ReqwestTransport> {
    pub fn from_config(config: AnalysisConfig) -> Result<Self, AnalyzeError> {
        let transport = ReqwestTransport::new(config.timeout).map_err(|err| {
            warn!(error = %err, "unable to build analysis http client");
            AnalyzeError::config()
        })?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: AnalysisTransport> BackendAnalysisClient<T> {
    pub fn with_transport(config: AnalysisConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    fn request_for(&self, form: &ConsultationFormData) -> Result<TransportRequest, AnalyzeError> {
        let (Some(url), Some(key)) = (&self.config.backend_url, &self.config.api_key) else {
            return Err(AnalyzeError::config());
        };

        Ok(TransportRequest {
            url: url.clone(),
            api_key: Some(key.clone()),
            body: json!({ "message": format_message(form) }),
        })
    }
}

#[async_trait]
impl<T: AnalysisTransport> AnalysisClient for BackendAnalysisClient<T> {
    async fn analyze(&self, form: &ConsultationFormData) -> Result<ReunionAnalysis, AnalyzeError> {
        let request = match self.request_for(form) {
            Ok(request) => request,
            Err(err) => {
                warn!(code = %err.code, "analysis backend is not configured");
                return Err(err);
            }
        };

        debug!(url = %request.url, "dispatching analysis request");
        let response = self
            .transport
            .post_json(request)
            .await
            .map_err(network_failure)?;

        let result = decode_backend_response(&response);
        match &result {
            Ok(analysis) => info!(
                status = response.status,
                overall_probability = analysis.overall_probability,
                "analysis completed"
            ),
            Err(err) => warn!(code = %err.code, status = err.status, "analysis failed"),
        }
        result
    }
}

/// Apply the backend status and envelope rules to a raw response.
pub fn decode_backend_response(
    response: &TransportResponse,
) -> Result<ReunionAnalysis, AnalyzeError> {
    if response.status == 401 || response.status == 403 {
        return Err(AnalyzeError::auth(response.status));
    }
    if !response.is_success() {
        return Err(AnalyzeError::upstream(response.status));
    }

    let parse_error = || AnalyzeError::parse(response.status);

    let envelope: Value = serde_json::from_str(&response.body).map_err(|_| parse_error())?;
    let raw = match envelope.get("response") {
        None | Some(Value::Null) => return Err(parse_error()),
        Some(Value::String(encoded)) => {
            serde_json::from_str::<Value>(encoded).map_err(|_| parse_error())?
        }
        Some(inline) => inline.clone(),
    };

    serde_json::from_value(raw).map_err(|_| parse_error())
}

/// Posts the raw form to the same-origin relay endpoint.
#[derive(Debug, Clone)]
pub struct RelayAnalysisClient<T = ReqwestTransport> {
    endpoint: String,
    transport: T,
}

impl RelayAnalysisClient<ReqwestTransport> {
    pub fn new(
        endpoint: impl Into<String>,
        timeout: std::time::Duration,
    ) -> Result<Self, AnalyzeError> {
        let transport = ReqwestTransport::new(timeout).map_err(|_| AnalyzeError::config())?;
        Ok(Self::with_transport(endpoint, transport))
    }
}

impl<T: AnalysisTransport> RelayAnalysisClient<T> {
    pub fn with_transport(endpoint: impl Into<String>, transport: T) -> Self {
        Self {
            endpoint: endpoint.into(),
            transport,
        }
    }
}

#[async_trait]
impl<T: AnalysisTransport> AnalysisClient for RelayAnalysisClient<T> {
    async fn analyze(&self, form: &ConsultationFormData) -> Result<ReunionAnalysis, AnalyzeError> {
        let body = serde_json::to_value(form).map_err(|_| AnalyzeError::bad_request())?;
        let request = TransportRequest {
            url: self.endpoint.clone(),
            api_key: None,
            body,
        };

        debug!(url = %request.url, "dispatching relay analysis request");
        let response = self
            .transport
            .post_json(request)
            .await
            .map_err(network_failure)?;

        decode_relay_response(&response)
    }
}

/// Interpret a relay answer: `{analysis}` on success, `{errorCode, message}` otherwise.
pub fn decode_relay_response(
    response: &TransportResponse,
) -> Result<ReunionAnalysis, AnalyzeError> {
    let payload: Option<Value> = serde_json::from_str(&response.body).ok();

    if response.is_success() {
        return payload
            .and_then(|mut value| value.get_mut("analysis").map(Value::take))
            .and_then(|analysis| serde_json::from_value(analysis).ok())
            .ok_or_else(|| AnalyzeError::parse(response.status));
    }

    let code = payload
        .as_ref()
        .and_then(|value| value.get("errorCode"))
        .and_then(Value::as_str)
        .map(AnalyzeErrorCode::from_code)
        .unwrap_or(AnalyzeErrorCode::UnknownError);
    let message = payload
        .as_ref()
        .and_then(|value| value.get("message"))
        .and_then(Value::as_str)
        .unwrap_or_default();

    Err(AnalyzeError::new(code, response.status, message))
}

fn network_failure(err: TransportError) -> AnalyzeError {
    warn!(error = %err, "analysis transport failed");
    AnalyzeError::network()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::transport::TransportResponse;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    enum Script {
        Fail,
        Respond(u16, String),
    }

    struct ScriptedTransport {
        script: Script,
        calls: AtomicUsize,
        last_request: Mutex<Option<TransportRequest>>,
    }

    impl ScriptedTransport {
        fn new(script: Script) -> Self {
            Self {
                script,
                calls: AtomicUsize::new(0),
                last_request: Mutex::new(None),
            }
        }

        fn respond(status: u16, body: impl Into<String>) -> Self {
            Self::new(Script::Respond(status, body.into()))
        }
    }

    #[async_trait]
    impl AnalysisTransport for ScriptedTransport {
        async fn post_json(
            &self,
            request: TransportRequest,
        ) -> Result<TransportResponse, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().expect("request mutex") = Some(request);
            match &self.script {
                Script::Fail => Err(TransportError::Connect("connection refused".to_string())),
                Script::Respond(status, body) => Ok(TransportResponse {
                    status: *status,
                    body: body.clone(),
                }),
            }
        }
    }

    fn analysis_json() -> Value {
        json!({
            "overall_probability": 63.6,
            "factor_analysis": {
                "emotional": { "score": 71.2, "analysis": "애정이 아직 남아 있습니다." },
                "psychological": { "score": 58, "analysis": "회피 성향이 보입니다." },
                "environmental": { "score": 66, "analysis": "같은 도시에 거주합니다." },
                "other": { "score": 49.5, "analysis": "특이사항 없음" }
            },
            "partner_psychology": {
                "breakup_reason_analysis": "소통 부족이 누적되었습니다.",
                "personality_analysis": "신중한 편입니다.",
                "reunion_willingness": "여지가 있습니다."
            },
            "reunion_requirements": {
                "solution": "대화 방식을 바꾸세요.",
                "contact_timing": "3주 뒤",
                "approach_stance": "담백하게",
                "contact_method": "메시지",
                "considerations": ["재촉하지 않기", "과거 언급 자제"]
            },
            "relationship_maintenance": {
                "introduction": "재회 이후가 더 중요합니다.",
                "tips": [{ "title": "정기 대화", "description": "주 1회 솔직한 대화" }]
            },
            "final_advice": {
                "approach_method": "가볍게 안부를 묻기",
                "emotion_expression": "차분하게",
                "optimal_timing": "주말 저녁"
            }
        })
    }

    fn form() -> ConsultationFormData {
        ConsultationFormData {
            my_gender: "male".to_string(),
            my_age: "27".to_string(),
            relationship_duration: "1y-3y".to_string(),
            ..ConsultationFormData::default()
        }
    }

    fn configured() -> AnalysisConfig {
        AnalysisConfig::new("https://analysis.example/api/v1/chat/", "key-1")
    }

    #[tokio::test]
    async fn transport_failure_maps_to_network_error() {
        let client = BackendAnalysisClient::with_transport(
            configured(),
            ScriptedTransport::new(Script::Fail),
        );
        let err = client.analyze(&form()).await.expect_err("fails");
        assert_eq!(err.code, AnalyzeErrorCode::NetworkError);
        assert_eq!(err.status, 0);
    }

    #[tokio::test]
    async fn missing_configuration_fails_before_any_request() {
        let mut config = configured();
        config.api_key = None;
        let client =
            BackendAnalysisClient::with_transport(config, ScriptedTransport::respond(200, "{}"));
        let err = client.analyze(&form()).await.expect_err("fails");
        assert_eq!(err.code, AnalyzeErrorCode::ConfigError);
        assert_eq!(client.transport.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn auth_and_upstream_statuses_are_distinguished() {
        for (status, expected) in [
            (401, AnalyzeErrorCode::AuthError),
            (403, AnalyzeErrorCode::AuthError),
            (404, AnalyzeErrorCode::UpstreamError),
            (500, AnalyzeErrorCode::UpstreamError),
        ] {
            let client = BackendAnalysisClient::with_transport(
                configured(),
                ScriptedTransport::respond(status, "denied"),
            );
            let err = client.analyze(&form()).await.expect_err("fails");
            assert_eq!(err.code, expected, "status {status}");
            assert_eq!(err.status, status);
        }
    }

    #[tokio::test]
    async fn non_json_response_string_is_a_parse_error() {
        let body = json!({ "response": "not json" }).to_string();
        let client =
            BackendAnalysisClient::with_transport(configured(), ScriptedTransport::respond(200, body));
        let err = client.analyze(&form()).await.expect_err("fails");
        assert_eq!(err.code, AnalyzeErrorCode::ParseError);
        assert_eq!(err.status, 200);
    }

    #[test]
    fn envelope_rules_reject_missing_or_mismatched_payloads() {
        for body in [
            "<html>bad gateway</html>".to_string(),
            json!({ "tokens_used": 12 }).to_string(),
            json!({ "response": null }).to_string(),
            json!({ "response": "{\"overall_probability\": 50}" }).to_string(),
            json!({ "response": 42 }).to_string(),
        ] {
            let response = TransportResponse { status: 200, body };
            let err = decode_backend_response(&response).expect_err("rejected");
            assert_eq!(err.code, AnalyzeErrorCode::ParseError);
        }
    }

    #[tokio::test]
    async fn encoded_analysis_string_decodes_to_equal_value() {
        let expected: ReunionAnalysis =
            serde_json::from_value(analysis_json()).expect("fixture decodes");
        let body = json!({
            "response": analysis_json().to_string(),
            "tokens_used": 1520,
            "tokens_remaining_today": 8000
        })
        .to_string();
        let client =
            BackendAnalysisClient::with_transport(configured(), ScriptedTransport::respond(200, body));

        let analysis = client.analyze(&form()).await.expect("succeeds");
        assert_eq!(analysis, expected);

        let request = client
            .transport
            .last_request
            .lock()
            .expect("request mutex")
            .clone()
            .expect("request captured");
        assert_eq!(request.api_key.as_deref(), Some("key-1"));
        let message = request.body["message"].as_str().expect("message string");
        assert!(message.contains("- 성별: 남성"));
        assert!(message.contains("- 교제 기간: 1년~3년"));
    }

    #[test]
    fn inline_analysis_object_is_accepted() {
        let response = TransportResponse {
            status: 200,
            body: json!({ "response": analysis_json() }).to_string(),
        };
        let analysis = decode_backend_response(&response).expect("decodes");
        assert_eq!(analysis.reunion_requirements.considerations.len(), 2);
    }

    #[tokio::test]
    async fn relay_client_surfaces_server_error_codes() {
        let body = json!({ "errorCode": "VALIDATION_ERROR", "message": "본인 성별을 선택해주세요." })
            .to_string();
        let client = RelayAnalysisClient::with_transport(
            "/api/reunion/analyze",
            ScriptedTransport::respond(400, body),
        );
        let err = client.analyze(&form()).await.expect_err("fails");
        assert_eq!(err.code, AnalyzeErrorCode::ValidationError);
        assert_eq!(err.status, 400);
        assert_eq!(err.message, "본인 성별을 선택해주세요.");

        let request = client
            .transport
            .last_request
            .lock()
            .expect("request mutex")
            .clone()
            .expect("request captured");
        assert_eq!(request.body["myGender"], "male");
        assert!(request.api_key.is_none());
    }

    #[test]
    fn relay_success_and_garbled_errors() {
        let ok = TransportResponse {
            status: 200,
            body: json!({ "analysis": analysis_json() }).to_string(),
        };
        assert!(decode_relay_response(&ok).is_ok());

        let garbled = TransportResponse {
            status: 503,
            body: "Service Unavailable".to_string(),
        };
        let err = decode_relay_response(&garbled).expect_err("fails");
        assert_eq!(err.code, AnalyzeErrorCode::UnknownError);
        assert_eq!(err.status, 503);

        let missing = TransportResponse {
            status: 200,
            body: json!({ "result": {} }).to_string(),
        };
        assert_eq!(
            decode_relay_response(&missing).expect_err("fails").code,
            AnalyzeErrorCode::ParseError
        );
    }
}
