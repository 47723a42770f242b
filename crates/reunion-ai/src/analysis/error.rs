use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed set of failure kinds visible to consultation clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnalyzeErrorCode {
    ValidationError,
    BadRequest,
    AuthError,
    ConfigError,
    UpstreamError,
    ParseError,
    NetworkError,
    UnknownError,
}

impl AnalyzeErrorCode {
    pub const ALL: [AnalyzeErrorCode; 8] = [
        AnalyzeErrorCode::ValidationError,
        AnalyzeErrorCode::BadRequest,
        AnalyzeErrorCode::AuthError,
        AnalyzeErrorCode::ConfigError,
        AnalyzeErrorCode::UpstreamError,
        AnalyzeErrorCode::ParseError,
        AnalyzeErrorCode::NetworkError,
        AnalyzeErrorCode::UnknownError,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            AnalyzeErrorCode::ValidationError => "VALIDATION_ERROR",
            AnalyzeErrorCode::BadRequest => "BAD_REQUEST",
            AnalyzeErrorCode::AuthError => "AUTH_ERROR",
            AnalyzeErrorCode::ConfigError => "CONFIG_ERROR",
            AnalyzeErrorCode::UpstreamError => "UPSTREAM_ERROR",
            AnalyzeErrorCode::ParseError => "PARSE_ERROR",
            AnalyzeErrorCode::NetworkError => "NETWORK_ERROR",
            AnalyzeErrorCode::UnknownError => "UNKNOWN_ERROR",
        }
    }

    /// Lenient lookup used when decoding relay error bodies.
    pub fn from_code(code: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == code)
            .unwrap_or(AnalyzeErrorCode::UnknownError)
    }

    /// HTTP status the relay endpoint answers with for this failure.
    pub const fn relay_status(self) -> u16 {
        match self {
            AnalyzeErrorCode::ValidationError | AnalyzeErrorCode::BadRequest => 400,
            AnalyzeErrorCode::ConfigError | AnalyzeErrorCode::UnknownError => 500,
            AnalyzeErrorCode::AuthError
            | AnalyzeErrorCode::UpstreamError
            | AnalyzeErrorCode::ParseError
            | AnalyzeErrorCode::NetworkError => 502,
        }
    }

    /// Whether the user can fix the failure by editing the form.
    pub const fn is_user_correctable(self) -> bool {
        matches!(
            self,
            AnalyzeErrorCode::ValidationError | AnalyzeErrorCode::BadRequest
        )
    }
}

impl fmt::Display for AnalyzeErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of a single analysis attempt.
///
/// `status` is the HTTP status that accompanied the failure, or `0` when no response
/// was received (transport failures, missing configuration).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code} ({status}): {message}")]
pub struct AnalyzeError {
    pub code: AnalyzeErrorCode,
    pub status: u16,
    pub message: String,
}

impl AnalyzeError {
    pub fn new(code: AnalyzeErrorCode, status: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            status,
            message: message.into(),
        }
    }

    pub fn config() -> Self {
        Self::new(
            AnalyzeErrorCode::ConfigError,
            0,
            "서버 설정이 올바르지 않습니다.",
        )
    }

    pub fn bad_request() -> Self {
        Self::new(
            AnalyzeErrorCode::BadRequest,
            400,
            "요청 본문이 올바른 JSON 형식이 아닙니다.",
        )
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(AnalyzeErrorCode::ValidationError, 400, message)
    }

    pub fn network() -> Self {
        Self::new(
            AnalyzeErrorCode::NetworkError,
            0,
            "네트워크 연결 상태를 확인해주세요.",
        )
    }

    pub fn auth(status: u16) -> Self {
        Self::new(
            AnalyzeErrorCode::AuthError,
            status,
            "분석 서버 인증에 실패했습니다.",
        )
    }

    pub fn upstream(status: u16) -> Self {
        Self::new(
            AnalyzeErrorCode::UpstreamError,
            status,
            "분석 서버에 일시적인 문제가 발생했습니다.",
        )
    }

    pub fn parse(status: u16) -> Self {
        Self::new(
            AnalyzeErrorCode::ParseError,
            status,
            "분석 결과 형식이 올바르지 않습니다.",
        )
    }
}
