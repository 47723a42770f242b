use serde::Serialize;

use super::error::{AnalyzeError, AnalyzeErrorCode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeTone {
    Warning,
    Critical,
}

/// User-facing description of a failed analysis attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorNotice {
    pub code: AnalyzeErrorCode,
    pub title: String,
    pub description: String,
    pub recovery: String,
    pub tone: NoticeTone,
}

const RETRY_LATER: &str = "잠시 후 다시 시도해주세요.";

impl ErrorNotice {
    fn critical(code: AnalyzeErrorCode, title: &str, description: &str, recovery: &str) -> Self {
        Self {
            code,
            title: title.to_string(),
            description: description.to_string(),
            recovery: recovery.to_string(),
            tone: NoticeTone::Critical,
        }
    }

    /// Notice for a failure that carries no recognised error code.
    pub fn unknown() -> Self {
        Self::critical(
            AnalyzeErrorCode::UnknownError,
            "분석 요청 실패",
            "요청을 처리하는 중 알 수 없는 오류가 발생했습니다.",
            RETRY_LATER,
        )
    }

    pub fn from_error(error: &AnalyzeError) -> Self {
        match error.code {
            AnalyzeErrorCode::NetworkError => Self::critical(
                error.code,
                "네트워크 연결 오류",
                "서버에 연결하지 못했습니다.",
                "네트워크 상태를 확인한 뒤 다시 시도해주세요.",
            ),
            AnalyzeErrorCode::AuthError | AnalyzeErrorCode::ConfigError => Self::critical(
                error.code,
                "인증/설정 오류",
                "서비스 인증 또는 서버 설정에 문제가 있습니다.",
                "잠시 후 다시 시도하고, 반복되면 문의해주세요.",
            ),
            AnalyzeErrorCode::ParseError => Self::critical(
                error.code,
                "응답 처리 오류",
                "분석 결과를 처리하지 못했습니다.",
                RETRY_LATER,
            ),
            AnalyzeErrorCode::UpstreamError => Self::critical(
                error.code,
                "분석 서버 오류",
                "분석 서버에 일시적인 문제가 발생했습니다.",
                RETRY_LATER,
            ),
            AnalyzeErrorCode::ValidationError | AnalyzeErrorCode::BadRequest => Self {
                code: error.code,
                title: "입력값 오류".to_string(),
                description: non_empty_or(&error.message, "입력값을 확인해주세요."),
                recovery: "필수 항목과 형식을 확인한 뒤 다시 제출해주세요.".to_string(),
                tone: NoticeTone::Warning,
            },
            AnalyzeErrorCode::UnknownError => Self::critical(
                AnalyzeErrorCode::UnknownError,
                "분석 요청 실패",
                &non_empty_or(&error.message, "요청 처리 중 오류가 발생했습니다."),
                RETRY_LATER,
            ),
        }
    }
}

impl From<&AnalyzeError> for ErrorNotice {
    fn from(error: &AnalyzeError) -> Self {
        Self::from_error(error)
    }
}

fn non_empty_or(message: &str, fallback: &str) -> String {
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message.to_string()
    }
}
