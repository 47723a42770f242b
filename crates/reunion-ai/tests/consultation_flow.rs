//! End-to-end consultation scenarios driven through the public controller, client and
//! report APIs with a scripted transport standing in for the analysis backend.

mod common {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::NaiveDate;
    use serde_json::{json, Value};

    use reunion_ai::analysis::{
        AnalysisTransport, TransportError, TransportRequest, TransportResponse,
    };
    use reunion_ai::consultation::{ConsultationController, FormField, Party};

    pub(super) fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date")
    }

    /// Fill every step the way a user would, advancing after each one.
    pub(super) fn walk_to_last_step(controller: &mut ConsultationController) {
        for (field, value) in [
            (FormField::MyGender, "female"),
            (FormField::MyAge, "26"),
            (FormField::PartnerGender, "male"),
            (FormField::PartnerAge, "28"),
        ] {
            controller.set_text(field, value);
        }
        assert!(controller.next(), "basics step");

        controller.set_text(FormField::MyMbti, "infp");
        controller.set_text(FormField::PartnerMbti, "ENFJ");
        controller.toggle_keyword(Party::Me, "예민함");
        controller.toggle_keyword(Party::Partner, "무던함");
        assert!(controller.next(), "personality step");

        for (field, value) in [
            (FormField::RelationshipDuration, "3y-5y"),
            (FormField::BreakupDate, "2025-05-02"),
            (FormField::Distance, "nearby-city"),
            (FormField::CurrentContact, "regular"),
        ] {
            controller.set_text(field, value);
        }
        assert!(controller.next(), "relationship step");

        controller.set_text(FormField::BreakupReason, "values");
        controller.set_text(
            FormField::BreakupReasonDetail,
            "미래 계획에 대한 생각이 너무 달라서 대화할수록 지쳐 갔습니다.",
        );
    }

    pub(super) fn analysis_payload() -> Value {
        json!({
            "overall_probability": 57.5,
            "factor_analysis": {
                "emotional": { "score": 62.4, "analysis": "오랜 교제로 정이 깊습니다." },
                "psychological": { "score": 51, "analysis": "서로 다른 의사결정 방식" },
                "environmental": { "score": 68.5, "analysis": "연락이 이어지고 있습니다." },
                "other": { "score": 48, "analysis": "가치관 차이가 큽니다." }
            },
            "partner_psychology": {
                "breakup_reason_analysis": "미래에 대한 불안이 큽니다.",
                "personality_analysis": "감정 기복이 적은 편입니다.",
                "reunion_willingness": "확신이 필요합니다."
            },
            "reunion_requirements": {
                "solution": "공통의 미래 그림을 먼저 합의하세요.",
                "contact_timing": "한 달 뒤",
                "approach_stance": "차분하게",
                "contact_method": "직접 만나서",
                "considerations": ["결론을 서두르지 않기"]
            },
            "relationship_maintenance": {
                "introduction": "가치관 대화를 정기적으로 하세요.",
                "tips": [
                    { "title": "월간 계획", "description": "한 달에 한 번 계획을 공유" },
                    { "title": "감정 일기", "description": "서운함을 기록하고 나누기" }
                ]
            },
            "final_advice": {
                "approach_method": "진심을 담은 편지",
                "emotion_expression": "담담하게",
                "optimal_timing": "연말 전"
            }
        })
    }

    /// Answers every request with the same status and body, recording what it saw.
    #[derive(Clone)]
    pub(super) struct FixedTransport {
        status: u16,
        body: String,
        pub(super) requests: Arc<Mutex<Vec<TransportRequest>>>,
    }

    impl FixedTransport {
        pub(super) fn new(status: u16, body: impl Into<String>) -> Self {
            Self {
                status,
                body: body.into(),
                requests: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub(super) fn request_count(&self) -> usize {
            self.requests.lock().expect("requests mutex").len()
        }
    }

    #[async_trait]
    impl AnalysisTransport for FixedTransport {
        async fn post_json(
            &self,
            request: TransportRequest,
        ) -> Result<TransportResponse, TransportError> {
            self.requests.lock().expect("requests mutex").push(request);
            Ok(TransportResponse {
                status: self.status,
                body: self.body.clone(),
            })
        }
    }
}

use common::*;
use reunion_ai::analysis::{AnalyzeErrorCode, BackendAnalysisClient, NoticeTone};
use reunion_ai::config::{AnalysisConfig, ContactLinks};
use reunion_ai::consultation::{
    ConsultationController, FactorScores, FormField, FormPhase, FormStep, ProbabilityLevel,
};
use reunion_ai::report::{RevealState, AD_COUNTDOWN_TICKS};
use serde_json::json;

fn config() -> AnalysisConfig {
    AnalysisConfig::new("https://analysis.example/api/v1/chat/", "test-key")
}

#[tokio::test]
async fn consultation_reveals_remote_report_after_countdown() {
    let body = json!({ "response": analysis_payload().to_string(), "tokens_used": 900 });
    let transport = FixedTransport::new(200, body.to_string());
    let client = BackendAnalysisClient::with_transport(config(), transport.clone());

    let mut controller = ConsultationController::new().with_validation_date(today());
    walk_to_last_step(&mut controller);
    assert!(controller.submit(&client).await);
    assert_eq!(controller.phase(), FormPhase::Revealed);
    assert_eq!(transport.request_count(), 1);

    let prompt = transport.requests.lock().expect("requests mutex")[0].body["message"]
        .as_str()
        .expect("message")
        .to_string();
    assert!(prompt.contains("- 현재 거주 거리: 인근 도시"));
    assert!(prompt.contains("- 성격 키워드: 예민함"));

    let mut report = controller
        .report(ContactLinks::default())
        .expect("report available");

    let fallback = report.factor_scores();
    assert_eq!(
        (
            fallback.emotional,
            fallback.psychological,
            fallback.environmental,
            fallback.other
        ),
        (65, 60, 70, 50)
    );
    assert_eq!(report.probability(), 61);
    assert_eq!(report.headline().level, ProbabilityLevel::Medium);

    assert!(report.watch_ad());
    for _ in 0..AD_COUNTDOWN_TICKS {
        report.tick();
    }
    assert_eq!(report.reveal_state(), RevealState::Unlocked);

    assert_eq!(report.probability(), 58);
    let scores = report.factor_scores();
    assert_eq!(
        scores,
        FactorScores {
            emotional: 62,
            psychological: 51,
            environmental: 69,
            other: 48,
        }
    );
    let sections = report.extended_sections().expect("sections unlocked");
    assert_eq!(sections.action_plan.maintenance_tips.len(), 2);
    assert!(sections.contact.setup_required);
}

#[tokio::test]
async fn submitted_prompt_uses_the_normalized_form() {
    let body = json!({ "response": analysis_payload() });
    let transport = FixedTransport::new(200, body.to_string());
    let client = BackendAnalysisClient::with_transport(config(), transport.clone());

    let mut controller = ConsultationController::new().with_validation_date(today());
    walk_to_last_step(&mut controller);
    controller.set_text(FormField::PartnerCareer, "   ");
    controller.set_text(FormField::AdditionalInfo, "  연락은 제가 먼저 했습니다.  ");
    assert!(controller.submit(&client).await);

    let prompt = transport.requests.lock().expect("requests mutex")[0].body["message"]
        .as_str()
        .expect("message")
        .to_string();
    assert!(prompt.contains("- MBTI: INFP"));
    assert!(!prompt.contains("infp"));
    assert!(!prompt.contains("직업/진로"));
    assert!(prompt.contains("\n연락은 제가 먼저 했습니다.\n"));
    assert_eq!(controller.form().my_mbti, "infp");
}

#[tokio::test]
async fn rejected_credentials_return_user_to_last_step() {
    let transport = FixedTransport::new(403, "forbidden");
    let client = BackendAnalysisClient::with_transport(config(), transport.clone());

    let mut controller = ConsultationController::new().with_validation_date(today());
    walk_to_last_step(&mut controller);
    assert!(controller.submit(&client).await);

    assert_eq!(controller.phase(), FormPhase::Editing(FormStep::Breakup));
    let notice = controller.submit_error().expect("notice");
    assert_eq!(notice.code, AnalyzeErrorCode::AuthError);
    assert_eq!(notice.tone, NoticeTone::Critical);
    assert_eq!(controller.form().breakup_reason, "values");
    assert!(controller.report(ContactLinks::default()).is_none());
}

#[tokio::test]
async fn unconfigured_client_fails_without_network() {
    let transport = FixedTransport::new(200, "{}");
    let client = BackendAnalysisClient::with_transport(AnalysisConfig::default(), transport.clone());

    let mut controller = ConsultationController::new().with_validation_date(today());
    walk_to_last_step(&mut controller);
    controller.submit(&client).await;

    assert_eq!(transport.request_count(), 0);
    assert_eq!(
        controller.submit_error().map(|notice| notice.code),
        Some(AnalyzeErrorCode::ConfigError)
    );
}
