use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::analysis::{
    AnalysisClient, AnalyzeError, FactorAnalysis, FactorScore, FinalAdvice, MaintenanceTip,
    PartnerPsychology, RelationshipMaintenance, ReunionAnalysis, ReunionRequirements,
};
use crate::consultation::{ConsultationController, ConsultationFormData};

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date")
}

pub(super) fn controller() -> ConsultationController {
    ConsultationController::new().with_validation_date(today())
}

pub(super) fn complete_form() -> ConsultationFormData {
    ConsultationFormData {
        my_gender: "female".to_string(),
        my_age: "27".to_string(),
        my_mbti: "INFP".to_string(),
        my_personality_preset: vec!["불안형".to_string()],
        my_personality_custom: String::new(),
        my_religion: String::new(),
        partner_gender: "male".to_string(),
        partner_age: "29".to_string(),
        partner_mbti: "ENFJ".to_string(),
        partner_personality_preset: vec!["회피형".to_string(), "신중함".to_string()],
        partner_personality_custom: String::new(),
        partner_religion: String::new(),
        relationship_duration: "3y-5y".to_string(),
        breakup_date: "2025-04-20".to_string(),
        breakup_reason: "communication".to_string(),
        breakup_reason_detail: "바쁜 시기가 겹치면서 대화가 줄었고 서운함이 쌓여 헤어졌습니다."
            .to_string(),
        current_contact: "regular".to_string(),
        distance: "same-city".to_string(),
        partner_career: "직장인".to_string(),
        additional_info: String::new(),
    }
}

/// Controller positioned on the last step with every field filled in.
pub(super) fn ready_controller() -> ConsultationController {
    let mut controller =
        ConsultationController::with_form(complete_form()).with_validation_date(today());
    for _ in 0..3 {
        assert!(controller.next(), "complete form advances");
    }
    controller
}

fn factor(score: f64, analysis: &str) -> FactorScore {
    FactorScore {
        score,
        analysis: analysis.to_string(),
    }
}

pub(super) fn sample_analysis() -> ReunionAnalysis {
    ReunionAnalysis {
        overall_probability: 72.4,
        factor_analysis: FactorAnalysis {
            emotional: factor(78.0, "함께한 시간이 길어 정서적 유대가 남아 있습니다."),
            psychological: factor(66.6, "상대방은 갈등을 피하려는 경향이 있습니다."),
            environmental: factor(81.0, "자주 연락하고 있어 접점이 많습니다."),
            other: factor(60.0, "특별한 외부 요인은 없습니다."),
        },
        partner_psychology: PartnerPsychology {
            breakup_reason_analysis: "대화 부족에 지쳐 있는 상태입니다.".to_string(),
            personality_analysis: "신중하게 감정을 정리하는 중입니다.".to_string(),
            reunion_willingness: "조건이 맞으면 대화할 의향이 있습니다.".to_string(),
        },
        reunion_requirements: ReunionRequirements {
            solution: "대화 패턴을 바꾸겠다는 구체적인 약속".to_string(),
            contact_timing: "2~3주 뒤".to_string(),
            approach_stance: "부담 없이 담백하게".to_string(),
            contact_method: "짧은 메시지".to_string(),
            considerations: vec!["과거 다툼을 꺼내지 않기".to_string()],
        },
        relationship_maintenance: RelationshipMaintenance {
            introduction: "재회 이후에는 대화 습관이 중요합니다.".to_string(),
            tips: vec![MaintenanceTip {
                title: "주간 대화".to_string(),
                description: "일주일에 한 번 서로의 일상을 나누세요.".to_string(),
            }],
        },
        final_advice: FinalAdvice {
            approach_method: "가벼운 안부부터".to_string(),
            emotion_expression: "솔직하되 차분하게".to_string(),
            optimal_timing: "주말 오후".to_string(),
        },
    }
}

/// Client returning a fixed outcome and counting how often it was called.
pub(super) struct CountingClient {
    outcome: Result<ReunionAnalysis, AnalyzeError>,
    calls: AtomicUsize,
}

impl CountingClient {
    pub(super) fn succeeding() -> Self {
        Self {
            outcome: Ok(sample_analysis()),
            calls: AtomicUsize::new(0),
        }
    }

    pub(super) fn failing(error: AnalyzeError) -> Self {
        Self {
            outcome: Err(error),
            calls: AtomicUsize::new(0),
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnalysisClient for CountingClient {
    async fn analyze(
        &self,
        _form: &ConsultationFormData,
    ) -> Result<ReunionAnalysis, AnalyzeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}
