use serde::Serialize;

use crate::analysis::{MaintenanceTip, ReunionAnalysis};
use crate::config::ContactLinks;
use crate::consultation::{Factor, ProbabilityLevel, ScoreTone};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportHeadline {
    pub probability: u8,
    pub level: ProbabilityLevel,
    pub level_label: &'static str,
    pub note: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorCard {
    pub factor: Factor,
    pub title: &'static str,
    pub score: u8,
    pub tone: ScoreTone,
    /// Remote explanation, present only once the report is unlocked.
    pub analysis: Option<String>,
    /// Rendered behind the advertisement overlay.
    pub obscured: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionItem {
    pub title: &'static str,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitledSection {
    pub title: &'static str,
    pub items: Vec<SectionItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionPlanSection {
    pub title: &'static str,
    pub steps: Vec<SectionItem>,
    pub considerations: Vec<String>,
    pub maintenance_introduction: String,
    pub maintenance_tips: Vec<MaintenanceTip>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactCta {
    pub title: &'static str,
    pub description: &'static str,
    pub instagram_url: Option<String>,
    pub telegram_url: Option<String>,
    /// Neither link is configured; the operator still has to set one up.
    pub setup_required: bool,
}

/// Everything revealed only after the advertisement gate opens.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtendedSections {
    pub partner_psychology: TitledSection,
    pub action_plan: ActionPlanSection,
    pub final_advice: TitledSection,
    pub contact: ContactCta,
}

fn item(title: &'static str, text: &str) -> SectionItem {
    SectionItem {
        title,
        text: text.to_string(),
    }
}

pub(crate) fn extended_sections(
    analysis: &ReunionAnalysis,
    contact: &ContactLinks,
) -> ExtendedSections {
    let psychology = &analysis.partner_psychology;
    let requirements = &analysis.reunion_requirements;
    let advice = &analysis.final_advice;

    ExtendedSections {
        partner_psychology: TitledSection {
            title: "상대방의 현재 심리 추측",
            items: vec![
                item(
                    "이별 사유에 따른 상대방의 현재 상황",
                    &psychology.breakup_reason_analysis,
                ),
                item(
                    "상대방의 성격 키워드에 따른 현재 심리",
                    &psychology.personality_analysis,
                ),
                item(
                    "상대방은 현재 재회를 원하는 상태인가?",
                    &psychology.reunion_willingness,
                ),
            ],
        },
        action_plan: ActionPlanSection {
            title: "재회를 위한 액션 플랜",
            steps: vec![
                item("핵심 솔루션", &requirements.solution),
                item("연락 시점", &requirements.contact_timing),
                item("접근 스탠스", &requirements.approach_stance),
                item("연락 방법", &requirements.contact_method),
            ],
            considerations: requirements.considerations.clone(),
            maintenance_introduction: analysis.relationship_maintenance.introduction.clone(),
            maintenance_tips: analysis.relationship_maintenance.tips.clone(),
        },
        final_advice: TitledSection {
            title: "최종 조언",
            items: vec![
                item("어떤 접근 방식이 좋을까", &advice.approach_method),
                item("감정 표현은 어떻게 하는 게 좋을까", &advice.emotion_expression),
                item("어느 시점에 연락하는 게 좋을까", &advice.optimal_timing),
            ],
        },
        contact: ContactCta::from_links(contact),
    }
}

impl ContactCta {
    pub fn from_links(contact: &ContactLinks) -> Self {
        Self {
            title: "더 깊은 상담이 필요하신가요?",
            description: "지금 바로 1:1 상담 채널로 연결해 맞춤 조언을 받아보세요.",
            instagram_url: contact.instagram_url.clone(),
            telegram_url: contact.telegram_url.clone(),
            setup_required: !contact.has_any(),
        }
    }
}
