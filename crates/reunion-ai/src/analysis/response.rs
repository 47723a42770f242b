use serde::{Deserialize, Serialize};

/// Narrative report produced by the analysis backend.
///
/// Every field is required; decoding fails when any of them is missing or has the
/// wrong type. Unknown extra fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReunionAnalysis {
    pub overall_probability: f64,
    pub factor_analysis: FactorAnalysis,
    pub partner_psychology: PartnerPsychology,
    pub reunion_requirements: ReunionRequirements,
    pub relationship_maintenance: RelationshipMaintenance,
    pub final_advice: FinalAdvice,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorScore {
    pub score: f64,
    pub analysis: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorAnalysis {
    pub emotional: FactorScore,
    pub psychological: FactorScore,
    pub environmental: FactorScore,
    pub other: FactorScore,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartnerPsychology {
    pub breakup_reason_analysis: String,
    pub personality_analysis: String,
    pub reunion_willingness: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReunionRequirements {
    pub solution: String,
    pub contact_timing: String,
    pub approach_stance: String,
    pub contact_method: String,
    pub considerations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceTip {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipMaintenance {
    pub introduction: String,
    pub tips: Vec<MaintenanceTip>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalAdvice {
    pub approach_method: String,
    pub emotion_expression: String,
    pub optimal_timing: String,
}
