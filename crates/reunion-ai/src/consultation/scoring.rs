use serde::Serialize;

use super::domain::{ConsultationFormData, ContactStatus, RelationshipDuration};
use crate::analysis::FactorAnalysis;

pub const MIN_FACTOR_SCORE: u8 = 10;
pub const MAX_FACTOR_SCORE: u8 = 95;
const BASE_SCORE: i32 = 50;

/// The four axes a reunion forecast is broken down into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    Emotional,
    Psychological,
    Environmental,
    Other,
}

impl Factor {
    pub const ALL: [Factor; 4] = [
        Factor::Emotional,
        Factor::Psychological,
        Factor::Environmental,
        Factor::Other,
    ];

    pub const fn title(self) -> &'static str {
        match self {
            Factor::Emotional => "감정적 요인",
            Factor::Psychological => "심리적 요인",
            Factor::Environmental => "환경적 요인",
            Factor::Other => "기타 요인",
        }
    }
}

/// Per-factor scores, each within `[MIN_FACTOR_SCORE, MAX_FACTOR_SCORE]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FactorScores {
    pub emotional: u8,
    pub psychological: u8,
    pub environmental: u8,
    pub other: u8,
}

impl FactorScores {
    /// Local heuristic shown before the remote analysis is unlocked.
    pub fn fallback(form: &ConsultationFormData) -> Self {
        let mut emotional = BASE_SCORE;
        let mut psychological = BASE_SCORE;
        let mut environmental = BASE_SCORE;
        let other = BASE_SCORE;

        if RelationshipDuration::from_code(&form.relationship_duration)
            .is_some_and(RelationshipDuration::spans_year)
        {
            emotional += 15;
        }
        if !form.my_mbti.is_empty() && !form.partner_mbti.is_empty() {
            psychological += 10;
        }
        if ContactStatus::from_code(&form.current_contact)
            .is_some_and(ContactStatus::keeps_in_touch)
        {
            environmental += 20;
        }

        Self {
            emotional: clamp_score(f64::from(emotional)),
            psychological: clamp_score(f64::from(psychological)),
            environmental: clamp_score(f64::from(environmental)),
            other: clamp_score(f64::from(other)),
        }
    }

    /// Remote factor scores, rounded and clamped like the local ones.
    pub fn from_analysis(analysis: &FactorAnalysis) -> Self {
        Self {
            emotional: clamp_score(analysis.emotional.score),
            psychological: clamp_score(analysis.psychological.score),
            environmental: clamp_score(analysis.environmental.score),
            other: clamp_score(analysis.other.score),
        }
    }

    pub const fn get(&self, factor: Factor) -> u8 {
        match factor {
            Factor::Emotional => self.emotional,
            Factor::Psychological => self.psychological,
            Factor::Environmental => self.environmental,
            Factor::Other => self.other,
        }
    }

    /// Rounded mean of the four factors.
    pub fn overall(&self) -> u8 {
        let total: u16 = Factor::ALL
            .into_iter()
            .map(|factor| u16::from(self.get(factor)))
            .sum();
        (f64::from(total) / 4.0).round() as u8
    }
}

fn clamp_score(raw: f64) -> u8 {
    if raw.is_nan() {
        return MIN_FACTOR_SCORE;
    }
    raw.round()
        .clamp(f64::from(MIN_FACTOR_SCORE), f64::from(MAX_FACTOR_SCORE)) as u8
}

/// Round a remote overall probability into a displayable percentage.
pub fn round_probability(raw: f64) -> u8 {
    if raw.is_nan() {
        return 0;
    }
    raw.round().clamp(0.0, 100.0) as u8
}

/// Headline classification of an overall probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbabilityLevel {
    High,
    Medium,
    Low,
}

impl ProbabilityLevel {
    pub fn classify(probability: u8) -> Self {
        match probability {
            70.. => ProbabilityLevel::High,
            50..=69 => ProbabilityLevel::Medium,
            _ => ProbabilityLevel::Low,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ProbabilityLevel::High => "높음",
            ProbabilityLevel::Medium => "보통",
            ProbabilityLevel::Low => "낮음",
        }
    }
}

/// Colour band of a single factor score; same thresholds as the headline level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreTone {
    Positive,
    Neutral,
    Negative,
}

impl ScoreTone {
    pub fn of(score: u8) -> Self {
        match ProbabilityLevel::classify(score) {
            ProbabilityLevel::High => ScoreTone::Positive,
            ProbabilityLevel::Medium => ScoreTone::Neutral,
            ProbabilityLevel::Low => ScoreTone::Negative,
        }
    }
}
