//! Reconciliation report shown after a consultation is submitted.
//!
//! The report starts locked and shows the local fallback scores. Watching the
//! advertisement runs a short countdown; once it reaches zero the remote analysis
//! (when one exists) replaces the fallback scores and the extended sections appear.

mod countdown;
mod sections;

pub use countdown::{Countdown, CountdownHandle, CountdownOutcome, AD_COUNTDOWN_TICKS};
pub use sections::{
    ActionPlanSection, ContactCta, ExtendedSections, FactorCard, ReportHeadline, SectionItem,
    TitledSection,
};

use serde::Serialize;
use tracing::debug;

use crate::analysis::ReunionAnalysis;
use crate::config::ContactLinks;
use crate::consultation::{
    round_probability, ConsultationFormData, Factor, FactorScores, ProbabilityLevel, ScoreTone,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RevealState {
    Locked,
    AdPlaying { remaining: u8 },
    Unlocked,
}

#[derive(Debug, Clone)]
pub struct ReconciliationReport {
    form: ConsultationFormData,
    analysis: Option<ReunionAnalysis>,
    contact: ContactLinks,
    reveal: RevealState,
}

impl ReconciliationReport {
    pub fn new(
        form: ConsultationFormData,
        analysis: Option<ReunionAnalysis>,
        contact: ContactLinks,
    ) -> Self {
        Self {
            form,
            analysis,
            contact,
            reveal: RevealState::Locked,
        }
    }

    pub fn reveal_state(&self) -> RevealState {
        self.reveal
    }

    pub fn analysis(&self) -> Option<&ReunionAnalysis> {
        self.analysis.as_ref()
    }

    pub fn is_unlocked(&self) -> bool {
        self.reveal == RevealState::Unlocked
    }

    /// Start the advertisement. Only valid while locked.
    pub fn watch_ad(&mut self) -> bool {
        if self.reveal != RevealState::Locked {
            return false;
        }
        self.reveal = RevealState::AdPlaying {
            remaining: AD_COUNTDOWN_TICKS,
        };
        true
    }

    /// Advance the advertisement countdown by one tick.
    pub fn tick(&mut self) -> RevealState {
        if let RevealState::AdPlaying { remaining } = self.reveal {
            self.reveal = if remaining <= 1 {
                debug!("report unlocked");
                RevealState::Unlocked
            } else {
                RevealState::AdPlaying {
                    remaining: remaining - 1,
                }
            };
        }
        self.reveal
    }

    /// Seconds left on the advertisement, if one is playing.
    pub fn remaining_ticks(&self) -> Option<u8> {
        match self.reveal {
            RevealState::AdPlaying { remaining } => Some(remaining),
            RevealState::Locked | RevealState::Unlocked => None,
        }
    }

    fn revealed_analysis(&self) -> Option<&ReunionAnalysis> {
        self.analysis.as_ref().filter(|_| self.is_unlocked())
    }

    pub fn factor_scores(&self) -> FactorScores {
        match self.revealed_analysis() {
            Some(analysis) => FactorScores::from_analysis(&analysis.factor_analysis),
            None => FactorScores::fallback(&self.form),
        }
    }

    pub fn probability(&self) -> u8 {
        match self.revealed_analysis() {
            Some(analysis) => round_probability(analysis.overall_probability),
            None => FactorScores::fallback(&self.form).overall(),
        }
    }

    pub fn headline(&self) -> ReportHeadline {
        let probability = self.probability();
        let level = ProbabilityLevel::classify(probability);
        let note = if self.revealed_analysis().is_some() {
            "AI 상세 분석 결과입니다."
        } else {
            "입력 정보를 바탕으로 한 예상치입니다. 광고 시청 후 AI 상세 분석을 확인하세요."
        };
        ReportHeadline {
            probability,
            level,
            level_label: level.label(),
            note,
        }
    }

    pub fn factor_cards(&self) -> Vec<FactorCard> {
        let scores = self.factor_scores();
        let revealed = self.revealed_analysis();
        Factor::ALL
            .into_iter()
            .map(|factor| {
                let score = scores.get(factor);
                FactorCard {
                    factor,
                    title: factor.title(),
                    score,
                    tone: ScoreTone::of(score),
                    analysis: revealed.map(|analysis| factor_text(analysis, factor).to_string()),
                    obscured: factor != Factor::Emotional && !self.is_unlocked(),
                }
            })
            .collect()
    }

    /// Partner psychology, action plan, final advice and contact links.
    pub fn extended_sections(&self) -> Option<ExtendedSections> {
        self.revealed_analysis()
            .map(|analysis| sections::extended_sections(analysis, &self.contact))
    }
}

fn factor_text(analysis: &ReunionAnalysis, factor: Factor) -> &str {
    let factors = &analysis.factor_analysis;
    match factor {
        Factor::Emotional => &factors.emotional.analysis,
        Factor::Psychological => &factors.psychological.analysis,
        Factor::Environmental => &factors.environmental.analysis,
        Factor::Other => &factors.other.analysis,
    }
}
