//! Consultation intake: the form record, its validation rules, the prompt built from
//! it, the local fallback scorer and the wizard controller driving a session.

pub mod controller;
pub mod domain;
pub mod message;
pub mod schema;
pub mod scoring;

#[cfg(test)]
mod tests;

pub use controller::{ConsultationController, FormPhase, PendingSubmission};
pub use domain::{
    BreakupReason, ConsultationFormData, ContactStatus, Distance, FormField, FormStep, Gender,
    Party, RelationshipDuration, Religion, PERSONALITY_KEYWORDS,
};
pub use message::format_message;
pub use schema::{
    normalize, parse, parse_at, validate, validate_at, validate_step, validate_step_at,
    ValidationErrors, ValidationIssue,
};
pub use scoring::{round_probability, Factor, FactorScores, ProbabilityLevel, ScoreTone};
