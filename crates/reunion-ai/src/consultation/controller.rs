use chrono::{Local, NaiveDate};
use tracing::{debug, info};

use super::domain::{ConsultationFormData, FormField, FormStep, Party};
use super::schema::{normalize, validate_step_at};
use crate::analysis::{AnalysisClient, AnalyzeError, ErrorNotice, ReunionAnalysis};
use crate::config::ContactLinks;
use crate::report::ReconciliationReport;

/// Where a consultation session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Editing(FormStep),
    Submitting,
    Revealed,
}

/// Snapshot of the form handed out when a submission starts.
///
/// Only one can exist per session at a time; the controller refuses to create a
/// second one until [`ConsultationController::finish_submission`] is called.
#[derive(Debug)]
pub struct PendingSubmission {
    form: ConsultationFormData,
}

impl PendingSubmission {
    pub fn form(&self) -> &ConsultationFormData {
        &self.form
    }

    pub async fn run<C>(self, client: &C) -> Result<ReunionAnalysis, AnalyzeError>
    where
        C: AnalysisClient + ?Sized,
    {
        client.analyze(&self.form).await
    }
}

/// Drives the four-step consultation wizard for a single session.
#[derive(Debug, Clone)]
pub struct ConsultationController {
    form: ConsultationFormData,
    phase: FormPhase,
    analysis: Option<ReunionAnalysis>,
    validation_error: Option<String>,
    submit_error: Option<ErrorNotice>,
    validation_date: Option<NaiveDate>,
}

impl Default for ConsultationController {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsultationController {
    pub fn new() -> Self {
        Self::with_form(ConsultationFormData::default())
    }

    /// Start a session from pre-filled data, still at the first step.
    pub fn with_form(form: ConsultationFormData) -> Self {
        Self {
            form,
            phase: FormPhase::Editing(FormStep::Basics),
            analysis: None,
            validation_error: None,
            submit_error: None,
            validation_date: None,
        }
    }

    /// Pin the date breakup dates are checked against instead of the local clock.
    pub fn with_validation_date(mut self, today: NaiveDate) -> Self {
        self.validation_date = Some(today);
        self
    }

    pub fn form(&self) -> &ConsultationFormData {
        &self.form
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn current_step(&self) -> Option<FormStep> {
        match self.phase {
            FormPhase::Editing(step) => Some(step),
            FormPhase::Submitting | FormPhase::Revealed => None,
        }
    }

    pub fn analysis(&self) -> Option<&ReunionAnalysis> {
        self.analysis.as_ref()
    }

    pub fn validation_error(&self) -> Option<&str> {
        self.validation_error.as_deref()
    }

    pub fn submit_error(&self) -> Option<&ErrorNotice> {
        self.submit_error.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == FormPhase::Submitting
    }

    /// Completion percentage shown above the wizard.
    pub fn progress_percent(&self) -> u8 {
        let step = match self.phase {
            FormPhase::Editing(step) => step.number(),
            FormPhase::Submitting | FormPhase::Revealed => FormStep::COUNT,
        };
        (f64::from(step) / f64::from(FormStep::COUNT) * 100.0).round() as u8
    }

    /// Replace a text or code field. Returns `false` when the edit was ignored.
    pub fn set_text(&mut self, field: FormField, value: impl Into<String>) -> bool {
        if !self.accepts_edits() {
            return false;
        }
        let Some(slot) = self.form.text_mut(field) else {
            return false;
        };
        *slot = value.into();
        self.clear_errors();
        true
    }

    pub fn set_keywords(&mut self, party: Party, keywords: Vec<String>) -> bool {
        if !self.accepts_edits() {
            return false;
        }
        *self.form.keywords_mut(party) = keywords;
        self.clear_errors();
        true
    }

    /// Add the keyword if absent, remove it if present.
    pub fn toggle_keyword(&mut self, party: Party, keyword: &str) -> bool {
        if !self.accepts_edits() {
            return false;
        }
        let keywords = self.form.keywords_mut(party);
        if let Some(index) = keywords.iter().position(|existing| existing == keyword) {
            keywords.remove(index);
        } else {
            keywords.push(keyword.to_string());
        }
        self.clear_errors();
        true
    }

    /// Advance when the current step validates; otherwise surface its first error.
    pub fn next(&mut self) -> bool {
        let FormPhase::Editing(step) = self.phase else {
            return false;
        };
        let Some(following) = step.next() else {
            return false;
        };

        if let Some(message) = self.first_step_error(step) {
            debug!(step = step.number(), "step validation failed");
            self.validation_error = Some(message);
            return false;
        }

        self.validation_error = None;
        self.phase = FormPhase::Editing(following);
        true
    }

    pub fn back(&mut self) -> bool {
        let FormPhase::Editing(step) = self.phase else {
            return false;
        };
        match step.previous() {
            Some(previous) => {
                self.validation_error = None;
                self.phase = FormPhase::Editing(previous);
                true
            }
            None => false,
        }
    }

    /// Validate the final step and move to `Submitting`.
    ///
    /// Returns `None` outside the last step, while a submission is already in
    /// flight, or when the final step has errors (the first one is surfaced).
    pub fn begin_submission(&mut self) -> Option<PendingSubmission> {
        if self.phase != FormPhase::Editing(FormStep::Breakup) {
            debug!(phase = ?self.phase, "submission ignored");
            return None;
        }

        if let Some(message) = self.first_step_error(FormStep::Breakup) {
            self.validation_error = Some(message);
            return None;
        }

        self.validation_error = None;
        self.submit_error = None;
        self.phase = FormPhase::Submitting;
        Some(PendingSubmission {
            form: normalize(&self.form),
        })
    }

    /// Record the outcome of the in-flight submission.
    pub fn finish_submission(&mut self, result: Result<ReunionAnalysis, AnalyzeError>) {
        if self.phase != FormPhase::Submitting {
            debug!(phase = ?self.phase, "stray submission result dropped");
            return;
        }

        match result {
            Ok(analysis) => {
                info!("consultation analysis revealed");
                self.analysis = Some(analysis);
                self.phase = FormPhase::Revealed;
            }
            Err(err) => {
                info!(code = %err.code, status = err.status, "consultation submission failed");
                self.submit_error = Some(ErrorNotice::from_error(&err));
                self.phase = FormPhase::Editing(FormStep::Breakup);
            }
        }
    }

    /// Validate, call the client once and record the result.
    ///
    /// Returns `true` when a request was issued.
    pub async fn submit<C>(&mut self, client: &C) -> bool
    where
        C: AnalysisClient + ?Sized,
    {
        let Some(pending) = self.begin_submission() else {
            return false;
        };
        let result = pending.run(client).await;
        self.finish_submission(result);
        true
    }

    /// Report view for the revealed analysis.
    pub fn report(&self, contact: ContactLinks) -> Option<ReconciliationReport> {
        self.analysis.as_ref().map(|analysis| {
            ReconciliationReport::new(self.form.clone(), Some(analysis.clone()), contact)
        })
    }

    /// Discard the session and start over at the first step.
    pub fn reset(&mut self) {
        let validation_date = self.validation_date;
        *self = Self::new();
        self.validation_date = validation_date;
    }

    fn accepts_edits(&self) -> bool {
        matches!(self.phase, FormPhase::Editing(_))
    }

    fn clear_errors(&mut self) {
        self.validation_error = None;
        self.submit_error = None;
    }

    fn first_step_error(&self, step: FormStep) -> Option<String> {
        let today = self
            .validation_date
            .unwrap_or_else(|| Local::now().date_naive());
        validate_step_at(&self.form, step, today).into_iter().next()
    }
}
