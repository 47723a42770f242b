//! Validation rules for the consultation form.
//!
//! Rules are evaluated over the whole record, in form order, and produce at most one
//! issue per field. Step validation filters the full result down to the fields a step
//! owns, so later, not-yet-visited steps never block navigation.

use chrono::{Local, NaiveDate};
use serde::Serialize;

use super::domain::{
    BreakupReason, ConsultationFormData, ContactStatus, Distance, FormField, FormStep, Gender,
    RelationshipDuration, Religion,
};

const MIN_AGE: u32 = 15;
const MAX_AGE: u32 = 80;
const MAX_PERSONALITY_KEYWORDS: usize = 10;
const MAX_SHORT_TEXT: usize = 120;
const MAX_LONG_TEXT: usize = 2000;
const MIN_BREAKUP_DETAIL: usize = 20;

/// A rule violation scoped to a single form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub field: FormField,
    pub message: String,
}

/// Non-empty list of validation issues returned by [`parse`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", headline(.0))]
pub struct ValidationErrors(pub Vec<ValidationIssue>);

fn headline(issues: &[ValidationIssue]) -> &str {
    issues
        .first()
        .map(|issue| issue.message.as_str())
        .unwrap_or("입력값을 확인해주세요.")
}

impl ValidationErrors {
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.0
    }

    pub fn first_message(&self) -> Option<&str> {
        self.0.first().map(|issue| issue.message.as_str())
    }
}

/// Validate the full record against today's local date.
pub fn validate(form: &ConsultationFormData) -> Vec<ValidationIssue> {
    validate_at(form, Local::now().date_naive())
}

/// Validate the full record, treating `today` as the latest acceptable breakup date.
pub fn validate_at(form: &ConsultationFormData, today: NaiveDate) -> Vec<ValidationIssue> {
    let checks: [(FormField, Option<String>); 20] = [
        (
            FormField::MyGender,
            one_of(&form.my_gender, Gender::from_code, "본인 성별을 선택해주세요."),
        ),
        (FormField::MyAge, age(&form.my_age)),
        (FormField::MyMbti, optional_mbti(&form.my_mbti)),
        (
            FormField::MyPersonalityPreset,
            keyword_count(&form.my_personality_preset),
        ),
        (
            FormField::MyPersonalityCustom,
            max_chars(&form.my_personality_custom, MAX_SHORT_TEXT),
        ),
        (FormField::MyReligion, optional_religion(&form.my_religion)),
        (
            FormField::PartnerGender,
            one_of(
                &form.partner_gender,
                Gender::from_code,
                "상대방 성별을 선택해주세요.",
            ),
        ),
        (FormField::PartnerAge, age(&form.partner_age)),
        (FormField::PartnerMbti, optional_mbti(&form.partner_mbti)),
        (
            FormField::PartnerPersonalityPreset,
            keyword_count(&form.partner_personality_preset),
        ),
        (
            FormField::PartnerPersonalityCustom,
            max_chars(&form.partner_personality_custom, MAX_SHORT_TEXT),
        ),
        (
            FormField::PartnerReligion,
            optional_religion(&form.partner_religion),
        ),
        (
            FormField::RelationshipDuration,
            one_of(
                &form.relationship_duration,
                RelationshipDuration::from_code,
                "교제 기간을 선택해주세요.",
            ),
        ),
        (FormField::BreakupDate, breakup_date(&form.breakup_date, today)),
        (
            FormField::BreakupReason,
            one_of(
                &form.breakup_reason,
                BreakupReason::from_code,
                "이별 사유를 선택해주세요.",
            ),
        ),
        (
            FormField::BreakupReasonDetail,
            breakup_detail(&form.breakup_reason_detail),
        ),
        (
            FormField::CurrentContact,
            one_of(
                &form.current_contact,
                ContactStatus::from_code,
                "현재 연락 상태를 선택해주세요.",
            ),
        ),
        (
            FormField::Distance,
            one_of(&form.distance, Distance::from_code, "거주 거리를 선택해주세요."),
        ),
        (
            FormField::PartnerCareer,
            max_chars(&form.partner_career, MAX_SHORT_TEXT),
        ),
        (
            FormField::AdditionalInfo,
            max_chars(&form.additional_info, MAX_LONG_TEXT),
        ),
    ];

    checks
        .into_iter()
        .filter_map(|(field, message)| message.map(|message| ValidationIssue { field, message }))
        .collect()
}

/// Messages for the fields owned by `step`, ignoring every other step's failures.
pub fn validate_step(form: &ConsultationFormData, step: FormStep) -> Vec<String> {
    validate_step_at(form, step, Local::now().date_naive())
}

pub fn validate_step_at(
    form: &ConsultationFormData,
    step: FormStep,
    today: NaiveDate,
) -> Vec<String> {
    validate_at(form, today)
        .into_iter()
        .filter(|issue| issue.field.step() == step)
        .map(|issue| issue.message)
        .collect()
}

/// Validate the record and return its normalised form.
pub fn parse(form: &ConsultationFormData) -> Result<ConsultationFormData, ValidationErrors> {
    parse_at(form, Local::now().date_naive())
}

pub fn parse_at(
    form: &ConsultationFormData,
    today: NaiveDate,
) -> Result<ConsultationFormData, ValidationErrors> {
    let issues = validate_at(form, today);
    if issues.is_empty() {
        Ok(normalize(form))
    } else {
        Err(ValidationErrors(issues))
    }
}

/// Trim free text and upper-case MBTI codes the way validation reads them.
pub fn normalize(form: &ConsultationFormData) -> ConsultationFormData {
    ConsultationFormData {
        my_mbti: form.my_mbti.trim().to_uppercase(),
        my_personality_custom: form.my_personality_custom.trim().to_string(),
        partner_mbti: form.partner_mbti.trim().to_uppercase(),
        partner_personality_custom: form.partner_personality_custom.trim().to_string(),
        breakup_reason_detail: form.breakup_reason_detail.trim().to_string(),
        partner_career: form.partner_career.trim().to_string(),
        additional_info: form.additional_info.trim().to_string(),
        ..form.clone()
    }
}

fn one_of<T>(value: &str, lookup: fn(&str) -> Option<T>, message: &str) -> Option<String> {
    match lookup(value) {
        Some(_) => None,
        None => Some(message.to_string()),
    }
}

fn optional_religion(value: &str) -> Option<String> {
    if value.is_empty() {
        return None;
    }
    one_of(value, Religion::from_code, "종교를 선택해주세요.")
}

fn age(value: &str) -> Option<String> {
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
        return Some("나이는 숫자로 입력해주세요.".to_string());
    }

    match value.parse::<u32>() {
        Ok(age) if (MIN_AGE..=MAX_AGE).contains(&age) => None,
        _ => Some(format!(
            "나이는 {MIN_AGE}세부터 {MAX_AGE}세 사이로 입력해주세요."
        )),
    }
}

fn optional_mbti(value: &str) -> Option<String> {
    let normalized = value.trim().to_uppercase();
    if normalized.is_empty() || is_mbti(&normalized) {
        None
    } else {
        Some("MBTI는 INFP 형식으로 입력해주세요.".to_string())
    }
}

fn is_mbti(code: &str) -> bool {
    let letters: Vec<char> = code.chars().collect();
    let axes = [['E', 'I'], ['N', 'S'], ['F', 'T'], ['J', 'P']];
    letters.len() == axes.len()
        && letters
            .iter()
            .zip(axes.iter())
            .all(|(letter, pair)| pair.contains(letter))
}

fn keyword_count(keywords: &[String]) -> Option<String> {
    if keywords.len() > MAX_PERSONALITY_KEYWORDS {
        Some(format!(
            "성격 키워드는 최대 {MAX_PERSONALITY_KEYWORDS}개까지 선택할 수 있습니다."
        ))
    } else {
        None
    }
}

fn max_chars(value: &str, max: usize) -> Option<String> {
    if value.trim().chars().count() > max {
        Some(format!("최대 {max}자까지 입력할 수 있습니다."))
    } else {
        None
    }
}

fn breakup_date(value: &str, today: NaiveDate) -> Option<String> {
    let well_formed = value.len() == 10
        && value.char_indices().all(|(idx, c)| match idx {
            4 | 7 => c == '-',
            _ => c.is_ascii_digit(),
        });
    let parsed = if well_formed {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
    } else {
        None
    };

    match parsed {
        None => Some("이별 날짜를 선택해주세요.".to_string()),
        Some(date) if date > today => Some("이별 날짜는 오늘 이전이어야 합니다.".to_string()),
        Some(_) => None,
    }
}

fn breakup_detail(value: &str) -> Option<String> {
    let length = value.trim().chars().count();
    if length < MIN_BREAKUP_DETAIL {
        Some(format!(
            "이별 사유 상세 설명은 {MIN_BREAKUP_DETAIL}자 이상 입력해주세요."
        ))
    } else if length > MAX_LONG_TEXT {
        Some(format!("최대 {MAX_LONG_TEXT}자까지 입력할 수 있습니다."))
    } else {
        None
    }
}
