use super::domain::{
    BreakupReason, ConsultationFormData, ContactStatus, Distance, Gender, RelationshipDuration,
    Religion,
};

const CLOSING_INSTRUCTION: &str =
    "위 정보를 바탕으로 재회 확률을 분석하고, 구체적인 액션 플랜을 제시해주세요.";

/// Render the analysis prompt sent to the backend.
///
/// Codes are translated to their Korean labels; codes outside the known sets are
/// passed through as-is. Optional entries are left out entirely when empty.
pub fn format_message(form: &ConsultationFormData) -> String {
    let mut lines: Vec<String> = vec!["# 재회 확률 분석 요청".to_string(), String::new()];

    lines.push("## 본인 정보".to_string());
    push_person(
        &mut lines,
        &form.my_gender,
        &form.my_age,
        &form.my_mbti,
        &form.my_religion,
        &form.my_personality_preset,
        &form.my_personality_custom,
    );
    lines.push(String::new());

    lines.push("## 상대방 정보".to_string());
    push_person(
        &mut lines,
        &form.partner_gender,
        &form.partner_age,
        &form.partner_mbti,
        &form.partner_religion,
        &form.partner_personality_preset,
        &form.partner_personality_custom,
    );
    push_optional(&mut lines, "직업/진로", &form.partner_career);
    lines.push(String::new());

    lines.push("## 관계 정보".to_string());
    lines.push(format!(
        "- 교제 기간: {}",
        translate(
            &form.relationship_duration,
            RelationshipDuration::from_code,
            RelationshipDuration::label
        )
    ));
    lines.push(format!("- 이별 날짜: {}", form.breakup_date));
    lines.push(format!(
        "- 현재 거주 거리: {}",
        translate(&form.distance, Distance::from_code, Distance::label)
    ));
    lines.push(format!(
        "- 현재 연락 상태: {}",
        translate(
            &form.current_contact,
            ContactStatus::from_code,
            ContactStatus::label
        )
    ));
    lines.push(String::new());

    lines.push("## 이별 사유".to_string());
    lines.push(format!(
        "- 주된 사유: {}",
        translate(
            &form.breakup_reason,
            BreakupReason::from_code,
            BreakupReason::label
        )
    ));
    lines.push(format!("- 상세 설명: {}", form.breakup_reason_detail));
    lines.push(String::new());

    if !form.additional_info.is_empty() {
        lines.push("## 추가 정보".to_string());
        lines.push(form.additional_info.clone());
        lines.push(String::new());
    }

    lines.push(CLOSING_INSTRUCTION.to_string());
    lines.join("\n")
}

fn push_person(
    lines: &mut Vec<String>,
    gender: &str,
    age: &str,
    mbti: &str,
    religion: &str,
    keywords: &[String],
    custom: &str,
) {
    lines.push(format!(
        "- 성별: {}",
        translate(gender, Gender::from_code, Gender::label)
    ));
    lines.push(format!("- 나이: {age}세"));
    push_optional(lines, "MBTI", mbti);
    if !religion.is_empty() {
        lines.push(format!(
            "- 종교: {}",
            translate(religion, Religion::from_code, Religion::label)
        ));
    }

    let mut traits: Vec<&str> = keywords.iter().map(String::as_str).collect();
    if !custom.is_empty() {
        traits.push(custom);
    }
    lines.push(format!("- 성격 키워드: {}", traits.join(", ")));
}

fn push_optional(lines: &mut Vec<String>, label: &str, value: &str) {
    if !value.is_empty() {
        lines.push(format!("- {label}: {value}"));
    }
}

fn translate<'a, T>(
    code: &'a str,
    lookup: fn(&str) -> Option<T>,
    label: fn(T) -> &'static str,
) -> &'a str {
    lookup(code).map(label).unwrap_or(code)
}
