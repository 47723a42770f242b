use reunion_ai::analysis::ErrorNotice;
use reunion_ai::consultation::ValidationIssue;
use reunion_ai::report::{ReconciliationReport, RevealState};

const BAR_WIDTH: usize = 20;

fn bar(score: u8) -> String {
    let filled = usize::from(score) * BAR_WIDTH / 100;
    format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

/// Plain-text rendering of a report in its current reveal state.
pub(crate) fn render_report(report: &ReconciliationReport) -> String {
    let headline = report.headline();
    let mut lines = vec![
        "재회 가능성 분석 리포트".to_string(),
        format!(
            "재회 가능 확률: {}% ({})",
            headline.probability, headline.level_label
        ),
        headline.note.to_string(),
        String::new(),
        "재회 가능한 확률에 대한 요인 분석".to_string(),
    ];

    for card in report.factor_cards() {
        if card.obscured {
            lines.push(format!("  {:<8} [잠김]", card.title));
            continue;
        }
        lines.push(format!(
            "  {:<8} {} {:>3}점",
            card.title,
            bar(card.score),
            card.score
        ));
        if let Some(analysis) = &card.analysis {
            lines.push(format!("    {analysis}"));
        }
    }

    match report.reveal_state() {
        RevealState::Locked => {
            lines.push(String::new());
            lines.push("광고 보고 전체 리포트 보기 (--watch-ad)".to_string());
        }
        RevealState::AdPlaying { remaining } => {
            lines.push(String::new());
            lines.push(format!("광고 시청 중... ({remaining}초)"));
        }
        RevealState::Unlocked => {}
    }

    if let Some(sections) = report.extended_sections() {
        for section in [&sections.partner_psychology, &sections.final_advice] {
            lines.push(String::new());
            lines.push(section.title.to_string());
            lines.extend(
                section
                    .items
                    .iter()
                    .map(|item| format!("  - {}: {}", item.title, item.text)),
            );
        }

        let plan = &sections.action_plan;
        lines.push(String::new());
        lines.push(plan.title.to_string());
        lines.extend(
            plan.steps
                .iter()
                .map(|step| format!("  - {}: {}", step.title, step.text)),
        );
        lines.extend(plan.considerations.iter().map(|item| format!("  * {item}")));
        if !plan.maintenance_introduction.is_empty() {
            lines.push(format!("  {}", plan.maintenance_introduction));
        }
        lines.extend(
            plan.maintenance_tips
                .iter()
                .map(|tip| format!("  - {}: {}", tip.title, tip.description)),
        );

        let contact = &sections.contact;
        lines.push(String::new());
        lines.push(contact.title.to_string());
        lines.push(format!("  {}", contact.description));
        if let Some(url) = &contact.instagram_url {
            lines.push(format!("  Instagram: {url}"));
        }
        if let Some(url) = &contact.telegram_url {
            lines.push(format!("  Telegram: {url}"));
        }
        if contact.setup_required {
            lines.push("  운영자 설정 필요: INSTAGRAM_DM_URL 또는 TELEGRAM_DM_URL".to_string());
        }
    }

    lines.push(String::new());
    lines.join("\n")
}

pub(crate) fn render_issues(issues: &[ValidationIssue]) -> String {
    if issues.is_empty() {
        return "입력값이 모두 올바릅니다.\n".to_string();
    }
    issues
        .iter()
        .map(|issue| {
            format!(
                "  [{}단계] {}: {}\n",
                issue.field.step().number(),
                issue.field.key(),
                issue.message
            )
        })
        .collect()
}

pub(crate) fn render_notice(notice: &ErrorNotice) -> String {
    format!(
        "{} ({})\n  {}\n  {}\n",
        notice.title, notice.code, notice.description, notice.recovery
    )
}
