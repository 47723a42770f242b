use super::common::*;
use crate::analysis::{AnalyzeError, AnalyzeErrorCode, NoticeTone};
use crate::config::ContactLinks;
use crate::consultation::{FormField, FormPhase, FormStep};

#[tokio::test]
async fn successful_submission_reveals_the_analysis() {
    let client = CountingClient::succeeding();
    let mut controller = ready_controller();

    assert!(controller.submit(&client).await);
    assert_eq!(controller.phase(), FormPhase::Revealed);
    assert_eq!(controller.analysis(), Some(&sample_analysis()));
    assert_eq!(client.calls(), 1);

    let report = controller
        .report(ContactLinks::default())
        .expect("report available once revealed");
    assert!(!report.is_unlocked());
}

#[tokio::test]
async fn second_submission_while_in_flight_is_refused() {
    let client = CountingClient::succeeding();
    let mut controller = ready_controller();

    let pending = controller.begin_submission().expect("first submission starts");
    assert!(controller.is_submitting());
    assert!(controller.begin_submission().is_none());
    assert!(!controller.submit(&client).await);

    let result = pending.run(&client).await;
    controller.finish_submission(result);

    assert_eq!(client.calls(), 1);
    assert_eq!(controller.phase(), FormPhase::Revealed);
}

#[tokio::test]
async fn failure_returns_to_last_step_with_notice() {
    let client = CountingClient::failing(AnalyzeError::network());
    let mut controller = ready_controller();
    let before = controller.form().clone();

    assert!(controller.submit(&client).await);

    assert_eq!(controller.phase(), FormPhase::Editing(FormStep::Breakup));
    assert_eq!(controller.form(), &before);
    assert!(controller.analysis().is_none());
    let notice = controller.submit_error().expect("notice surfaced");
    assert_eq!(notice.code, AnalyzeErrorCode::NetworkError);
    assert_eq!(notice.tone, NoticeTone::Critical);

    controller.set_text(FormField::AdditionalInfo, "공통 친구가 많습니다.");
    assert!(controller.submit_error().is_none());
}

#[tokio::test]
async fn short_breakup_detail_never_reaches_the_client() {
    let client = CountingClient::succeeding();
    let mut controller = ready_controller();
    controller.set_text(FormField::BreakupReasonDetail, "그냥 헤어졌어요");

    assert!(!controller.submit(&client).await);
    assert_eq!(client.calls(), 0);
    assert_eq!(
        controller.validation_error(),
        Some("이별 사유 상세 설명은 20자 이상 입력해주세요.")
    );
}

#[test]
fn submission_only_starts_from_the_last_step() {
    let mut controller = ready_controller();
    controller.back();
    assert!(controller.begin_submission().is_none());
    assert_eq!(controller.current_step(), Some(FormStep::Relationship));
}

#[test]
fn edits_are_ignored_while_submitting_and_after_reveal() {
    let mut controller = ready_controller();
    let _pending = controller.begin_submission().expect("starts");
    assert!(!controller.set_text(FormField::MyAge, "40"));

    controller.finish_submission(Ok(sample_analysis()));
    assert!(!controller.set_text(FormField::MyAge, "40"));
    assert!(!controller.next());
    assert!(!controller.back());
    assert_eq!(controller.form().my_age, "27");
}

#[test]
fn stray_results_are_dropped() {
    let mut controller = ready_controller();
    controller.finish_submission(Ok(sample_analysis()));
    assert_eq!(controller.phase(), FormPhase::Editing(FormStep::Breakup));
    assert!(controller.analysis().is_none());
}

#[test]
fn reset_starts_a_fresh_session() {
    let mut controller = ready_controller();
    let _pending = controller.begin_submission().expect("starts");
    controller.finish_submission(Err(AnalyzeError::validation("나이를 확인해주세요.")));
    controller.reset();

    assert_eq!(controller.phase(), FormPhase::Editing(FormStep::Basics));
    assert!(controller.form().my_gender.is_empty());
    assert!(controller.submit_error().is_none());
}
