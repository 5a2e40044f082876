use std::sync::Arc;
use std::time::Duration;

use dioxus::prelude::ReadableExt;
use exam_core::model::{Answer, QuestionId, SessionStats, SessionSummary, SubmitReason, TestId};
use exam_core::time::fixed_now;
use services::{FullscreenError, FullscreenPresenter};
use storage::Storage;

use super::test_harness::{ViewHarness, ViewKind, setup_view_harness, setup_view_harness_with};
use crate::vm::SessionIntent;

struct DeniedFullscreen;

impl FullscreenPresenter for DeniedFullscreen {
    fn enter_fullscreen(&self) -> Result<(), FullscreenError> {
        Err(FullscreenError("window refused".into()))
    }
}

async fn settle(harness: &mut ViewHarness) {
    for _ in 0..3 {
        harness.drive_async().await;
    }
}

async fn open_start_page(test_id: &str) -> ViewHarness {
    let mut harness = setup_view_harness(ViewKind::TestStart(test_id.to_owned()));
    harness.rebuild();
    settle(&mut harness).await;
    harness
}

fn timer_text(html: &str) -> String {
    let marker = "id=\"session-timer\"";
    let start = html.find(marker).expect("timer rendered");
    let rest = &html[start..];
    let open = rest.find('>').expect("timer tag closes") + 1;
    let close = rest[open..].find('<').expect("timer text ends") + open;
    rest[open..close].to_owned()
}

async fn advance_seconds(harness: &mut ViewHarness, seconds: u64) {
    for _ in 0..seconds {
        tokio::time::advance(Duration::from_secs(1)).await;
        harness.drive_async().await;
    }
}

async fn start_session(harness: &mut ViewHarness) {
    harness.act(|h| h.agree().call(true));
    harness.act(|h| h.start().call(()));
    harness.act(|h| h.enter().call(()));
    settle(harness).await;
}

#[tokio::test(flavor = "current_thread")]
async fn catalog_view_smoke_renders_cards() {
    let mut harness = setup_view_harness(ViewKind::Catalog);
    harness.rebuild();
    settle(&mut harness).await;

    let html = harness.render();
    assert!(html.contains("Mock Tests"), "missing title in {html}");
    assert!(html.contains("General Aptitude Mock Test 1"), "missing card in {html}");
    assert!(html.contains("Advanced Mechanics"), "missing card in {html}");
    assert!(html.contains("8 Questions"), "missing count in {html}");
    assert!(html.contains("60 minutes"), "missing duration in {html}");
    assert!(html.contains("Physics"), "missing subject option in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn catalog_view_smoke_shows_last_submission() {
    let mut harness = setup_view_harness(ViewKind::Catalog);
    let stats = SessionStats {
        total: 3,
        attempted: 2,
        unattempted: 1,
        unseen: 0,
        marked: 0,
    };
    harness.context.record_submission(SessionSummary::new(
        TestId::new("mock-test-3"),
        fixed_now(),
        fixed_now(),
        stats,
        SubmitReason::Manual,
    ));
    harness.rebuild();
    settle(&mut harness).await;

    let html = harness.render();
    assert!(html.contains("Test submitted"), "missing banner in {html}");
    assert!(html.contains("2 of 3 attempted"), "missing stats in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn unknown_test_renders_not_found() {
    let harness = open_start_page("mock-test-404").await;
    let html = harness.render();
    assert!(html.contains("This test is not available."), "missing error in {html}");
    assert!(html.contains("Back to Mock Tests"), "missing link in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn start_page_renders_instructions() {
    let harness = open_start_page("mock-test-1").await;
    let html = harness.render();
    assert!(html.contains("General Aptitude Mock Test 1"), "missing title in {html}");
    assert!(html.contains("Instructions"), "missing instructions in {html}");
    assert!(html.contains("Test Components"), "missing components in {html}");
    assert!(html.contains("Quantitative Aptitude"), "missing component in {html}");
    assert!(
        html.contains("Please agree to the instructions to start the test"),
        "missing agreement hint in {html}"
    );
    assert!(!html.contains("Enter Fullscreen"), "prompt shown too early in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn start_flow_opens_prompt_then_session() {
    let mut harness = open_start_page("mock-test-3").await;

    harness.act(|h| h.agree().call(true));
    harness.act(|h| h.start().call(()));
    let html = harness.render();
    assert!(html.contains("Enter Full-Screen Mode"), "missing prompt in {html}");

    harness.act(|h| h.enter().call(()));
    settle(&mut harness).await;
    let html = harness.render();
    assert!(html.contains("00:45:00"), "missing timer in {html}");
    assert!(html.contains("Total Questions"), "missing dashboard in {html}");
    assert!(html.contains("Data Structures"), "missing section in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn fullscreen_failure_shows_retry_notice() {
    let mut harness = setup_view_harness_with(
        ViewKind::TestStart("mock-test-2".to_owned()),
        Storage::bundled().unwrap(),
        Arc::new(DeniedFullscreen),
    );
    harness.rebuild();
    settle(&mut harness).await;
    start_session(&mut harness).await;

    let html = harness.render();
    assert!(
        html.contains("Unable to enter fullscreen mode. Please try again."),
        "missing notice in {html}"
    );
    assert!(!html.contains("Time Remaining"), "session started anyway in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn session_intents_update_question_view() {
    let mut harness = open_start_page("mock-test-3").await;
    start_session(&mut harness).await;

    harness.act(|h| h.dispatch().call(SessionIntent::OpenQuestion(QuestionId::new(1))));
    let html = harness.render();
    assert!(html.contains("Question 1 of 3"), "missing position in {html}");
    assert!(html.contains("MCQ"), "missing kind in {html}");
    assert!(html.contains("Mark for Review"), "missing review button in {html}");

    harness.act(|h| {
        h.dispatch()
            .call(SessionIntent::Answer(QuestionId::new(1), Answer::Choice(1)));
        h.dispatch().call(SessionIntent::ToggleReview(QuestionId::new(1)));
    });
    let html = harness.render();
    assert!(html.contains("Unmark Review"), "review not toggled in {html}");
    assert!(html.contains("1 of 3 answered"), "header count stale in {html}");

    let vm = harness.handles.as_ref().unwrap().vm();
    let stats = harness
        .dom
        .in_runtime(|| vm.read().as_ref().map(|vm| vm.session().stats()))
        .unwrap();
    assert_eq!(stats.attempted, 1);
    assert_eq!(stats.marked, 1);
}

#[tokio::test(flavor = "current_thread")]
async fn confirmed_submit_records_summary() {
    let mut harness = open_start_page("mock-test-3").await;
    start_session(&mut harness).await;

    for id in 1..=3 {
        harness.act(|h| h.dispatch().call(SessionIntent::OpenQuestion(QuestionId::new(id))));
    }
    harness.act(|h| h.dispatch().call(SessionIntent::RequestSubmit));
    let html = harness.render();
    assert!(
        html.contains("Are you sure you want to submit your test?"),
        "missing modal in {html}"
    );

    harness.act(|h| h.dispatch().call(SessionIntent::ConfirmSubmit));
    let summary = harness.context.last_submission().expect("submission recorded");
    assert_eq!(summary.reason(), SubmitReason::Manual);
    assert_eq!(summary.stats().unseen, 0);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn countdown_ticks_across_dashboard_and_question_views() {
    let mut harness = open_start_page("mock-test-3").await;
    start_session(&mut harness).await;
    assert_eq!(timer_text(&harness.render()), "00:45:00");

    advance_seconds(&mut harness, 3).await;
    let on_dashboard = timer_text(&harness.render());
    assert!(on_dashboard.as_str() < "00:45:00", "timer stuck at {on_dashboard}");

    harness.act(|h| h.dispatch().call(SessionIntent::OpenQuestion(QuestionId::new(2))));
    advance_seconds(&mut harness, 3).await;
    let html = harness.render();
    assert!(html.contains("Question 2 of 3"), "question view lost in {html}");
    let on_question = timer_text(&html);
    assert!(
        on_question < on_dashboard,
        "timer stopped in question view: {on_dashboard} then {on_question}"
    );

    let vm = harness.handles.as_ref().unwrap().vm();
    let remaining = harness
        .dom
        .in_runtime(|| vm.read().as_ref().map(|vm| vm.session().time_remaining()))
        .unwrap();
    assert!(remaining < 45 * 60);
}
