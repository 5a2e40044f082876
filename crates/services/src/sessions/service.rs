use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, info};

use exam_core::model::{
    Answer, Question, QuestionId, Section, SessionStats, SessionSummary, SubmitReason, TestId,
    TestMeta, group_by_section,
};
use exam_core::{Clock, Countdown, TickOutcome};

use super::progress::{ConfirmOutcome, SessionProgress, SubmitPrompt};
use crate::error::SessionError;

//
// ─── NAVIGATION TYPES ──────────────────────────────────────────────────────────
//

/// Which panel the session is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionView {
    Dashboard,
    Question,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SubmitState {
    Idle,
    Pending { forced: bool },
    Closed,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory state of one timed attempt at a test.
///
/// Owns the question list, the current position and the countdown. Every
/// mutator fails with `SessionError::SessionClosed` once the session has been
/// submitted.
pub struct TestSession {
    test_id: TestId,
    questions: Vec<Question>,
    current: Option<usize>,
    view: SessionView,
    countdown: Countdown,
    submit: SubmitState,
    clock: Clock,
    started_at: DateTime<Utc>,
    summary: Option<SessionSummary>,
}

impl TestSession {
    /// Create a session for `test`, counting down from its duration.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if no questions are provided and
    /// `SessionError::DuplicateQuestion` if two questions share an id.
    pub fn new(test: &TestMeta, questions: Vec<Question>, clock: Clock) -> Result<Self, SessionError> {
        Self::with_duration(test.id().clone(), questions, test.duration_seconds(), clock)
    }

    /// Create a session with an explicit countdown length in seconds.
    ///
    /// # Errors
    ///
    /// Same as `TestSession::new`.
    pub fn with_duration(
        test_id: TestId,
        questions: Vec<Question>,
        duration_seconds: u32,
        clock: Clock,
    ) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::Empty);
        }
        let mut seen = HashSet::with_capacity(questions.len());
        for q in &questions {
            if !seen.insert(q.id()) {
                return Err(SessionError::DuplicateQuestion(q.id()));
            }
        }

        Ok(Self {
            test_id,
            questions,
            current: None,
            view: SessionView::Dashboard,
            countdown: Countdown::new(duration_seconds),
            submit: SubmitState::Idle,
            started_at: clock.now(),
            clock,
            summary: None,
        })
    }

    #[must_use]
    pub fn test_id(&self) -> &TestId {
        &self.test_id
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id() == id)
    }

    #[must_use]
    pub fn view(&self) -> SessionView {
        self.view
    }

    #[must_use]
    pub fn current_id(&self) -> Option<QuestionId> {
        self.current_question().map(Question::id)
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.current.and_then(|idx| self.questions.get(idx))
    }

    /// True when a question precedes the current one.
    #[must_use]
    pub fn has_prev(&self) -> bool {
        self.current.is_some_and(|idx| idx > 0)
    }

    /// True when a question follows the current one.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.current.is_some_and(|idx| idx + 1 < self.questions.len())
    }

    #[must_use]
    pub fn time_remaining(&self) -> u32 {
        self.countdown.remaining()
    }

    #[must_use]
    pub fn is_time_expired(&self) -> bool {
        self.countdown.is_expired()
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.submit == SubmitState::Closed
    }

    /// Summary produced when the session was submitted.
    #[must_use]
    pub fn summary(&self) -> Option<&SessionSummary> {
        self.summary.as_ref()
    }

    #[must_use]
    pub fn stats(&self) -> SessionStats {
        SessionStats::from_questions(&self.questions)
    }

    #[must_use]
    pub fn sections(&self) -> Vec<Section<'_>> {
        group_by_section(&self.questions)
    }

    /// Submission is permitted once no question is left unseen.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.stats().all_seen()
    }

    /// The open submit dialog, if any.
    #[must_use]
    pub fn submit_prompt(&self) -> Option<SubmitPrompt> {
        match self.submit {
            SubmitState::Pending { forced } => {
                let stats = self.stats();
                Some(SubmitPrompt {
                    stats,
                    permitted: forced || stats.all_seen(),
                    forced,
                })
            }
            SubmitState::Idle | SubmitState::Closed => None,
        }
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            stats: self.stats(),
            position: self.current.map(|idx| idx + 1),
            time_remaining: self.time_remaining(),
            can_submit: self.can_submit(),
            is_closed: self.is_closed(),
        }
    }

    fn ensure_open(&self) -> Result<(), SessionError> {
        if self.is_closed() {
            return Err(SessionError::SessionClosed);
        }
        Ok(())
    }

    fn position(&self, id: QuestionId) -> Result<usize, SessionError> {
        self.questions
            .iter()
            .position(|q| q.id() == id)
            .ok_or(SessionError::InvalidReference(id))
    }

    /// Open a question; the first visit moves it from unseen to unattempted.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidReference` for an unknown id and
    /// `SessionError::SessionClosed` after submission.
    pub fn go_to_question(&mut self, id: QuestionId) -> Result<(), SessionError> {
        self.ensure_open()?;
        let idx = self.position(id)?;
        if self.questions[idx].mark_seen() {
            debug!(test_id = %self.test_id, question = %id, "question seen");
        }
        self.current = Some(idx);
        self.view = SessionView::Question;
        Ok(())
    }

    /// Move to the adjacent question.
    ///
    /// Returns the id moved to, or `None` at a boundary or when no question is
    /// open.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::SessionClosed` after submission.
    pub fn navigate(&mut self, direction: Direction) -> Result<Option<QuestionId>, SessionError> {
        self.ensure_open()?;
        let Some(idx) = self.current else {
            return Ok(None);
        };
        let target = match direction {
            Direction::Next if idx + 1 < self.questions.len() => idx + 1,
            Direction::Prev if idx > 0 => idx - 1,
            _ => return Ok(None),
        };
        let id = self.questions[target].id();
        self.go_to_question(id)?;
        Ok(Some(id))
    }

    /// Return to the dashboard, keeping the current question highlighted.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::SessionClosed` after submission.
    pub fn show_dashboard(&mut self) -> Result<(), SessionError> {
        self.ensure_open()?;
        self.view = SessionView::Dashboard;
        Ok(())
    }

    /// Store an answer, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidReference` for an unknown id,
    /// `SessionError::Question` when the answer does not fit the question
    /// (wrong shape or option out of range) and `SessionError::SessionClosed` after submission.
    pub fn record_answer(&mut self, id: QuestionId, answer: Answer) -> Result<(), SessionError> {
        self.ensure_open()?;
        let idx = self.position(id)?;
        self.questions[idx].record_answer(answer)?;
        debug!(test_id = %self.test_id, question = %id, "answer recorded");
        Ok(())
    }

    /// Flip the review flag and return its new value.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidReference` for an unknown id and
    /// `SessionError::SessionClosed` after submission.
    pub fn toggle_review(&mut self, id: QuestionId) -> Result<bool, SessionError> {
        self.ensure_open()?;
        let idx = self.position(id)?;
        Ok(self.questions[idx].toggle_review())
    }

    /// Advance the countdown by one second.
    ///
    /// Reaching zero opens a forced submit exactly once.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::SessionClosed` after submission.
    pub fn tick(&mut self) -> Result<TickOutcome, SessionError> {
        self.ensure_open()?;
        let outcome = self.countdown.tick();
        if outcome != TickOutcome::Stopped {
            self.clock.advance(Duration::seconds(1));
        }
        if outcome == TickOutcome::Expired {
            info!(test_id = %self.test_id, "time expired, forcing submit");
            self.submit = SubmitState::Pending { forced: true };
        }
        Ok(outcome)
    }

    /// Open the submit dialog.
    ///
    /// The dialog opens even when submitting is not permitted so the stats
    /// stay visible; check `SubmitPrompt::permitted`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::SessionClosed` after submission.
    pub fn request_submit(&mut self) -> Result<SubmitPrompt, SessionError> {
        self.ensure_open()?;
        if self.submit == SubmitState::Idle {
            self.submit = SubmitState::Pending { forced: false };
        }
        let prompt = self.submit_prompt().ok_or(SessionError::SessionClosed)?;
        debug!(
            test_id = %self.test_id,
            permitted = prompt.permitted,
            forced = prompt.forced,
            "submit requested"
        );
        Ok(prompt)
    }

    /// Finalize the session if a permitted submit is pending.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::SessionClosed` if already submitted.
    pub fn confirm_submit(&mut self) -> Result<ConfirmOutcome, SessionError> {
        self.ensure_open()?;
        let Some(prompt) = self.submit_prompt() else {
            return Ok(ConfirmOutcome::NotRequested);
        };
        if !prompt.permitted {
            return Ok(ConfirmOutcome::NotPermitted(prompt.stats));
        }

        let reason = if prompt.forced {
            SubmitReason::TimeExpired
        } else {
            SubmitReason::Manual
        };
        let summary = SessionSummary::new(
            self.test_id.clone(),
            self.started_at,
            self.clock.now(),
            prompt.stats,
            reason,
        );
        self.submit = SubmitState::Closed;
        self.summary = Some(summary.clone());
        info!(
            test_id = %self.test_id,
            ?reason,
            attempted = prompt.stats.attempted,
            unseen = prompt.stats.unseen,
            "session submitted"
        );
        Ok(ConfirmOutcome::Submitted(summary))
    }

    /// Close the submit dialog without finalizing.
    ///
    /// A forced submit stays open.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::SessionClosed` after submission.
    pub fn cancel_submit(&mut self) -> Result<(), SessionError> {
        self.ensure_open()?;
        match self.submit {
            SubmitState::Pending { forced: false } => self.submit = SubmitState::Idle,
            SubmitState::Pending { forced: true } => {
                debug!(test_id = %self.test_id, "forced submit cannot be cancelled");
            }
            SubmitState::Idle | SubmitState::Closed => {}
        }
        Ok(())
    }
}

impl fmt::Debug for TestSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestSession")
            .field("test_id", &self.test_id)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("view", &self.view)
            .field("countdown", &self.countdown)
            .field("submit", &self.submit)
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use exam_core::model::{Difficulty, QuestionError, QuestionKind, QuestionStatus};
    use exam_core::time::{fixed_clock, fixed_now};

    fn build_question(id: u64) -> Question {
        Question::new(
            QuestionId::new(id),
            u32::try_from(id).unwrap(),
            if id % 2 == 0 { "Even" } else { "Odd" },
            QuestionKind::Mcq,
            vec!["a".into(), "b".into(), "c".into()],
            1,
            Difficulty::Medium,
            format!("Question {id}"),
        )
        .unwrap()
    }

    fn build_session(count: u64, seconds: u32) -> TestSession {
        let questions = (1..=count).map(build_question).collect();
        TestSession::with_duration(TestId::new("mock-test-1"), questions, seconds, fixed_clock())
            .unwrap()
    }

    fn qid(id: u64) -> QuestionId {
        QuestionId::new(id)
    }

    #[test]
    fn new_session_starts_on_dashboard() {
        let session = build_session(3, 60);
        assert_eq!(session.view(), SessionView::Dashboard);
        assert_eq!(session.current_id(), None);
        assert_eq!(session.time_remaining(), 60);
        assert_eq!(session.stats().unseen, 3);
        assert_eq!(session.started_at(), fixed_now());
    }

    #[test]
    fn empty_session_returns_error() {
        let err = TestSession::with_duration(TestId::new("t"), Vec::new(), 60, fixed_clock())
            .unwrap_err();
        assert!(matches!(err, SessionError::Empty));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let questions = vec![build_question(1), build_question(1)];
        let err = TestSession::with_duration(TestId::new("t"), questions, 60, fixed_clock())
            .unwrap_err();
        assert!(matches!(err, SessionError::DuplicateQuestion(id) if id == qid(1)));
    }

    #[test]
    fn duration_comes_from_test_meta() {
        let meta = TestMeta::new(TestId::new("t"), "Timed", 2, 1).unwrap();
        let session = TestSession::new(&meta, vec![build_question(1)], fixed_clock()).unwrap();
        assert_eq!(session.time_remaining(), 120);
        assert_eq!(session.test_id(), &TestId::new("t"));
    }

    #[test]
    fn go_to_question_marks_seen_once() {
        let mut session = build_session(2, 60);
        session.go_to_question(qid(2)).unwrap();
        assert_eq!(session.view(), SessionView::Question);
        assert_eq!(session.current_id(), Some(qid(2)));
        assert_eq!(session.question(qid(2)).unwrap().status(), QuestionStatus::Unattempted);

        session.go_to_question(qid(2)).unwrap();
        assert_eq!(session.question(qid(2)).unwrap().status(), QuestionStatus::Unattempted);
        assert_eq!(session.stats().unseen, 1);
    }

    #[test]
    fn go_to_unknown_question_is_invalid_reference() {
        let mut session = build_session(2, 60);
        let err = session.go_to_question(qid(99)).unwrap_err();
        assert!(matches!(err, SessionError::InvalidReference(id) if id == qid(99)));
        assert_eq!(session.view(), SessionView::Dashboard);
    }

    #[test]
    fn navigate_stops_at_boundaries() {
        let mut session = build_session(3, 60);
        assert_eq!(session.navigate(Direction::Next).unwrap(), None);

        session.go_to_question(qid(1)).unwrap();
        assert!(!session.has_prev());
        assert_eq!(session.navigate(Direction::Prev).unwrap(), None);
        assert_eq!(session.current_id(), Some(qid(1)));

        assert_eq!(session.navigate(Direction::Next).unwrap(), Some(qid(2)));
        assert_eq!(session.navigate(Direction::Next).unwrap(), Some(qid(3)));
        assert!(!session.has_next());
        assert_eq!(session.navigate(Direction::Next).unwrap(), None);
        assert_eq!(session.current_id(), Some(qid(3)));
        assert_eq!(session.navigate(Direction::Prev).unwrap(), Some(qid(2)));
    }

    #[test]
    fn show_dashboard_keeps_current_question() {
        let mut session = build_session(2, 60);
        session.go_to_question(qid(2)).unwrap();
        session.show_dashboard().unwrap();
        assert_eq!(session.view(), SessionView::Dashboard);
        assert_eq!(session.current_id(), Some(qid(2)));
    }

    #[test]
    fn record_answer_propagates_type_errors() {
        let mut session = build_session(1, 60);
        let err = session
            .record_answer(qid(1), Answer::Text("a".into()))
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::Question(QuestionError::InvalidAnswerType { .. })
        ));
        let err = session.record_answer(qid(1), Answer::Choice(9)).unwrap_err();
        assert!(matches!(
            err,
            SessionError::Question(QuestionError::OptionOutOfRange { index: 9, len: 3, .. })
        ));
        let err = session.record_answer(qid(7), Answer::Choice(0)).unwrap_err();
        assert!(matches!(err, SessionError::InvalidReference(_)));
        assert_eq!(session.stats().attempted, 0);
    }

    #[test]
    fn record_answer_counts_as_attempted_even_unseen() {
        let mut session = build_session(2, 60);
        session.record_answer(qid(2), Answer::Choice(1)).unwrap();
        let stats = session.stats();
        assert_eq!(stats.attempted, 1);
        assert_eq!(stats.unseen, 1);
        assert_eq!(session.question(qid(2)).unwrap().status(), QuestionStatus::Attempted);
    }

    #[test]
    fn toggle_review_twice_restores_flag() {
        let mut session = build_session(1, 60);
        assert!(session.toggle_review(qid(1)).unwrap());
        assert_eq!(session.stats().marked, 1);
        assert!(!session.toggle_review(qid(1)).unwrap());
        assert_eq!(session.stats().marked, 0);
    }

    #[test]
    fn submit_is_permitted_only_when_all_seen() {
        let mut session = build_session(5, 60);
        for id in 1..=4 {
            session.go_to_question(qid(id)).unwrap();
        }
        assert!(!session.can_submit());
        let prompt = session.request_submit().unwrap();
        assert!(!prompt.permitted);
        assert!(matches!(
            session.confirm_submit().unwrap(),
            ConfirmOutcome::NotPermitted(stats) if stats.unseen == 1
        ));
        assert!(!session.is_closed());

        session.go_to_question(qid(5)).unwrap();
        assert!(session.can_submit());
        assert!(session.submit_prompt().unwrap().permitted);
        let ConfirmOutcome::Submitted(summary) = session.confirm_submit().unwrap() else {
            panic!("expected submission");
        };
        assert_eq!(summary.reason(), SubmitReason::Manual);
        assert_eq!(summary.stats().unattempted, 5);
        assert!(session.is_closed());
    }

    #[test]
    fn confirm_without_request_is_a_no_op() {
        let mut session = build_session(1, 60);
        session.go_to_question(qid(1)).unwrap();
        assert_eq!(session.confirm_submit().unwrap(), ConfirmOutcome::NotRequested);
        assert!(!session.is_closed());
    }

    #[test]
    fn cancel_submit_closes_the_dialog_only() {
        let mut session = build_session(1, 60);
        session.go_to_question(qid(1)).unwrap();
        session.request_submit().unwrap();
        session.toggle_review(qid(1)).unwrap();
        session.cancel_submit().unwrap();
        assert!(session.submit_prompt().is_none());
        assert_eq!(session.current_id(), Some(qid(1)));
        assert!(session.question(qid(1)).unwrap().is_marked_for_review());
    }

    #[test]
    fn mutations_after_submit_are_rejected() {
        let mut session = build_session(1, 60);
        session.go_to_question(qid(1)).unwrap();
        session.request_submit().unwrap();
        session.confirm_submit().unwrap();

        assert!(matches!(session.go_to_question(qid(1)), Err(SessionError::SessionClosed)));
        assert!(matches!(session.navigate(Direction::Next), Err(SessionError::SessionClosed)));
        assert!(matches!(
            session.record_answer(qid(1), Answer::Choice(0)),
            Err(SessionError::SessionClosed)
        ));
        assert!(matches!(session.toggle_review(qid(1)), Err(SessionError::SessionClosed)));
        assert!(matches!(session.tick(), Err(SessionError::SessionClosed)));
        assert!(matches!(session.request_submit(), Err(SessionError::SessionClosed)));
        assert!(matches!(session.confirm_submit(), Err(SessionError::SessionClosed)));
        assert!(matches!(session.cancel_submit(), Err(SessionError::SessionClosed)));
        assert!(matches!(session.show_dashboard(), Err(SessionError::SessionClosed)));
    }

    #[test]
    fn expiry_forces_submit_exactly_once() {
        let mut session = build_session(2, 3);
        assert_eq!(session.tick().unwrap(), TickOutcome::Running { remaining: 2 });
        assert_eq!(session.tick().unwrap(), TickOutcome::Running { remaining: 1 });
        assert!(session.submit_prompt().is_none());
        assert_eq!(session.tick().unwrap(), TickOutcome::Expired);

        let prompt = session.submit_prompt().unwrap();
        assert!(prompt.forced);
        assert!(prompt.permitted);

        assert_eq!(session.tick().unwrap(), TickOutcome::Stopped);
        assert_eq!(session.time_remaining(), 0);
    }

    #[test]
    fn forced_submit_ignores_unseen_and_cannot_be_cancelled() {
        let mut session = build_session(2, 1);
        session.go_to_question(qid(1)).unwrap();
        session.tick().unwrap();

        session.cancel_submit().unwrap();
        assert!(session.submit_prompt().is_some_and(|p| p.forced));

        let ConfirmOutcome::Submitted(summary) = session.confirm_submit().unwrap() else {
            panic!("expected forced submission");
        };
        assert_eq!(summary.reason(), SubmitReason::TimeExpired);
        assert_eq!(summary.stats().unseen, 1);
        assert_eq!(summary.submitted_at(), fixed_now() + Duration::seconds(1));
    }

    #[test]
    fn manual_request_is_upgraded_by_expiry() {
        let mut session = build_session(2, 1);
        let prompt = session.request_submit().unwrap();
        assert!(!prompt.permitted);
        session.tick().unwrap();
        let prompt = session.request_submit().unwrap();
        assert!(prompt.forced && prompt.permitted);
    }

    #[test]
    fn progress_reports_position() {
        let mut session = build_session(3, 60);
        assert_eq!(session.progress().position, None);
        session.go_to_question(qid(2)).unwrap();
        let progress = session.progress();
        assert_eq!(progress.position, Some(2));
        assert_eq!(progress.time_remaining, 60);
        assert!(!progress.can_submit);
    }

    #[test]
    fn sections_follow_question_order() {
        let session = build_session(4, 60);
        let sections = session.sections();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].name, "Odd");
        assert_eq!(sections[1].questions.len(), 2);
    }
}
