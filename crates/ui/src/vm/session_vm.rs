use std::collections::HashSet;

use exam_core::TickOutcome;
use exam_core::model::{Answer, QuestionId, SessionSummary, TestId};
use services::{
    ConfirmOutcome, Direction, GatePass, SessionError, SessionLoopService, SessionView,
    SubmitPrompt, TestSession,
};
use tracing::warn;

use crate::views::ViewError;
use crate::vm::dashboard_vm::{DashboardVm, SectionVm, map_sections, map_stat_tiles};
use crate::vm::question_vm::{QuestionVm, map_question};
use crate::vm::time_fmt::{format_countdown, is_low_time};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionIntent {
    OpenQuestion(QuestionId),
    Navigate(Direction),
    ShowDashboard,
    Answer(QuestionId, Answer),
    ToggleReview(QuestionId),
    ToggleSection(String),
    RequestSubmit,
    ConfirmSubmit,
    CancelSubmit,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionOutcome {
    Continue,
    Submitted(SessionSummary),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderVm {
    pub title: String,
    pub position_label: Option<String>,
    pub answered_label: String,
    pub time_label: String,
    pub low_time: bool,
    pub submit_disabled: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmitModalVm {
    pub total: usize,
    pub attempted: usize,
    pub unattempted: usize,
    pub unseen: usize,
    pub marked: usize,
    pub message: String,
    pub can_confirm: bool,
    pub can_cancel: bool,
}

impl From<SubmitPrompt> for SubmitModalVm {
    fn from(prompt: SubmitPrompt) -> Self {
        let stats = prompt.stats;
        let message = if prompt.forced {
            "Time is up. Your answers will be submitted now.".to_owned()
        } else if prompt.permitted {
            "Are you sure you want to submit your test?".to_owned()
        } else {
            format!(
                "Open every question before submitting. {} still unseen.",
                stats.unseen
            )
        };
        Self {
            total: stats.total,
            attempted: stats.attempted,
            unattempted: stats.unattempted,
            unseen: stats.unseen,
            marked: stats.marked,
            message,
            can_confirm: prompt.permitted,
            can_cancel: !prompt.forced,
        }
    }
}

/// UI wrapper around a running `TestSession`.
pub struct SessionVm {
    title: String,
    session: TestSession,
    collapsed: HashSet<String>,
}

impl SessionVm {
    #[must_use]
    pub fn new(title: impl Into<String>, session: TestSession) -> Self {
        Self {
            title: title.into(),
            session,
            collapsed: HashSet::new(),
        }
    }

    #[must_use]
    pub fn session(&self) -> &TestSession {
        &self.session
    }

    #[must_use]
    pub fn test_id(&self) -> &TestId {
        self.session.test_id()
    }

    #[must_use]
    pub fn view(&self) -> SessionView {
        self.session.view()
    }

    #[must_use]
    pub fn is_section_collapsed(&self, name: &str) -> bool {
        self.collapsed.contains(name)
    }

    /// Advance the countdown by one second.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::SessionClosed` once submitted.
    pub fn tick(&mut self) -> Result<TickOutcome, SessionError> {
        self.session.tick()
    }

    /// # Errors
    ///
    /// Returns `ViewError::Closed` after submission, `ViewError::InvalidAnswer`
    /// for an answer that does not fit its question and `ViewError::Unknown`
    /// for other rejected intents.
    pub fn dispatch(
        &mut self,
        session_loop: &SessionLoopService,
        intent: SessionIntent,
    ) -> Result<SessionOutcome, ViewError> {
        let session = &mut self.session;
        let result = match intent {
            SessionIntent::OpenQuestion(id) => session.go_to_question(id),
            SessionIntent::Navigate(direction) => session.navigate(direction).map(|_| ()),
            SessionIntent::ShowDashboard => session.show_dashboard(),
            SessionIntent::Answer(id, answer) => session.record_answer(id, answer),
            SessionIntent::ToggleReview(id) => session.toggle_review(id).map(|_| ()),
            SessionIntent::ToggleSection(name) => {
                if !self.collapsed.remove(&name) {
                    self.collapsed.insert(name);
                }
                Ok(())
            }
            SessionIntent::RequestSubmit => session.request_submit().map(|_| ()),
            SessionIntent::CancelSubmit => session.cancel_submit(),
            SessionIntent::ConfirmSubmit => {
                return match session_loop.confirm_submit(session) {
                    Ok(ConfirmOutcome::Submitted(summary)) => Ok(SessionOutcome::Submitted(summary)),
                    Ok(ConfirmOutcome::NotPermitted(_) | ConfirmOutcome::NotRequested) => {
                        Ok(SessionOutcome::Continue)
                    }
                    Err(err) => Err(intent_error(&err)),
                };
            }
        };
        result.map_err(|err| intent_error(&err))?;
        Ok(SessionOutcome::Continue)
    }

    #[must_use]
    pub fn header(&self) -> HeaderVm {
        let progress = self.session.progress();
        let position_label = match self.session.view() {
            SessionView::Question => progress
                .position
                .map(|position| format!("Question {position} of {}", progress.stats.total)),
            SessionView::Dashboard => None,
        };
        HeaderVm {
            title: self.title.clone(),
            position_label,
            answered_label: format!(
                "{} of {} answered",
                progress.stats.attempted, progress.stats.total
            ),
            time_label: format_countdown(progress.time_remaining),
            low_time: is_low_time(progress.time_remaining),
            submit_disabled: !progress.can_submit || progress.is_closed,
        }
    }

    #[must_use]
    pub fn sections(&self) -> Vec<SectionVm> {
        map_sections(
            &self.session.sections(),
            self.session.current_id(),
            &self.collapsed,
        )
    }

    #[must_use]
    pub fn dashboard(&self) -> DashboardVm {
        DashboardVm {
            stats: map_stat_tiles(&self.session.stats()),
            sections: self.sections(),
        }
    }

    #[must_use]
    pub fn question(&self) -> Option<QuestionVm> {
        if self.session.view() != SessionView::Question {
            return None;
        }
        let current = self.session.current_question()?;
        let questions = self.session.questions();
        let position = questions.iter().position(|q| q.id() == current.id())?;
        Some(map_question(current, position, questions.len()))
    }

    #[must_use]
    pub fn submit_modal(&self) -> Option<SubmitModalVm> {
        self.session.submit_prompt().map(SubmitModalVm::from)
    }
}

fn intent_error(err: &SessionError) -> ViewError {
    warn!(error = %err, "session intent rejected");
    match err {
        SessionError::SessionClosed => ViewError::Closed,
        SessionError::Question(_) => ViewError::InvalidAnswer,
        _ => ViewError::Unknown,
    }
}

/// # Errors
///
/// Returns `ViewError::NotFound` for an unknown or empty test,
/// `ViewError::Gate` when `pass` does not cover the test and
/// `ViewError::Unknown` for other failures.
pub async fn start_session(
    session_loop: &SessionLoopService,
    title: &str,
    test_id: &TestId,
    pass: &GatePass,
) -> Result<SessionVm, ViewError> {
    let session = match session_loop.start_session(test_id, pass).await {
        Ok(session) => session,
        Err(SessionError::UnknownTest(_) | SessionError::Empty) => {
            return Err(ViewError::NotFound);
        }
        Err(SessionError::Gate(_)) => return Err(ViewError::Gate),
        Err(_) => return Err(ViewError::Unknown),
    };

    Ok(SessionVm::new(title, session))
}
