use tracing::{debug, warn};

use exam_core::model::TestId;

use crate::error::{FullscreenError, GateError};

/// Message shown when the host refuses to enter fullscreen.
pub const FULLSCREEN_FAILED_NOTICE: &str = "Unable to enter fullscreen mode. Please try again.";

/// Host capability for switching the test window to fullscreen.
pub trait FullscreenPresenter: Send + Sync {
    /// Request fullscreen for the session window.
    ///
    /// # Errors
    ///
    /// Returns `FullscreenError` if the host refuses the request.
    fn enter_fullscreen(&self) -> Result<(), FullscreenError>;

    /// Leave fullscreen after the session ends.
    fn exit_fullscreen(&self) {}
}

/// Presenter for hosts without a window, such as tests and the CLI.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFullscreen;

impl FullscreenPresenter for NoFullscreen {
    fn enter_fullscreen(&self) -> Result<(), FullscreenError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GatePhase {
    #[default]
    Agreement,
    FullscreenPrompt,
    Passed,
}

/// Proof that the start gate was passed for a test.
///
/// Only `StartGate::enter_fullscreen` creates one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatePass {
    test_id: TestId,
}

impl GatePass {
    #[must_use]
    pub fn test_id(&self) -> &TestId {
        &self.test_id
    }
}

/// Pre-session gate: accept the instructions, then enter fullscreen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartGate {
    test_id: TestId,
    agreed: bool,
    phase: GatePhase,
    notice: Option<String>,
}

impl StartGate {
    #[must_use]
    pub fn new(test_id: TestId) -> Self {
        Self {
            test_id,
            agreed: false,
            phase: GatePhase::Agreement,
            notice: None,
        }
    }

    #[must_use]
    pub fn test_id(&self) -> &TestId {
        &self.test_id
    }

    #[must_use]
    pub fn is_agreed(&self) -> bool {
        self.agreed
    }

    #[must_use]
    pub fn phase(&self) -> GatePhase {
        self.phase
    }

    /// Last fullscreen failure, cleared by the next attempt.
    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// The start button is enabled only after agreeing.
    #[must_use]
    pub fn can_start(&self) -> bool {
        self.agreed && self.phase == GatePhase::Agreement
    }

    pub fn set_agreed(&mut self, agreed: bool) {
        if self.phase == GatePhase::Agreement {
            self.agreed = agreed;
        }
    }

    /// Move from the instructions to the fullscreen prompt.
    ///
    /// # Errors
    ///
    /// Returns `GateError::NotAgreed` until the agreement box is checked.
    pub fn request_start(&mut self) -> Result<(), GateError> {
        if !self.agreed {
            return Err(GateError::NotAgreed);
        }
        if self.phase == GatePhase::Agreement {
            self.phase = GatePhase::FullscreenPrompt;
            debug!(test_id = %self.test_id, "fullscreen prompt shown");
        }
        Ok(())
    }

    /// Close the fullscreen prompt and go back to the instructions.
    pub fn dismiss_prompt(&mut self) {
        if self.phase == GatePhase::FullscreenPrompt {
            self.phase = GatePhase::Agreement;
            self.notice = None;
        }
    }

    /// Ask the host for fullscreen and pass the gate on success.
    ///
    /// A failure keeps the prompt open with a notice so the user can retry.
    ///
    /// # Errors
    ///
    /// Returns `GateError::NotAgreed` before the prompt was reached and
    /// `GateError::Fullscreen` when the presenter fails.
    pub fn enter_fullscreen(
        &mut self,
        presenter: &dyn FullscreenPresenter,
    ) -> Result<GatePass, GateError> {
        match self.phase {
            GatePhase::Agreement => return Err(GateError::NotAgreed),
            GatePhase::FullscreenPrompt | GatePhase::Passed => {}
        }

        self.notice = None;
        if let Err(err) = presenter.enter_fullscreen() {
            warn!(test_id = %self.test_id, error = %err, "fullscreen request failed");
            self.notice = Some(FULLSCREEN_FAILED_NOTICE.to_owned());
            return Err(GateError::Fullscreen(err.0));
        }

        self.phase = GatePhase::Passed;
        Ok(GatePass {
            test_id: self.test_id.clone(),
        })
    }
}
