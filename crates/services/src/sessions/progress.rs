use exam_core::model::{SessionStats, SessionSummary};

/// State of the submit confirmation dialog, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitPrompt {
    pub stats: SessionStats,
    /// Whether confirming will finalize the session.
    pub permitted: bool,
    /// Opened by time expiry; cannot be cancelled.
    pub forced: bool,
}

/// Result of `TestSession::confirm_submit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// The session is closed; the summary is the handoff value.
    Submitted(SessionSummary),
    /// Some questions are still unseen; nothing changed.
    NotPermitted(SessionStats),
    /// No submit was requested; nothing changed.
    NotRequested,
}

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    pub stats: SessionStats,
    /// 1-based position of the current question, if one is open.
    pub position: Option<usize>,
    pub time_remaining: u32,
    pub can_submit: bool,
    pub is_closed: bool,
}
