use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Question, QuestionStatus, TestId};

/// Counters over a session's question list.
///
/// `attempted` counts questions holding an answer; the other counters are
/// read from the question status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub total: usize,
    pub attempted: usize,
    pub unattempted: usize,
    pub unseen: usize,
    pub marked: usize,
}

impl SessionStats {
    #[must_use]
    pub fn from_questions(questions: &[Question]) -> Self {
        questions.iter().fold(
            Self {
                total: questions.len(),
                ..Self::default()
            },
            |mut stats, q| {
                if q.is_answered() {
                    stats.attempted += 1;
                }
                match q.status() {
                    QuestionStatus::Unattempted => stats.unattempted += 1,
                    QuestionStatus::Unseen => stats.unseen += 1,
                    QuestionStatus::Attempted => {}
                }
                if q.is_marked_for_review() {
                    stats.marked += 1;
                }
                stats
            },
        )
    }

    /// Questions without an answer.
    #[must_use]
    pub fn not_attempted(&self) -> usize {
        self.total.saturating_sub(self.attempted)
    }

    /// True when every question has been opened at least once.
    #[must_use]
    pub fn all_seen(&self) -> bool {
        self.unseen == 0
    }
}

/// Why a session was finalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitReason {
    /// The candidate confirmed the submit dialog.
    Manual,
    /// The countdown reached zero.
    TimeExpired,
}

/// Final result handed to the shell once a session is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    test_id: TestId,
    started_at: DateTime<Utc>,
    submitted_at: DateTime<Utc>,
    stats: SessionStats,
    reason: SubmitReason,
}

impl SessionSummary {
    /// Build a summary. A `submitted_at` earlier than `started_at` is clamped.
    #[must_use]
    pub fn new(
        test_id: TestId,
        started_at: DateTime<Utc>,
        submitted_at: DateTime<Utc>,
        stats: SessionStats,
        reason: SubmitReason,
    ) -> Self {
        Self {
            test_id,
            started_at,
            submitted_at: submitted_at.max(started_at),
            stats,
            reason,
        }
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
    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    #[must_use]
    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    #[must_use]
    pub fn reason(&self) -> SubmitReason {
        self.reason
    }
}
