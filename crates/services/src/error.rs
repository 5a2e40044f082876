//! Shared error types for the services crate.

use thiserror::Error;

use exam_core::model::{QuestionError, QuestionId, TestId};
use storage::StorageError;

/// Errors emitted by the test session and its workflow.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions available for test")]
    Empty,
    #[error("duplicate question id {0} in session")]
    DuplicateQuestion(QuestionId),
    #[error("unknown question {0}")]
    InvalidReference(QuestionId),
    #[error("unknown test {0}")]
    UnknownTest(TestId),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error("session already submitted")]
    SessionClosed,
    #[error(transparent)]
    Gate(#[from] GateError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by the pre-session start gate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GateError {
    #[error("the instructions must be accepted before starting")]
    NotAgreed,
    #[error("the start gate has not been passed for this test")]
    NotPassed,
    #[error("unable to enter fullscreen mode: {0}")]
    Fullscreen(String),
}

/// Failure reported by a fullscreen presenter.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct FullscreenError(pub String);

/// Errors emitted by `CatalogService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("unknown test {0}")]
    NotFound(TestId),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
