use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question {id}: {kind} question cannot take a {answer} answer")]
    InvalidAnswerType {
        id: QuestionId,
        kind: QuestionKind,
        answer: &'static str,
    },

    #[error("question {id}: option {index} is out of range ({len} options)")]
    OptionOutOfRange {
        id: QuestionId,
        index: usize,
        len: usize,
    },

    #[error("question {id}: mcq question has no options")]
    MissingOptions { id: QuestionId },

    #[error("question {id}: question number must be >= 1")]
    InvalidNumber { id: QuestionId },

    #[error("question {id}: marks must be > 0")]
    ZeroMarks { id: QuestionId },
}

//
// ─── KINDS ─────────────────────────────────────────────────────────────────────
//

/// How a question expects to be answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    /// Multiple choice: the answer is an option index.
    Mcq,
    /// Free text answer.
    Text,
    /// Any other type found in fixtures; answered like `Text`.
    #[serde(other)]
    Other,
}

impl QuestionKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionKind::Mcq => "mcq",
            QuestionKind::Text => "text",
            QuestionKind::Other => "other",
        }
    }

    #[must_use]
    pub fn takes_choice(self) -> bool {
        matches!(self, QuestionKind::Mcq)
    }
}

impl std::fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// Parses a difficulty label, ignoring case.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// Progress of a single question within a session.
///
/// Moves forward only: `Unseen` → `Unattempted` on first view, → `Attempted`
/// once an answer is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionStatus {
    #[default]
    Unseen,
    Unattempted,
    Attempted,
}

/// A recorded answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// Index into the question's options.
    Choice(usize),
    Text(String),
}

impl Answer {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Answer::Choice(_) => "choice",
            Answer::Text(_) => "text",
        }
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// One exam item together with its in-session state.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    id: QuestionId,
    number: u32,
    section: String,
    kind: QuestionKind,
    options: Vec<String>,
    marks: u32,
    difficulty: Difficulty,
    text: String,
    answer: Option<Answer>,
    status: QuestionStatus,
    marked_for_review: bool,
}

impl Question {
    /// Creates a fresh, unseen question.
    ///
    /// Options are only kept for `Mcq` questions.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::InvalidNumber` if `number` is 0.
    /// Returns `QuestionError::ZeroMarks` if `marks` is 0.
    /// Returns `QuestionError::MissingOptions` for an `Mcq` without options.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: QuestionId,
        number: u32,
        section: impl Into<String>,
        kind: QuestionKind,
        options: Vec<String>,
        marks: u32,
        difficulty: Difficulty,
        text: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        if number == 0 {
            return Err(QuestionError::InvalidNumber { id });
        }
        if marks == 0 {
            return Err(QuestionError::ZeroMarks { id });
        }
        let options = if kind.takes_choice() {
            if options.is_empty() {
                return Err(QuestionError::MissingOptions { id });
            }
            options
        } else {
            Vec::new()
        };

        Ok(Self {
            id,
            number,
            section: section.into(),
            kind,
            options,
            marks,
            difficulty,
            text: text.into(),
            answer: None,
            status: QuestionStatus::Unseen,
            marked_for_review: false,
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    /// 1-based display order within the full question list.
    #[must_use]
    pub fn number(&self) -> u32 {
        self.number
    }

    #[must_use]
    pub fn section(&self) -> &str {
        &self.section
    }

    #[must_use]
    pub fn kind(&self) -> QuestionKind {
        self.kind
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn marks(&self) -> u32 {
        self.marks
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn answer(&self) -> Option<&Answer> {
        self.answer.as_ref()
    }

    #[must_use]
    pub fn status(&self) -> QuestionStatus {
        self.status
    }

    #[must_use]
    pub fn is_marked_for_review(&self) -> bool {
        self.marked_for_review
    }

    #[must_use]
    pub fn is_answered(&self) -> bool {
        self.answer.is_some()
    }

    /// Marks the question as opened.
    ///
    /// Returns `true` only when the status actually moved from `Unseen`.
    pub fn mark_seen(&mut self) -> bool {
        if self.status == QuestionStatus::Unseen {
            self.status = QuestionStatus::Unattempted;
            return true;
        }
        false
    }

    /// Stores `answer`, replacing any previous one, and marks the question attempted.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::InvalidAnswerType` if the answer shape does not
    /// match the question kind, or `QuestionError::OptionOutOfRange` for an
    /// unknown option index.
    pub fn record_answer(&mut self, answer: Answer) -> Result<(), QuestionError> {
        match (&answer, self.kind.takes_choice()) {
            (Answer::Choice(index), true) => {
                if *index >= self.options.len() {
                    return Err(QuestionError::OptionOutOfRange {
                        id: self.id,
                        index: *index,
                        len: self.options.len(),
                    });
                }
            }
            (Answer::Text(_), false) => {}
            _ => {
                return Err(QuestionError::InvalidAnswerType {
                    id: self.id,
                    kind: self.kind,
                    answer: answer.label(),
                });
            }
        }

        self.answer = Some(answer);
        self.status = QuestionStatus::Attempted;
        Ok(())
    }

    /// Flips the review flag and returns the new value.
    pub fn toggle_review(&mut self) -> bool {
        self.marked_for_review = !self.marked_for_review;
        self.marked_for_review
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
