use thiserror::Error;

use crate::model::ids::TestId;
use crate::model::question::Difficulty;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TestError {
    #[error("test title cannot be empty")]
    EmptyTitle,

    #[error("test duration must be > 0 minutes")]
    ZeroDuration,
}

//
// ─── TEST METADATA ─────────────────────────────────────────────────────────────
//

/// A named part of a test, e.g. "Quantitative Aptitude".
///
/// Question `section` labels refer to component names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestComponent {
    pub name: String,
    pub description: String,
}

/// Static description of a mock test, shown in the catalog and start screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestMeta {
    id: TestId,
    title: String,
    description: String,
    subject: Option<String>,
    difficulty: Option<Difficulty>,
    duration_minutes: u32,
    total_questions: u32,
    instructions: Vec<String>,
    important_notes: Vec<String>,
    components: Vec<TestComponent>,
    agreement_text: String,
}

impl TestMeta {
    /// Creates test metadata with the required fields; use the `with_*`
    /// builders for the rest.
    ///
    /// # Errors
    ///
    /// Returns `TestError::EmptyTitle` if title is empty or whitespace-only.
    /// Returns `TestError::ZeroDuration` if `duration_minutes` is 0.
    pub fn new(
        id: TestId,
        title: impl Into<String>,
        duration_minutes: u32,
        total_questions: u32,
    ) -> Result<Self, TestError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(TestError::EmptyTitle);
        }
        if duration_minutes == 0 {
            return Err(TestError::ZeroDuration);
        }

        Ok(Self {
            id,
            title: title.trim().to_owned(),
            description: String::new(),
            subject: None,
            difficulty: None,
            duration_minutes,
            total_questions,
            instructions: Vec::new(),
            important_notes: Vec::new(),
            components: Vec::new(),
            agreement_text: String::new(),
        })
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into().trim().to_owned();
        self
    }

    #[must_use]
    pub fn with_subject(mut self, subject: Option<String>) -> Self {
        self.subject = subject
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty());
        self
    }

    #[must_use]
    pub fn with_difficulty(mut self, difficulty: Option<Difficulty>) -> Self {
        self.difficulty = difficulty;
        self
    }

    #[must_use]
    pub fn with_instructions(mut self, instructions: Vec<String>) -> Self {
        self.instructions = instructions;
        self
    }

    #[must_use]
    pub fn with_important_notes(mut self, notes: Vec<String>) -> Self {
        self.important_notes = notes;
        self
    }

    #[must_use]
    pub fn with_components(mut self, components: Vec<TestComponent>) -> Self {
        self.components = components;
        self
    }

    #[must_use]
    pub fn with_agreement_text(mut self, text: impl Into<String>) -> Self {
        self.agreement_text = text.into();
        self
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> &TestId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    #[must_use]
    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    #[must_use]
    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    /// Countdown length for a session of this test.
    #[must_use]
    pub fn duration_seconds(&self) -> u32 {
        self.duration_minutes.saturating_mul(60)
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn instructions(&self) -> &[String] {
        &self.instructions
    }

    #[must_use]
    pub fn important_notes(&self) -> &[String] {
        &self.important_notes
    }

    #[must_use]
    pub fn components(&self) -> &[TestComponent] {
        &self.components
    }

    #[must_use]
    pub fn agreement_text(&self) -> &str {
        &self.agreement_text
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_empty_title() {
        let err = TestMeta::new(TestId::new("t"), "   ", 60, 10).unwrap_err();
        assert_eq!(err, TestError::EmptyTitle);
    }

    #[test]
    fn new_rejects_zero_duration() {
        let err = TestMeta::new(TestId::new("t"), "Algebra", 0, 10).unwrap_err();
        assert_eq!(err, TestError::ZeroDuration);
    }

    #[test]
    fn builders_normalize_values() {
        let meta = TestMeta::new(TestId::new("t"), "  Algebra  ", 90, 25)
            .unwrap()
            .with_subject(Some("  ".into()))
            .with_description(" Basics ");
        assert_eq!(meta.title(), "Algebra");
        assert_eq!(meta.description(), "Basics");
        assert_eq!(meta.subject(), None);
        assert_eq!(meta.duration_seconds(), 5400);
    }
}
