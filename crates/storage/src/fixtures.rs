//! Static JSON fixtures describing the available tests and their questions.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use exam_core::model::{
    Difficulty, Question, QuestionError, QuestionId, QuestionKind, TestComponent, TestError,
    TestId, TestMeta,
};
use serde::Deserialize;

use crate::repository::StorageError;

const BUNDLED_TESTS: &str = include_str!("../fixtures/tests.json");
const BUNDLED_QUESTIONS: &str = include_str!("../fixtures/questions.json");

/// File names looked up by `FixtureSet::from_dir`.
pub const TESTS_FILE: &str = "tests.json";
pub const QUESTIONS_FILE: &str = "questions.json";

//
// ─── RECORDS ───────────────────────────────────────────────────────────────────
//

/// Fixture shape of a test entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    /// Minutes.
    pub duration: u32,
    pub total_questions: u32,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub important_notes: Vec<String>,
    #[serde(default)]
    pub components: Vec<ComponentRecord>,
    #[serde(default)]
    pub agreement_text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ComponentRecord {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl TestRecord {
    /// Convert the record into domain `TestMeta`.
    ///
    /// # Errors
    ///
    /// Returns `TestError` if the title or duration are invalid.
    pub fn into_test(self) -> Result<TestMeta, TestError> {
        let components = self
            .components
            .into_iter()
            .map(|c| TestComponent {
                name: c.name,
                description: c.description,
            })
            .collect();

        Ok(
            TestMeta::new(TestId::new(self.id), self.title, self.duration, self.total_questions)?
                .with_description(self.description)
                .with_subject(self.subject)
                .with_difficulty(self.difficulty)
                .with_instructions(self.instructions)
                .with_important_notes(self.important_notes)
                .with_components(components)
                .with_agreement_text(self.agreement_text),
        )
    }
}

/// Fixture shape of a question entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    pub id: u64,
    pub question_number: u32,
    pub section_name: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    #[serde(default)]
    pub options: Option<Vec<String>>,
    #[serde(default = "default_marks")]
    pub marks: u32,
    pub difficulty: Difficulty,
    pub question: String,
}

fn default_marks() -> u32 {
    1
}

impl QuestionRecord {
    /// Convert the record into a fresh, unseen `Question`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the record violates question invariants.
    pub fn into_question(self) -> Result<Question, QuestionError> {
        Question::new(
            QuestionId::new(self.id),
            self.question_number,
            self.section_name,
            self.kind,
            self.options.unwrap_or_default(),
            self.marks,
            self.difficulty,
            self.question,
        )
    }
}

#[derive(Debug, Deserialize)]
struct TestsFile {
    tests: Vec<TestRecord>,
}

#[derive(Debug, Deserialize)]
struct QuestionsFile {
    questions: HashMap<String, Vec<QuestionRecord>>,
}

//
// ─── FIXTURE SET ───────────────────────────────────────────────────────────────
//

/// Validated tests and per-test question lists.
#[derive(Debug, Clone, Default)]
pub struct FixtureSet {
    pub tests: Vec<TestMeta>,
    pub questions: HashMap<TestId, Vec<Question>>,
}

impl FixtureSet {
    /// Fixtures compiled into the binary.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the bundled JSON is malformed.
    pub fn bundled() -> Result<Self, StorageError> {
        Self::from_json(BUNDLED_TESTS, BUNDLED_QUESTIONS)
    }

    /// Load `tests.json` and `questions.json` from `dir`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if a file cannot be read, or any parse and
    /// validation error from `from_json`.
    pub fn from_dir(dir: &Path) -> Result<Self, StorageError> {
        let read = |name: &str| {
            let path = dir.join(name);
            std::fs::read_to_string(&path)
                .map_err(|e| StorageError::Io(format!("{}: {e}", path.display())))
        };
        let tests = read(TESTS_FILE)?;
        let questions = read(QUESTIONS_FILE)?;
        Self::from_json(&tests, &questions)
    }

    /// Parse and validate fixture JSON.
    ///
    /// Test ids must be unique, question ids must be unique within a test,
    /// and every question list must belong to a known test.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` for malformed JSON and
    /// `StorageError::Invalid` for records that break domain rules.
    pub fn from_json(tests_json: &str, questions_json: &str) -> Result<Self, StorageError> {
        let tests_file: TestsFile = serde_json::from_str(tests_json)
            .map_err(|e| StorageError::Serialization(format!("tests: {e}")))?;
        let questions_file: QuestionsFile = serde_json::from_str(questions_json)
            .map_err(|e| StorageError::Serialization(format!("questions: {e}")))?;

        let mut tests = Vec::with_capacity(tests_file.tests.len());
        let mut seen_tests = HashSet::new();
        for record in tests_file.tests {
            let raw_id = record.id.clone();
            let test = record
                .into_test()
                .map_err(|e| StorageError::Invalid(format!("test {raw_id}: {e}")))?;
            if !seen_tests.insert(test.id().clone()) {
                return Err(StorageError::Invalid(format!("duplicate test id {raw_id}")));
            }
            tests.push(test);
        }

        let mut questions = HashMap::with_capacity(questions_file.questions.len());
        for (raw_id, records) in questions_file.questions {
            let test_id = TestId::new(raw_id);
            if !seen_tests.contains(&test_id) {
                return Err(StorageError::Invalid(format!(
                    "questions reference unknown test {test_id}"
                )));
            }

            let mut seen_ids = HashSet::new();
            let mut list = Vec::with_capacity(records.len());
            for record in records {
                let question = record
                    .into_question()
                    .map_err(|e| StorageError::Invalid(format!("test {test_id}: {e}")))?;
                if !seen_ids.insert(question.id()) {
                    return Err(StorageError::Invalid(format!(
                        "test {test_id}: duplicate question id {}",
                        question.id()
                    )));
                }
                list.push(question);
            }
            questions.insert(test_id, list);
        }

        Ok(Self { tests, questions })
    }

    /// Number of questions across all tests.
    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.values().map(Vec::len).sum()
    }
}
