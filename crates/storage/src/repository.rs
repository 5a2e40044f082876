use async_trait::async_trait;
use exam_core::model::{Question, TestId, TestMeta};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use crate::fixtures::FixtureSet;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("invalid fixture: {0}")]
    Invalid(String),

    #[error("io error: {0}")]
    Io(String),
}

/// Read access to test metadata.
#[async_trait]
pub trait TestRepository: Send + Sync {
    /// Fetch a test by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_test(&self, id: &TestId) -> Result<TestMeta, StorageError>;

    /// List all tests in catalog order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn list_tests(&self) -> Result<Vec<TestMeta>, StorageError>;
}

/// Read access to per-test question lists.
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Fetch the ordered, unseen question list for a test.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the test has no question list.
    async fn get_questions(&self, test_id: &TestId) -> Result<Vec<Question>, StorageError>;
}

/// Fixture-backed repository serving both traits. Contents never change
/// after construction.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    tests: Arc<Vec<TestMeta>>,
    questions: Arc<HashMap<TestId, Vec<Question>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_fixtures(fixtures: FixtureSet) -> Self {
        Self {
            tests: Arc::new(fixtures.tests),
            questions: Arc::new(fixtures.questions),
        }
    }
}

#[async_trait]
impl TestRepository for InMemoryRepository {
    async fn get_test(&self, id: &TestId) -> Result<TestMeta, StorageError> {
        self.tests
            .iter()
            .find(|t| t.id() == id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn list_tests(&self) -> Result<Vec<TestMeta>, StorageError> {
        Ok(self.tests.as_ref().clone())
    }
}

#[async_trait]
impl QuestionRepository for InMemoryRepository {
    async fn get_questions(&self, test_id: &TestId) -> Result<Vec<Question>, StorageError> {
        self.questions
            .get(test_id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }
}

/// Repository handles shared by the services layer.
#[derive(Clone)]
pub struct Storage {
    pub tests: Arc<dyn TestRepository>,
    pub questions: Arc<dyn QuestionRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_repository(InMemoryRepository::new())
    }

    /// Storage seeded from a validated fixture set.
    #[must_use]
    pub fn from_fixtures(fixtures: FixtureSet) -> Self {
        Self::from_repository(InMemoryRepository::from_fixtures(fixtures))
    }

    /// Storage seeded from the fixtures compiled into the binary.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the bundled fixtures fail validation.
    pub fn bundled() -> Result<Self, StorageError> {
        Ok(Self::from_fixtures(FixtureSet::bundled()?))
    }

    fn from_repository(repo: InMemoryRepository) -> Self {
        let tests: Arc<dyn TestRepository> = Arc::new(repo.clone());
        let questions: Arc<dyn QuestionRepository> = Arc::new(repo);
        Self { tests, questions }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exam_core::model::{Difficulty, QuestionId, QuestionKind};

    fn build_test(id: &str, title: &str) -> TestMeta {
        TestMeta::new(TestId::new(id), title, 30, 1).unwrap()
    }

    fn build_question(id: u64) -> Question {
        Question::new(
            QuestionId::new(id),
            1,
            "Section",
            QuestionKind::Text,
            Vec::new(),
            1,
            Difficulty::Easy,
            "?",
        )
        .unwrap()
    }

    fn fixture_repo() -> InMemoryRepository {
        let mut fixtures = FixtureSet::default();
        fixtures.tests = vec![build_test("a", "First"), build_test("b", "Second")];
        fixtures
            .questions
            .insert(TestId::new("a"), vec![build_question(1), build_question(2)]);
        InMemoryRepository::from_fixtures(fixtures)
    }

    #[tokio::test]
    async fn tests_are_listed_in_fixture_order() {
        let repo = fixture_repo();
        let tests = repo.list_tests().await.unwrap();
        let titles: Vec<_> = tests.iter().map(TestMeta::title).collect();
        assert_eq!(titles, ["First", "Second"]);

        let second = repo.get_test(&TestId::new("b")).await.unwrap();
        assert_eq!(second.title(), "Second");
    }

    #[tokio::test]
    async fn missing_entries_are_not_found() {
        let repo = fixture_repo();
        let id = TestId::new("missing");
        assert!(matches!(repo.get_test(&id).await, Err(StorageError::NotFound)));
        assert!(matches!(repo.get_questions(&id).await, Err(StorageError::NotFound)));
        assert!(matches!(
            repo.get_questions(&TestId::new("b")).await,
            Err(StorageError::NotFound)
        ));
    }

    #[tokio::test]
    async fn questions_keep_fixture_order() {
        let repo = fixture_repo();
        let questions = repo.get_questions(&TestId::new("a")).await.unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[1].id(), QuestionId::new(2));
    }

    #[tokio::test]
    async fn empty_storage_has_no_tests() {
        let storage = Storage::in_memory();
        assert!(storage.tests.list_tests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn bundled_storage_serves_fixture_tests() {
        let storage = Storage::bundled().unwrap();
        let tests = storage.tests.list_tests().await.unwrap();
        let first = tests.first().expect("at least one bundled test");
        let questions = storage.questions.get_questions(first.id()).await.unwrap();
        assert!(!questions.is_empty());
    }
}
