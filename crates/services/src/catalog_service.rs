use std::sync::Arc;

use exam_core::model::{Difficulty, TestId, TestMeta};
use storage::repository::{StorageError, TestRepository};

use crate::error::CatalogError;

/// Filter applied to the mock-test catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    pub subject: Option<String>,
    pub difficulty: Option<Difficulty>,
    /// Case-insensitive substring of the title; blank matches everything.
    pub search: String,
}

impl CatalogFilter {
    #[must_use]
    pub fn matches(&self, test: &TestMeta) -> bool {
        let subject_ok = self
            .subject
            .as_deref()
            .is_none_or(|subject| test.subject() == Some(subject));
        let difficulty_ok = self
            .difficulty
            .is_none_or(|difficulty| test.difficulty() == Some(difficulty));
        if !(subject_ok && difficulty_ok) {
            return false;
        }
        let needle = self.search.trim().to_lowercase();
        needle.is_empty() || test.title().to_lowercase().contains(&needle)
    }
}

/// Read-only access to the list of available tests.
#[derive(Clone)]
pub struct CatalogService {
    tests: Arc<dyn TestRepository>,
}

impl CatalogService {
    #[must_use]
    pub fn new(tests: Arc<dyn TestRepository>) -> Self {
        Self { tests }
    }

    /// Tests matching `filter`, in catalog order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Storage` if the repository fails.
    pub async fn list(&self, filter: &CatalogFilter) -> Result<Vec<TestMeta>, CatalogError> {
        let tests = self.tests.list_tests().await?;
        Ok(tests.into_iter().filter(|t| filter.matches(t)).collect())
    }

    /// Distinct subjects, in the order they first appear.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Storage` if the repository fails.
    pub async fn subjects(&self) -> Result<Vec<String>, CatalogError> {
        let tests = self.tests.list_tests().await?;
        let mut subjects: Vec<String> = Vec::new();
        for subject in tests.iter().filter_map(TestMeta::subject) {
            if !subjects.iter().any(|s| s == subject) {
                subjects.push(subject.to_owned());
            }
        }
        Ok(subjects)
    }

    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if no test has this id.
    pub async fn get(&self, id: &TestId) -> Result<TestMeta, CatalogError> {
        self.tests.get_test(id).await.map_err(|err| match err {
            StorageError::NotFound => CatalogError::NotFound(id.clone()),
            other => CatalogError::Storage(other),
        })
    }
}
