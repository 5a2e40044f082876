use std::sync::Arc;

use tracing::info;

use exam_core::model::{TestId, TestMeta};
use storage::repository::{QuestionRepository, StorageError, TestRepository};

use super::gate::{GatePass, StartGate};
use super::progress::ConfirmOutcome;
use super::service::TestSession;
use crate::Clock;
use crate::error::{GateError, SessionError};

/// Orchestrates test lookup, the start gate and session start.
#[derive(Clone)]
pub struct SessionLoopService {
    clock: Clock,
    tests: Arc<dyn TestRepository>,
    questions: Arc<dyn QuestionRepository>,
}

impl SessionLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        tests: Arc<dyn TestRepository>,
        questions: Arc<dyn QuestionRepository>,
    ) -> Self {
        Self {
            clock,
            tests,
            questions,
        }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Fetch a test's metadata for the instructions page.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownTest` if no test has this id.
    pub async fn load_test(&self, test_id: &TestId) -> Result<TestMeta, SessionError> {
        self.tests.get_test(test_id).await.map_err(|err| match err {
            StorageError::NotFound => SessionError::UnknownTest(test_id.clone()),
            other => SessionError::Storage(other),
        })
    }

    /// Load a test and open a fresh start gate for it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownTest` if no test has this id.
    pub async fn open_gate(&self, test_id: &TestId) -> Result<(TestMeta, StartGate), SessionError> {
        let test = self.load_test(test_id).await?;
        let gate = StartGate::new(test.id().clone());
        Ok((test, gate))
    }

    /// Start a session for `test_id` once its gate was passed.
    ///
    /// # Errors
    ///
    /// Returns `GateError::NotPassed` if `pass` belongs to another test,
    /// `SessionError::UnknownTest` if the test or its questions are missing,
    /// and `SessionError::Empty` for a test without questions.
    pub async fn start_session(
        &self,
        test_id: &TestId,
        pass: &GatePass,
    ) -> Result<TestSession, SessionError> {
        if pass.test_id() != test_id {
            return Err(GateError::NotPassed.into());
        }
        let test = self.load_test(test_id).await?;
        let questions = self
            .questions
            .get_questions(test_id)
            .await
            .map_err(|err| match err {
                StorageError::NotFound => SessionError::UnknownTest(test_id.clone()),
                other => SessionError::Storage(other),
            })?;

        let session = TestSession::new(&test, questions, self.clock)?;
        info!(
            test_id = %test_id,
            questions = session.questions().len(),
            duration_seconds = test.duration_seconds(),
            "session started"
        );
        Ok(session)
    }

    /// Confirm a pending submit on `session`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::SessionClosed` if the session was already submitted.
    pub fn confirm_submit(&self, session: &mut TestSession) -> Result<ConfirmOutcome, SessionError> {
        let outcome = session.confirm_submit()?;
        if let ConfirmOutcome::NotPermitted(stats) = &outcome {
            info!(
                test_id = %session.test_id(),
                unseen = stats.unseen,
                "submit blocked by unseen questions"
            );
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sessions::gate::NoFullscreen;
    use exam_core::time::fixed_clock;
    use storage::{FixtureSet, Storage};

    fn service() -> SessionLoopService {
        let storage = Storage::bundled().unwrap();
        SessionLoopService::new(fixed_clock(), storage.tests, storage.questions)
    }

    #[tokio::test]
    async fn unknown_test_is_reported() {
        let id = TestId::new("does-not-exist");
        let err = service().load_test(&id).await.unwrap_err();
        assert!(matches!(err, SessionError::UnknownTest(got) if got == id));
    }

    #[tokio::test]
    async fn gate_pass_starts_session() {
        let service = service();
        let (test, mut gate) = service.open_gate(&TestId::new("mock-test-1")).await.unwrap();
        gate.set_agreed(true);
        gate.request_start().unwrap();
        let pass = gate.enter_fullscreen(&NoFullscreen).unwrap();

        let session = service.start_session(test.id(), &pass).await.unwrap();
        assert_eq!(session.questions().len(), test.total_questions() as usize);
        assert_eq!(session.time_remaining(), test.duration_seconds());
    }

    #[tokio::test]
    async fn pass_for_another_test_is_rejected() {
        let service = service();
        let (_test, mut gate) = service.open_gate(&TestId::new("mock-test-1")).await.unwrap();
        gate.set_agreed(true);
        gate.request_start().unwrap();
        let pass = gate.enter_fullscreen(&NoFullscreen).unwrap();

        let err = service
            .start_session(&TestId::new("mock-test-2"), &pass)
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Gate(GateError::NotPassed)));
    }

    #[tokio::test]
    async fn test_without_questions_is_unknown() {
        let meta = TestMeta::new(TestId::new("bare"), "Bare", 10, 0).unwrap();
        let storage = Storage::from_fixtures(FixtureSet {
            tests: vec![meta.clone()],
            ..FixtureSet::default()
        });
        let service = SessionLoopService::new(fixed_clock(), storage.tests, storage.questions);

        let (_test, mut gate) = service.open_gate(meta.id()).await.unwrap();
        gate.set_agreed(true);
        gate.request_start().unwrap();
        let pass = gate.enter_fullscreen(&NoFullscreen).unwrap();
        let err = service.start_session(meta.id(), &pass).await.unwrap_err();
        assert!(matches!(err, SessionError::UnknownTest(_)));
    }
}
