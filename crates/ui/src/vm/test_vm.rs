use exam_core::model::{Difficulty, SessionSummary, SubmitReason, TestComponent, TestMeta};

use crate::vm::time_fmt::format_datetime;

/// Catalog card for one mock test.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestCardVm {
    pub id: String,
    pub title: String,
    pub description: String,
    pub subject: Option<String>,
    pub difficulty: Option<&'static str>,
    pub questions_label: String,
    pub duration_label: String,
}

impl From<&TestMeta> for TestCardVm {
    fn from(test: &TestMeta) -> Self {
        Self {
            id: test.id().as_str().to_owned(),
            title: test.title().to_owned(),
            description: test.description().to_owned(),
            subject: test.subject().map(str::to_owned),
            difficulty: test.difficulty().map(Difficulty::as_str),
            questions_label: format!("{} Questions", test.total_questions()),
            duration_label: format!("{} minutes", test.duration_minutes()),
        }
    }
}

#[must_use]
pub fn map_test_cards(tests: &[TestMeta]) -> Vec<TestCardVm> {
    tests.iter().map(TestCardVm::from).collect()
}

/// Instructions page shown before the start gate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstructionsVm {
    pub title: String,
    pub description: String,
    pub facts: Vec<(&'static str, String)>,
    pub instructions: Vec<String>,
    pub notes: Vec<String>,
    pub components: Vec<TestComponent>,
    pub agreement_text: String,
}

impl From<&TestMeta> for InstructionsVm {
    fn from(test: &TestMeta) -> Self {
        let mut facts = vec![
            ("Duration", format!("{} minutes", test.duration_minutes())),
            ("Questions", test.total_questions().to_string()),
        ];
        if let Some(subject) = test.subject() {
            facts.push(("Subject", subject.to_owned()));
        }
        if let Some(difficulty) = test.difficulty() {
            facts.push(("Difficulty", difficulty.as_str().to_owned()));
        }
        let agreement_text = if test.agreement_text().is_empty() {
            "I have read and understood the instructions.".to_owned()
        } else {
            test.agreement_text().to_owned()
        };

        Self {
            title: test.title().to_owned(),
            description: test.description().to_owned(),
            facts,
            instructions: test.instructions().to_vec(),
            notes: test.important_notes().to_vec(),
            components: test.components().to_vec(),
            agreement_text,
        }
    }
}

/// Banner for the last submitted session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmissionVm {
    pub test_id: String,
    pub submitted_at_str: String,
    pub headline: String,
    pub detail: String,
}

impl From<&SessionSummary> for SubmissionVm {
    fn from(summary: &SessionSummary) -> Self {
        let stats = summary.stats();
        let headline = match summary.reason() {
            SubmitReason::Manual => "Test submitted",
            SubmitReason::TimeExpired => "Time is up. Test submitted",
        };
        Self {
            test_id: summary.test_id().as_str().to_owned(),
            submitted_at_str: format_datetime(summary.submitted_at()),
            headline: headline.to_owned(),
            detail: format!(
                "{} of {} attempted, {} marked for review",
                stats.attempted, stats.total, stats.marked
            ),
        }
    }
}
