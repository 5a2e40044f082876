mod ids;
mod question;
mod section;
mod session;
mod test_meta;

pub use ids::{ParseIdError, QuestionId, TestId};

pub use question::{Answer, Difficulty, Question, QuestionError, QuestionKind, QuestionStatus};
pub use section::{Section, group_by_section};
pub use session::{SessionStats, SessionSummary, SubmitReason};
pub use test_meta::{TestComponent, TestError, TestMeta};
