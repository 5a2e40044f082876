mod dashboard_vm;
mod question_vm;
mod session_vm;
mod test_vm;
mod time_fmt;

pub use dashboard_vm::{
    DashboardVm, QuestionTileVm, SectionVm, StatTileVm, TileTone, excerpt, map_sections,
    map_stat_tiles,
};
pub use question_vm::{AnswerInputVm, OptionVm, QuestionVm, map_question, marks_label, review_label};
pub use session_vm::{
    HeaderVm, SessionIntent, SessionOutcome, SessionVm, SubmitModalVm, start_session,
};
pub use test_vm::{InstructionsVm, SubmissionVm, TestCardVm, map_test_cards};
pub use time_fmt::{LOW_TIME_SECS, format_countdown, format_datetime, is_low_time};
