use exam_core::model::{Answer, Difficulty, Question, QuestionId};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub index: usize,
    pub label: String,
    pub selected: bool,
}

/// Answer input shown under the question text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnswerInputVm {
    Choice(Vec<OptionVm>),
    Text(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionVm {
    pub id: QuestionId,
    pub number_label: String,
    pub position_label: String,
    pub section: String,
    pub text: String,
    pub kind_label: String,
    pub marks_label: String,
    pub difficulty: Difficulty,
    pub input: AnswerInputVm,
    pub marked: bool,
    pub review_label: &'static str,
    pub prev_disabled: bool,
    pub next_disabled: bool,
    pub next_label: &'static str,
}

impl QuestionVm {
    #[must_use]
    pub fn difficulty_class(&self) -> &'static str {
        match self.difficulty {
            Difficulty::Easy => "badge badge--easy",
            Difficulty::Medium => "badge badge--medium",
            Difficulty::Hard => "badge badge--hard",
        }
    }
}

#[must_use]
pub fn marks_label(marks: u32) -> String {
    if marks == 1 {
        "1 mark".to_owned()
    } else {
        format!("{marks} marks")
    }
}

#[must_use]
pub fn review_label(marked: bool) -> &'static str {
    if marked { "Unmark Review" } else { "Mark for Review" }
}

/// Project the open question; `position` is 0-based.
#[must_use]
pub fn map_question(question: &Question, position: usize, total: usize) -> QuestionVm {
    let is_last = position + 1 >= total;
    let input = if question.kind().takes_choice() {
        let selected = match question.answer() {
            Some(Answer::Choice(index)) => Some(*index),
            _ => None,
        };
        AnswerInputVm::Choice(
            question
                .options()
                .iter()
                .enumerate()
                .map(|(index, label)| OptionVm {
                    index,
                    label: label.clone(),
                    selected: selected == Some(index),
                })
                .collect(),
        )
    } else {
        let text = match question.answer() {
            Some(Answer::Text(text)) => text.clone(),
            _ => String::new(),
        };
        AnswerInputVm::Text(text)
    };

    QuestionVm {
        id: question.id(),
        number_label: format!("Q{}", question.number()),
        position_label: format!("Question {} of {total}", question.number()),
        section: question.section().to_owned(),
        text: question.text().to_owned(),
        kind_label: question.kind().as_str().to_uppercase(),
        marks_label: marks_label(question.marks()),
        difficulty: question.difficulty(),
        input,
        marked: question.is_marked_for_review(),
        review_label: review_label(question.is_marked_for_review()),
        prev_disabled: position == 0,
        next_disabled: is_last,
        next_label: if is_last { "Last Question" } else { "Next" },
    }
}
