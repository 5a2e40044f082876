use std::collections::HashSet;

use exam_core::model::{Question, QuestionId, QuestionStatus, Section, SessionStats};

const EXCERPT_CHARS: usize = 60;

/// Colour class of a question tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileTone {
    Answered,
    Unattempted,
    Unseen,
}

impl TileTone {
    /// An answer wins over the status, so answering an unseen question
    /// still shows it as answered.
    #[must_use]
    pub fn for_question(question: &Question) -> Self {
        if question.is_answered() {
            return Self::Answered;
        }
        match question.status() {
            QuestionStatus::Unattempted => Self::Unattempted,
            QuestionStatus::Unseen | QuestionStatus::Attempted => Self::Unseen,
        }
    }

    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Answered => "tile tile--answered",
            Self::Unattempted => "tile tile--unattempted",
            Self::Unseen => "tile tile--unseen",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionTileVm {
    pub id: QuestionId,
    pub number: u32,
    pub excerpt: String,
    pub tone: TileTone,
    pub marked: bool,
    pub is_current: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionVm {
    pub name: String,
    pub collapsed: bool,
    pub answered: usize,
    pub tiles: Vec<QuestionTileVm>,
}

impl SectionVm {
    #[must_use]
    pub fn progress_label(&self) -> String {
        format!("{}/{} answered", self.answered, self.tiles.len())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatTileVm {
    pub label: &'static str,
    pub value: usize,
    pub class: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DashboardVm {
    pub stats: Vec<StatTileVm>,
    pub sections: Vec<SectionVm>,
}

/// First 60 characters, with `...` appended when cut.
#[must_use]
pub fn excerpt(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(EXCERPT_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

#[must_use]
pub fn map_stat_tiles(stats: &SessionStats) -> Vec<StatTileVm> {
    vec![
        StatTileVm {
            label: "Total Questions",
            value: stats.total,
            class: "stat stat--total",
        },
        StatTileVm {
            label: "Attempted",
            value: stats.attempted,
            class: "stat stat--attempted",
        },
        StatTileVm {
            label: "Unattempted",
            value: stats.unattempted,
            class: "stat stat--unattempted",
        },
        StatTileVm {
            label: "Unseen",
            value: stats.unseen,
            class: "stat stat--unseen",
        },
        StatTileVm {
            label: "Marked for Review",
            value: stats.marked,
            class: "stat stat--marked",
        },
    ]
}

#[must_use]
pub fn map_sections(
    sections: &[Section<'_>],
    current: Option<QuestionId>,
    collapsed: &HashSet<String>,
) -> Vec<SectionVm> {
    sections
        .iter()
        .map(|section| SectionVm {
            name: section.name.to_owned(),
            collapsed: collapsed.contains(section.name),
            answered: section.questions.iter().filter(|q| q.is_answered()).count(),
            tiles: section
                .questions
                .iter()
                .map(|q| QuestionTileVm {
                    id: q.id(),
                    number: q.number(),
                    excerpt: excerpt(q.text()),
                    tone: TileTone::for_question(q),
                    marked: q.is_marked_for_review(),
                    is_current: current == Some(q.id()),
                })
                .collect(),
        })
        .collect()
}
