use crate::model::question::Question;

/// Questions sharing a `section` label, in their original order.
#[derive(Debug, Clone, PartialEq)]
pub struct Section<'a> {
    pub name: &'a str,
    pub questions: Vec<&'a Question>,
}

/// Partition `questions` by section name.
///
/// Sections appear in the order their name is first seen; questions keep
/// their original relative order inside a section.
#[must_use]
pub fn group_by_section(questions: &[Question]) -> Vec<Section<'_>> {
    let mut sections: Vec<Section<'_>> = Vec::new();
    for question in questions {
        match sections.iter_mut().find(|s| s.name == question.section()) {
            Some(section) => section.questions.push(question),
            None => sections.push(Section {
                name: question.section(),
                questions: vec![question],
            }),
        }
    }
    sections
}
