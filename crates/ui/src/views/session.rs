use dioxus::prelude::*;

use exam_core::model::Answer;
use services::{Direction, SessionError, TICK_PERIOD, run_ticker};

use crate::vm::{
    AnswerInputVm, DashboardVm, HeaderVm, QuestionVm, SectionVm, SessionIntent, SessionVm,
    SubmitModalVm,
};

/// Running session: header, dashboard or question, and the submit dialog.
///
/// Owns the countdown task; unmounting the panel stops it.
#[component]
pub fn SessionPanel(vm: Signal<Option<SessionVm>>, on_intent: Callback<SessionIntent>) -> Element {
    use_future(move || async move {
        let mut ticker_vm = vm;
        let _ = run_ticker(TICK_PERIOD, || match ticker_vm.write().as_mut() {
            Some(session) => session.tick(),
            None => Err(SessionError::SessionClosed),
        })
        .await;
    });

    let guard = vm.read();
    let Some(session) = guard.as_ref() else {
        return rsx! {};
    };
    let header = session.header();
    let question = session.question();
    let dashboard = if question.is_none() {
        Some(session.dashboard())
    } else {
        None
    };
    let sections = session.sections();
    let modal = session.submit_modal();
    drop(guard);

    rsx! {
        div { class: "session-page", id: "session-root",
            SessionHeader { header, on_intent }
            div { class: "session-body",
                if let Some(question) = question {
                    QuestionView { question, sections, on_intent }
                } else if let Some(dashboard) = dashboard {
                    DashboardView { dashboard, on_intent }
                }
            }
            if let Some(modal) = modal {
                SubmitModal { modal, on_intent }
            }
        }
    }
}

#[component]
fn SessionHeader(header: HeaderVm, on_intent: Callback<SessionIntent>) -> Element {
    let timer_class = if header.low_time {
        "session-timer session-timer--low"
    } else {
        "session-timer"
    };
    rsx! {
        header { class: "session-header",
            div { class: "session-header__heading",
                h2 { class: "session-header__title", "{header.title}" }
                if let Some(position) = header.position_label.as_ref() {
                    p { class: "session-header__position", "{position}" }
                }
                p { class: "session-header__answered", id: "session-answered", "{header.answered_label}" }
            }
            div { class: "{timer_class}",
                span { class: "session-timer__label", "Time Remaining" }
                span { class: "session-timer__value", id: "session-timer", "{header.time_label}" }
            }
            button {
                class: "btn btn-success",
                id: "session-submit",
                r#type: "button",
                disabled: header.submit_disabled,
                onclick: move |_| on_intent.call(SessionIntent::RequestSubmit),
                "Submit Test"
            }
        }
    }
}

#[component]
fn DashboardView(dashboard: DashboardVm, on_intent: Callback<SessionIntent>) -> Element {
    rsx! {
        div { class: "dashboard",
            div { class: "dashboard__stats",
                for stat in dashboard.stats {
                    div { key: "{stat.label}", class: "{stat.class}",
                        span { class: "stat__value", "{stat.value}" }
                        span { class: "stat__label", "{stat.label}" }
                    }
                }
            }
            SectionList { sections: dashboard.sections, compact: false, on_intent }
        }
    }
}

#[component]
fn SectionList(sections: Vec<SectionVm>, compact: bool, on_intent: Callback<SessionIntent>) -> Element {
    rsx! {
        div { class: if compact { "section-list section-list--compact" } else { "section-list" },
            for section in sections {
                div { key: "{section.name}", class: "section",
                    button {
                        class: "section__toggle",
                        r#type: "button",
                        aria_expanded: !section.collapsed,
                        onclick: {
                            let name = section.name.clone();
                            move |_| on_intent.call(SessionIntent::ToggleSection(name.clone()))
                        },
                        span { class: "section__name", "{section.name}" }
                        span { class: "section__progress", {section.progress_label()} }
                        span { class: "section__chevron", if section.collapsed { "▸" } else { "▾" } }
                    }
                    if !section.collapsed {
                        div { class: "section__tiles",
                            for tile in section.tiles {
                                button {
                                    key: "{tile.id}",
                                    class: "{tile.tone.css_class()}",
                                    class: if tile.is_current { "tile--current" },
                                    class: if tile.marked { "tile--marked" },
                                    r#type: "button",
                                    onclick: move |_| on_intent.call(SessionIntent::OpenQuestion(tile.id)),
                                    span { class: "tile__number", "Q{tile.number}" }
                                    if !compact {
                                        span { class: "tile__excerpt", "{tile.excerpt}" }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn QuestionView(
    question: QuestionVm,
    sections: Vec<SectionVm>,
    on_intent: Callback<SessionIntent>,
) -> Element {
    let id = question.id;
    let difficulty_class = question.difficulty_class();
    let review_class = if question.marked {
        "btn btn-review btn-review--active"
    } else {
        "btn btn-review"
    };

    rsx! {
        div { class: "question-layout",
            article { class: "question",
                header { class: "question__header",
                    button {
                        class: "question__back",
                        id: "question-back",
                        r#type: "button",
                        onclick: move |_| on_intent.call(SessionIntent::ShowDashboard),
                        "← Dashboard"
                    }
                    span { class: "question__number", "{question.number_label}" }
                    span { class: "badge badge--kind", "{question.kind_label}" }
                    span { class: "badge badge--marks", "{question.marks_label}" }
                    span { class: "{difficulty_class}", {question.difficulty.as_str()} }
                    button {
                        class: "{review_class}",
                        id: "question-review",
                        r#type: "button",
                        onclick: move |_| on_intent.call(SessionIntent::ToggleReview(id)),
                        "{question.review_label}"
                    }
                }
                p { class: "question__section", "{question.section}" }
                p { class: "question__text", "{question.text}" }
                match question.input {
                    AnswerInputVm::Choice(options) => rsx! {
                        div { class: "question__options",
                            for option in options {
                                label {
                                    key: "{option.index}",
                                    class: if option.selected { "option option--selected" } else { "option" },
                                    input {
                                        r#type: "radio",
                                        name: "question-{id}",
                                        value: "{option.index}",
                                        checked: option.selected,
                                        onchange: move |_| {
                                            on_intent.call(SessionIntent::Answer(id, Answer::Choice(option.index)));
                                        },
                                    }
                                    span { "{option.label}" }
                                }
                            }
                        }
                    },
                    AnswerInputVm::Text(text) => rsx! {
                        label { class: "question__answer-label", r#for: "question-answer", "Your Answer:" }
                        textarea {
                            class: "question__answer",
                            id: "question-answer",
                            rows: "4",
                            placeholder: "Type your answer here...",
                            value: "{text}",
                            oninput: move |evt: FormEvent| {
                                on_intent.call(SessionIntent::Answer(id, Answer::Text(evt.value())));
                            },
                        }
                    },
                }
                footer { class: "question__nav",
                    button {
                        class: "btn btn-secondary",
                        id: "question-prev",
                        r#type: "button",
                        disabled: question.prev_disabled,
                        onclick: move |_| on_intent.call(SessionIntent::Navigate(Direction::Prev)),
                        "Previous"
                    }
                    button {
                        class: "btn btn-primary",
                        id: "question-next",
                        r#type: "button",
                        disabled: question.next_disabled,
                        onclick: move |_| on_intent.call(SessionIntent::Navigate(Direction::Next)),
                        "{question.next_label}"
                    }
                }
            }
            aside { class: "question-panel",
                SectionList { sections, compact: true, on_intent }
            }
        }
    }
}

#[component]
fn SubmitModal(modal: SubmitModalVm, on_intent: Callback<SessionIntent>) -> Element {
    rsx! {
        div { class: "modal-overlay",
            div {
                class: "modal",
                role: "dialog",
                aria_modal: "true",
                aria_labelledby: "submit-modal-title",
                h3 { id: "submit-modal-title", "Submit Test" }
                p { class: "modal__message", "{modal.message}" }
                dl { class: "modal__stats",
                    dt { "Total Questions:" }
                    dd { "{modal.total}" }
                    dt { "Attempted:" }
                    dd { class: "text-success", "{modal.attempted}" }
                    dt { "Unattempted:" }
                    dd { class: "text-danger", "{modal.unattempted}" }
                    dt { "Unseen:" }
                    dd { "{modal.unseen}" }
                    dt { "Marked for Review:" }
                    dd { class: "text-warning", "{modal.marked}" }
                }
                div { class: "modal__actions",
                    if modal.can_cancel {
                        button {
                            class: "btn btn-secondary",
                            id: "submit-cancel",
                            r#type: "button",
                            onclick: move |_| on_intent.call(SessionIntent::CancelSubmit),
                            "Cancel"
                        }
                    }
                    button {
                        class: "btn btn-success",
                        id: "submit-confirm",
                        r#type: "button",
                        disabled: !modal.can_confirm,
                        onclick: move |_| on_intent.call(SessionIntent::ConfirmSubmit),
                        "Submit Test"
                    }
                }
            }
        }
    }
}
