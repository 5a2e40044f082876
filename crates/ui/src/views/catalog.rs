use dioxus::prelude::*;
use dioxus_router::Link;

use exam_core::model::Difficulty;
use services::CatalogFilter;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{SubmissionVm, TestCardVm, map_test_cards};

const DIFFICULTIES: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

fn build_filter(subject: &str, difficulty: &str, search: &str) -> CatalogFilter {
    CatalogFilter {
        subject: (!subject.is_empty()).then(|| subject.to_owned()),
        difficulty: Difficulty::parse(difficulty),
        search: search.to_owned(),
    }
}

#[component]
pub fn CatalogView() -> Element {
    let ctx = use_context::<AppContext>();
    let catalog = ctx.catalog();
    let last_submission = ctx.last_submission().as_ref().map(SubmissionVm::from);

    let mut subject = use_signal(String::new);
    let mut difficulty = use_signal(String::new);
    let mut search = use_signal(String::new);

    let subjects_resource = {
        let catalog = catalog.clone();
        use_resource(move || {
            let catalog = catalog.clone();
            async move { catalog.subjects().await.map_err(|_| ViewError::Unknown) }
        })
    };
    let subjects = subjects_resource
        .value()
        .read()
        .as_ref()
        .and_then(|value| value.as_ref().ok())
        .cloned()
        .unwrap_or_default();

    let resource = use_resource(move || {
        let catalog = catalog.clone();
        let filter = build_filter(&subject.read(), &difficulty.read(), &search.read());
        async move {
            let tests = catalog
                .list(&filter)
                .await
                .map_err(|_| ViewError::Unknown)?;
            Ok::<_, ViewError>(map_test_cards(&tests))
        }
    });
    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page catalog-page",
            header { class: "catalog-header",
                h2 { "Mock Tests" }
                p { class: "catalog-header__lead",
                    "Master your preparation. Filter by subject, difficulty, or search and start instantly."
                }
            }
            if let Some(submission) = last_submission {
                SubmissionBanner { submission }
            }
            section { class: "catalog-filters",
                select {
                    class: "catalog-filter",
                    id: "catalog-subject",
                    value: "{subject}",
                    onchange: move |evt: FormEvent| subject.set(evt.value()),
                    option { value: "", "All subjects" }
                    for name in subjects {
                        option { key: "{name}", value: "{name}", "{name}" }
                    }
                }
                select {
                    class: "catalog-filter",
                    id: "catalog-difficulty",
                    value: "{difficulty}",
                    onchange: move |evt: FormEvent| difficulty.set(evt.value()),
                    option { value: "", "All difficulties" }
                    for level in DIFFICULTIES {
                        option { key: "{level:?}", value: level.as_str(), {level.as_str()} }
                    }
                }
                input {
                    class: "catalog-search",
                    id: "catalog-search",
                    r#type: "search",
                    placeholder: "Search tests",
                    value: "{search}",
                    oninput: move |evt: FormEvent| search.set(evt.value()),
                }
            }
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(cards) => rsx! {
                    if cards.is_empty() {
                        p { class: "catalog-empty", "No tests found matching filters." }
                    } else {
                        div { class: "catalog-grid",
                            for card in cards {
                                TestCard { key: "{card.id}", card }
                            }
                        }
                    }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                },
            }
        }
    }
}

#[component]
fn TestCard(card: TestCardVm) -> Element {
    rsx! {
        article { class: "test-card",
            div { class: "test-card__tags",
                if let Some(subject) = card.subject.as_ref() {
                    span { class: "tag tag--subject", "{subject}" }
                }
                if let Some(difficulty) = card.difficulty {
                    span { class: "tag tag--difficulty", "{difficulty}" }
                }
            }
            h3 { class: "test-card__title", "{card.title}" }
            p { class: "test-card__meta",
                span { "{card.questions_label}" }
                span { class: "test-card__dot", "•" }
                span { "{card.duration_label}" }
            }
            Link {
                class: "btn btn-primary test-card__start",
                to: Route::TestStart { test_id: card.id.clone() },
                "Start Test"
            }
        }
    }
}

#[component]
fn SubmissionBanner(submission: SubmissionVm) -> Element {
    rsx! {
        div { class: "submission-banner", role: "status",
            strong { "{submission.headline}" }
            span { " ({submission.test_id}, {submission.submitted_at_str}): " }
            span { "{submission.detail}" }
        }
    }
}
