use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};

use exam_core::model::TestId;
use services::{GateError, GatePhase, SessionError, StartGate};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::session::SessionPanel;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{InstructionsVm, SessionIntent, SessionOutcome, SessionVm, start_session};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

/// Instructions, start gate and, once started, the session itself.
#[component]
pub fn TestStartView(test_id: String) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let test_id = TestId::new(test_id);
    let session_loop = ctx.session_loop();
    let fullscreen = ctx.fullscreen();

    let gate = use_signal(|| None::<StartGate>);
    let title = use_signal(String::new);
    let vm = use_signal(|| None::<SessionVm>);
    let error = use_signal(|| None::<ViewError>);

    let resource = {
        let session_loop = session_loop.clone();
        let test_id = test_id.clone();
        use_resource(move || {
            let session_loop = session_loop.clone();
            let test_id = test_id.clone();
            let mut gate = gate;
            let mut title = title;
            async move {
                let (test, opened) = session_loop
                    .open_gate(&test_id)
                    .await
                    .map_err(|err| match err {
                        SessionError::UnknownTest(_) => ViewError::NotFound,
                        _ => ViewError::Unknown,
                    })?;
                gate.set(Some(opened));
                title.set(test.title().to_owned());
                Ok::<_, ViewError>(InstructionsVm::from(&test))
            }
        })
    };
    let state = view_state_from_resource(&resource);

    let on_agree = use_callback(move |agreed: bool| {
        let mut gate = gate;
        if let Some(gate) = gate.write().as_mut() {
            gate.set_agreed(agreed);
        }
    });

    let on_start = use_callback(move |()| {
        let mut gate = gate;
        let mut error = error;
        let result = gate.write().as_mut().map(StartGate::request_start);
        match result {
            Some(Ok(())) => error.set(None),
            Some(Err(_)) => error.set(Some(ViewError::Gate)),
            None => error.set(Some(ViewError::Unknown)),
        }
    });

    let on_dismiss = use_callback(move |()| {
        let mut gate = gate;
        if let Some(gate) = gate.write().as_mut() {
            gate.dismiss_prompt();
        }
    });

    let on_enter = {
        let session_loop = session_loop.clone();
        let fullscreen = fullscreen.clone();
        let test_id = test_id.clone();
        use_callback(move |()| {
            let mut gate = gate;
            let mut error = error;
            let attempt = gate
                .write()
                .as_mut()
                .map(|gate| gate.enter_fullscreen(fullscreen.as_ref()));
            let pass = match attempt {
                Some(Ok(pass)) => pass,
                // The gate keeps a retry notice for the prompt.
                Some(Err(GateError::Fullscreen(_))) => return,
                Some(Err(_)) => {
                    error.set(Some(ViewError::Gate));
                    return;
                }
                None => {
                    error.set(Some(ViewError::Unknown));
                    return;
                }
            };

            let session_loop = session_loop.clone();
            let fullscreen = fullscreen.clone();
            let test_id = test_id.clone();
            let mut vm = vm;
            spawn(async move {
                let title = title.read().clone();
                match start_session(&session_loop, &title, &test_id, &pass).await {
                    Ok(started) => {
                        vm.set(Some(started));
                        error.set(None);
                    }
                    Err(err) => {
                        fullscreen.exit_fullscreen();
                        error.set(Some(err));
                    }
                }
            });
        })
    };

    let dispatch_intent = {
        let ctx = ctx.clone();
        let session_loop = session_loop.clone();
        let fullscreen = fullscreen.clone();
        use_callback(move |intent: SessionIntent| {
            let mut vm = vm;
            let mut error = error;
            let outcome = match vm.write().as_mut() {
                Some(session) => session.dispatch(&session_loop, intent),
                None => Err(ViewError::Unknown),
            };
            match outcome {
                Ok(SessionOutcome::Continue) => error.set(None),
                Ok(SessionOutcome::Submitted(summary)) => {
                    ctx.record_submission(summary);
                    fullscreen.exit_fullscreen();
                    let _ = navigator.push(Route::Catalog {});
                }
                Err(err) => error.set(Some(err)),
            }
        })
    };

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<TestStartHandles>() {
                handles.register(on_agree, on_start, on_enter, dispatch_intent, vm);
            }
        }
    }

    let has_session = vm.read().is_some();
    let (phase, agreed, notice) = match gate.read().as_ref() {
        Some(gate) => (gate.phase(), gate.is_agreed(), gate.notice().map(str::to_owned)),
        None => (GatePhase::Agreement, false, None),
    };
    let current_error = *error.read();

    rsx! {
        div { class: "page test-start-page",
            if let Some(err) = current_error {
                p { class: "page-error", role: "alert", "{err.message()}" }
            }
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                    Link { class: "btn btn-secondary", to: Route::Catalog {}, "Back to Mock Tests" }
                },
                ViewState::Ready(instructions) => rsx! {
                    if has_session {
                        SessionPanel { vm, on_intent: dispatch_intent }
                    } else {
                        InstructionsPanel { instructions, agreed, on_agree, on_start }
                        if phase == GatePhase::FullscreenPrompt {
                            FullscreenPrompt { notice, on_enter, on_dismiss }
                        }
                    }
                },
            }
        }
    }
}

#[component]
fn InstructionsPanel(
    instructions: InstructionsVm,
    agreed: bool,
    on_agree: Callback<bool>,
    on_start: Callback<()>,
) -> Element {
    rsx! {
        article { class: "instructions",
            header { class: "instructions__header",
                h2 { "{instructions.title}" }
                if !instructions.description.is_empty() {
                    p { class: "instructions__description", "{instructions.description}" }
                }
                dl { class: "instructions__facts",
                    for (label, value) in instructions.facts {
                        div { key: "{label}", class: "fact",
                            dt { "{label}" }
                            dd { "{value}" }
                        }
                    }
                }
            }
            section { class: "instructions__list",
                h3 { "Instructions" }
                ol {
                    for (index, line) in instructions.instructions.into_iter().enumerate() {
                        li { key: "{index}", "{line}" }
                    }
                }
                if !instructions.notes.is_empty() {
                    div { class: "instructions__notes",
                        for (index, note) in instructions.notes.into_iter().enumerate() {
                            p { key: "{index}", class: "note",
                                strong { if index == 0 { "Important: " } else { "Note: " } }
                                "{note}"
                            }
                        }
                    }
                }
            }
            if !instructions.components.is_empty() {
                section { class: "instructions__components",
                    h3 { "Test Components" }
                    for component in instructions.components {
                        div { key: "{component.name}", class: "component",
                            h4 { "{component.name}" }
                            p { "{component.description}" }
                        }
                    }
                }
            }
            footer { class: "instructions__footer",
                label { class: "agreement",
                    input {
                        r#type: "checkbox",
                        id: "agreement",
                        checked: agreed,
                        onchange: move |evt: FormEvent| on_agree.call(evt.checked()),
                    }
                    span { "{instructions.agreement_text}" }
                }
                button {
                    class: "btn btn-primary",
                    id: "start-test",
                    r#type: "button",
                    disabled: !agreed,
                    onclick: move |_| on_start.call(()),
                    "START TEST"
                }
                if !agreed {
                    p { class: "instructions__hint", "Please agree to the instructions to start the test" }
                }
            }
        }
    }
}

#[component]
fn FullscreenPrompt(
    notice: Option<String>,
    on_enter: Callback<()>,
    on_dismiss: Callback<()>,
) -> Element {
    rsx! {
        div {
            class: "modal-overlay",
            tabindex: "0",
            onkeydown: move |evt: KeyboardEvent| {
                if evt.key() == Key::Escape {
                    on_dismiss.call(());
                }
            },
            div {
                class: "modal",
                role: "dialog",
                aria_modal: "true",
                aria_labelledby: "fullscreen-title",
                h3 { id: "fullscreen-title", "Enter Full-Screen Mode" }
                p {
                    "This test must be taken in full-screen mode. Leaving full-screen mode during the test is recorded."
                }
                p { class: "modal__warning", "Full-screen mode is required for this test." }
                if let Some(notice) = notice {
                    p { class: "modal__notice", role: "alert", "{notice}" }
                }
                div { class: "modal__actions",
                    button {
                        class: "btn btn-secondary",
                        id: "fullscreen-cancel",
                        r#type: "button",
                        onclick: move |_| on_dismiss.call(()),
                        "Cancel"
                    }
                    button {
                        class: "btn btn-primary",
                        id: "fullscreen-enter",
                        r#type: "button",
                        onclick: move |_| on_enter.call(()),
                        "Enter Fullscreen & Start"
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct TestStartHandles {
    agree: Rc<RefCell<Option<Callback<bool>>>>,
    start: Rc<RefCell<Option<Callback<()>>>>,
    enter: Rc<RefCell<Option<Callback<()>>>>,
    dispatch: Rc<RefCell<Option<Callback<SessionIntent>>>>,
    vm: Rc<RefCell<Option<Signal<Option<SessionVm>>>>>,
}

#[cfg(test)]
impl TestStartHandles {
    pub(crate) fn register(
        &self,
        agree: Callback<bool>,
        start: Callback<()>,
        enter: Callback<()>,
        dispatch: Callback<SessionIntent>,
        vm: Signal<Option<SessionVm>>,
    ) {
        *self.agree.borrow_mut() = Some(agree);
        *self.start.borrow_mut() = Some(start);
        *self.enter.borrow_mut() = Some(enter);
        *self.dispatch.borrow_mut() = Some(dispatch);
        *self.vm.borrow_mut() = Some(vm);
    }

    pub(crate) fn agree(&self) -> Callback<bool> {
        (*self.agree.borrow()).expect("agree registered")
    }

    pub(crate) fn start(&self) -> Callback<()> {
        (*self.start.borrow()).expect("start registered")
    }

    pub(crate) fn enter(&self) -> Callback<()> {
        (*self.enter.borrow()).expect("enter registered")
    }

    pub(crate) fn dispatch(&self) -> Callback<SessionIntent> {
        (*self.dispatch.borrow()).expect("dispatch registered")
    }

    pub(crate) fn vm(&self) -> Signal<Option<SessionVm>> {
        (*self.vm.borrow()).expect("vm registered")
    }
}
