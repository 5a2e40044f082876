use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use exam_core::time::fixed_now;
use services::{
    CatalogService, Clock, FullscreenPresenter, NoFullscreen, SessionLoopService,
};
use storage::Storage;

use crate::context::{AppContext, UiApp, build_app_context};
use crate::views::test_start::TestStartHandles;
use crate::views::{CatalogView, TestStartView};

#[derive(Clone)]
struct TestApp {
    session_loop: Arc<SessionLoopService>,
    catalog: Arc<CatalogService>,
    fullscreen: Arc<dyn FullscreenPresenter>,
}

impl UiApp for TestApp {
    fn session_loop(&self) -> Arc<SessionLoopService> {
        Arc::clone(&self.session_loop)
    }

    fn catalog(&self) -> Arc<CatalogService> {
        Arc::clone(&self.catalog)
    }

    fn fullscreen(&self) -> Arc<dyn FullscreenPresenter> {
        Arc::clone(&self.fullscreen)
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum ViewKind {
    Catalog,
    TestStart(String),
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    context: AppContext,
    view: ViewKind,
    handles: Option<TestStartHandles>,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    use_context_provider(|| props.context.clone());
    use_context_provider(|| props.view.clone());
    if let Some(handles) = props.handles.clone() {
        use_context_provider(|| handles);
    }
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Catalog => rsx! { CatalogView {} },
        ViewKind::TestStart(test_id) => rsx! { TestStartView { test_id } },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub context: AppContext,
    pub handles: Option<TestStartHandles>,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Run `f` inside the dom runtime, then flush renders.
    pub fn act(&mut self, f: impl FnOnce(&TestStartHandles)) {
        let handles = self.handles.clone().expect("test start handles");
        self.dom.in_runtime(|| f(&handles));
        drive_dom(&mut self.dom);
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(view: ViewKind) -> ViewHarness {
    let storage = Storage::bundled().expect("bundled fixtures");
    setup_view_harness_with(view, storage, Arc::new(NoFullscreen))
}

pub fn setup_view_harness_with(
    view: ViewKind,
    storage: Storage,
    fullscreen: Arc<dyn FullscreenPresenter>,
) -> ViewHarness {
    let clock = Clock::fixed(fixed_now());
    let app: Arc<dyn UiApp> = Arc::new(TestApp {
        session_loop: Arc::new(SessionLoopService::new(
            clock,
            Arc::clone(&storage.tests),
            Arc::clone(&storage.questions),
        )),
        catalog: Arc::new(CatalogService::new(Arc::clone(&storage.tests))),
        fullscreen,
    });
    let context = build_app_context(&app);
    let handles = match view {
        ViewKind::TestStart(_) => Some(TestStartHandles::default()),
        ViewKind::Catalog => None,
    };

    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            context: context.clone(),
            view,
            handles: handles.clone(),
        },
    );

    ViewHarness {
        dom,
        context,
        handles,
    }
}
