use std::sync::{Arc, Mutex, PoisonError};

use exam_core::model::{SessionSummary, TestId};
use services::{CatalogService, FullscreenPresenter, SessionLoopService};

pub trait UiApp: Send + Sync {
    fn session_loop(&self) -> Arc<SessionLoopService>;
    fn catalog(&self) -> Arc<CatalogService>;
    fn fullscreen(&self) -> Arc<dyn FullscreenPresenter>;

    /// Test whose start page opens on launch.
    fn initial_test(&self) -> Option<TestId> {
        None
    }
}

#[derive(Clone)]
pub struct AppContext {
    session_loop: Arc<SessionLoopService>,
    catalog: Arc<CatalogService>,
    fullscreen: Arc<dyn FullscreenPresenter>,
    submissions: Arc<Mutex<Vec<SessionSummary>>>,
    initial_test: Arc<Mutex<Option<TestId>>>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            session_loop: app.session_loop(),
            catalog: app.catalog(),
            fullscreen: app.fullscreen(),
            submissions: Arc::new(Mutex::new(Vec::new())),
            initial_test: Arc::new(Mutex::new(app.initial_test())),
        }
    }

    #[must_use]
    pub fn session_loop(&self) -> Arc<SessionLoopService> {
        Arc::clone(&self.session_loop)
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<CatalogService> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn fullscreen(&self) -> Arc<dyn FullscreenPresenter> {
        Arc::clone(&self.fullscreen)
    }

    /// One-shot: the first caller gets the launch test, later callers `None`.
    #[must_use]
    pub fn take_initial_test(&self) -> Option<TestId> {
        self.initial_test
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    /// Keep a submitted session for the catalog banner.
    pub fn record_submission(&self, summary: SessionSummary) {
        self.submissions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(summary);
    }

    #[must_use]
    pub fn last_submission(&self) -> Option<SessionSummary> {
        self.submissions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
