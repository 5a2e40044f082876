#![forbid(unsafe_code)]

pub mod catalog_service;
pub mod error;
pub mod sessions;

pub use exam_core::Clock;
pub use sessions as session;

pub use catalog_service::{CatalogFilter, CatalogService};
pub use error::{CatalogError, FullscreenError, GateError, SessionError};

pub use sessions::{
    ConfirmOutcome, Direction, FULLSCREEN_FAILED_NOTICE, FullscreenPresenter, GatePass, GatePhase,
    NoFullscreen, SessionLoopService, SessionProgress, SessionTicker, SessionView, SharedSession,
    StartGate, SubmitPrompt, TICK_PERIOD, TestSession, TickerExit, run_ticker,
};
