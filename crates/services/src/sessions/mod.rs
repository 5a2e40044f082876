mod gate;
mod progress;
mod service;
mod ticker;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use gate::{
    FULLSCREEN_FAILED_NOTICE, FullscreenPresenter, GatePass, GatePhase, NoFullscreen, StartGate,
};
pub use progress::{ConfirmOutcome, SessionProgress, SubmitPrompt};
pub use service::{Direction, SessionView, TestSession};
pub use ticker::{SessionTicker, SharedSession, TICK_PERIOD, TickerExit, run_ticker};
pub use workflow::SessionLoopService;
