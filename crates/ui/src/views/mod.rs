mod catalog;
mod session;
mod state;
mod test_start;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use catalog::CatalogView;
pub use session::SessionPanel;
pub use state::{ViewError, ViewState, view_state_from_resource};
pub use test_start::TestStartView;
