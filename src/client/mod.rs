//! Client side of LyricLens: backend access, per-operation state and the
//! two-screen view used by `cli-lens`.

mod api;
mod controller;
mod state;
pub mod view;

pub use api::{ClientError, HttpLensBackend, LensBackend};
pub use controller::{LensController, LensState};
pub use state::OperationState;
pub use view::ViewState;
