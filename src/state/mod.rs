//! Application state management
//!
//! Constructor-injected services shared by every request.

pub mod app_state;

pub use app_state::AppState;
