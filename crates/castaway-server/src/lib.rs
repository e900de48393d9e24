//! HTTP decision service for the Castaway survival agent.
//!
//! The game posts each executed action with the resulting inventory and
//! vitals to `POST /next_action`. The service folds the event into the
//! record store, advances the objective chain, renders the memory, asks
//! the model for the next action, and answers with
//! `{"action", "observation"}`.
//!
//! Auxiliary endpoints reset the game (`POST /new_game`) and expose the
//! memory, single records and the message feed for inspection.

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;

pub use config::CastawayConfig;
pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use startup::{StartupError, build_state};
pub use state::AppState;
