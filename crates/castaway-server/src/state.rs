//! Shared application state.
//!
//! The record store sits behind one async mutex. A `/next_action` request
//! holds it from the memory update through the completion call, so game
//! events are processed strictly one at a time. The lock is taken as an
//! owned guard so file work can move onto the blocking pool with it.

use std::path::PathBuf;
use std::sync::Arc;

use castaway_memory::{RecordStore, TokenCounter};
use castaway_runner::Decider;
use tokio::sync::Mutex;

/// State shared by all handlers.
pub struct AppState {
    /// The game memory.
    pub store: Arc<Mutex<RecordStore>>,
    /// Asks the model for the next action.
    pub decider: Decider,
    /// Counts tokens of the rendered memory for logging.
    pub tokens: TokenCounter,
    /// Location of the message feed file.
    pub messages_path: PathBuf,
}

impl AppState {
    /// Assemble the state from its parts.
    pub fn new(
        store: RecordStore,
        decider: Decider,
        tokens: TokenCounter,
        messages_path: PathBuf,
    ) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            decider,
            tokens,
            messages_path,
        }
    }
}
