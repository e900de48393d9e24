//! REST endpoint handlers.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/next_action` | Fold a game event into memory and ask for the next action |
//! | `POST` | `/new_game` | Reset memory for a fresh game |
//! | `GET` | `/memory` | Rendered memory and its token count |
//! | `GET` | `/records/{name}` | One record as JSON |
//! | `GET` | `/messages` | Message feed |

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use castaway_memory::store::load_item_list;
use castaway_memory::{MemoryError, Record, RecordStore};
use castaway_types::{ActionRequest, DecisionResult, Item};
use serde::Serialize;
use tokio::sync::OwnedMutexGuard;
use tokio::task::spawn_blocking;
use tracing::{info, warn};

use crate::error::ApiError;
use crate::state::AppState;

/// Rendered memory as the model sees it.
#[derive(Debug, Serialize)]
pub struct MemoryView {
    /// The full memory text.
    pub memory: String,
    /// Token count of `memory`.
    pub tokens: usize,
    /// Encoding the count was taken in.
    pub encoding: &'static str,
}

/// Message feed payload.
#[derive(Debug, Serialize)]
pub struct MessagesView {
    /// Messages in file order.
    pub messages: Vec<Item>,
}

type StoreGuard = OwnedMutexGuard<RecordStore>;

fn memory_view(state: &AppState, memory: String) -> MemoryView {
    let tokens = state.tokens.count(&memory);
    MemoryView {
        memory,
        tokens,
        encoding: state.tokens.encoding(),
    }
}

/// Run record file work on the blocking pool, handing the guard back.
async fn with_store<T, F>(mut store: StoreGuard, work: F) -> Result<(StoreGuard, T), ApiError>
where
    F: FnOnce(&mut RecordStore) -> Result<T, MemoryError> + Send + 'static,
    T: Send + 'static,
{
    let outcome = spawn_blocking(move || {
        let value = work(&mut store)?;
        Ok::<_, MemoryError>((store, value))
    })
    .await?;
    outcome.map_err(ApiError::from)
}

/// Process one game event and return the next action.
///
/// The event is validated before any record is touched. The store lock is
/// held until the decision comes back.
pub async fn next_action(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ActionRequest>, JsonRejection>,
) -> Result<Json<DecisionResult>, ApiError> {
    let Json(request) = payload.map_err(|rejection| ApiError::Validation(rejection.body_text()))?;

    let store = Arc::clone(&state.store).lock_owned().await;

    request
        .inventory
        .validate(&store.config().inventory_items)
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let action = request.action.clone();
    let status = request.status.clone();
    let (store, memory) = with_store(store, move |store| {
        store.update_from_action_request(&request)?;
        if let Some(objective) = store.update_objectives(&request.inventory)? {
            info!(objective = %objective, "new objective");
        }
        Ok(store.all_records_to_string())
    })
    .await?;

    let view = memory_view(&state, memory);
    info!(
        action = %action,
        status = %status,
        tokens = view.tokens,
        "memory updated"
    );

    let actions = store.action_names();
    let decision = state.decider.next_action(&view.memory, &actions).await;

    if !decision.is_no_decision() && !store.knows_action(&decision.action) {
        warn!(action = %decision.action, "model chose an action outside the catalog");
    }

    Ok(Json(decision))
}

/// Reset memory for a fresh game and return the new memory.
pub async fn new_game(State(state): State<Arc<AppState>>) -> Result<Json<MemoryView>, ApiError> {
    let store = Arc::clone(&state.store).lock_owned().await;
    let (_store, memory) = with_store(store, |store| {
        store.new_game()?;
        Ok(store.all_records_to_string())
    })
    .await?;
    let view = memory_view(&state, memory);
    info!(tokens = view.tokens, "new game ready");
    Ok(Json(view))
}

/// Return the rendered memory.
pub async fn get_memory(State(state): State<Arc<AppState>>) -> Json<MemoryView> {
    let memory = state.store.lock().await.all_records_to_string();
    Json(memory_view(&state, memory))
}

/// Return one record.
pub async fn get_record(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<Record>, ApiError> {
    let store = state.store.lock().await;
    let record = store.get(&name)?;
    Ok(Json(record.clone()))
}

/// Return the message feed. A missing feed file is an empty feed.
pub async fn get_messages(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MessagesView>, ApiError> {
    let path = state.messages_path.clone();
    let messages = spawn_blocking(move || load_item_list(&path, "messages")).await??;
    Ok(Json(MessagesView { messages }))
}
