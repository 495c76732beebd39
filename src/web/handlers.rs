//! HTTP handlers for the state endpoints.
//!
//! Both endpoints are pure reads of the state store and always answer
//! 200, even before the first sample has been taken. Faults in the
//! sampler never surface here; they kill the process instead.

use crate::sensor::state::{StateReading, StateStore};
use axum::extract::State;
use axum::response::Json;
use std::sync::Arc;

/// Shared handle to the state store, injected as axum state.
pub type SharedStore = Arc<StateStore>;

/// `GET /json`: the current state and last-transition timestamp.
pub async fn get_json(State(store): State<SharedStore>) -> Json<StateReading> {
    Json(store.read())
}

/// `GET /prometheus`: the current state as a single metrics line.
pub async fn get_prometheus(State(store): State<SharedStore>) -> String {
    let reading = store.read();
    format!("state {}\n", reading.state.as_deref().unwrap_or("None"))
}
