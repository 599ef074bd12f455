//! Maintenance API Handlers

use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::core::ServerState;
use crate::leave::ledger;
use crate::utils::error::AppResponse;
use crate::utils::{AppResult, ok};

/// Run the ledger's global duplicate sweep on demand.
///
/// The same operation runs once at startup; this endpoint lets an operator
/// trigger it without a restart. Safe to invoke repeatedly and concurrently.
pub async fn cleanup(State(state): State<ServerState>) -> AppResult<Json<AppResponse<Value>>> {
    let removed = ledger::global_cleanup(&state.pool).await?;
    tracing::info!(removed, "Manual ledger cleanup finished");
    Ok(ok(json!({ "removed_duplicates": removed })))
}
