//! Dashboard action handler
//!
//! One endpoint per interaction cycle: the client posts a tagged
//! action, the orchestrator fans out to the stores and returns one
//! display-ready outcome.

use axum::{extract::State, Json};

use crate::actions::{ActionOutcome, DashboardAction};
use crate::AppState;
use scholarlens_common::errors::Result;

/// POST /api/actions
pub async fn dispatch_action(
    State(state): State<AppState>,
    Json(action): Json<DashboardAction>,
) -> Result<Json<ActionOutcome>> {
    let outcome = state.orchestrator.dispatch(action).await?;
    Ok(Json(outcome))
}
