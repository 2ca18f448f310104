use axum::extract::{Path, State};
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;
use fanout_core::{Action, ActionResult};

fn action_json(action: &Action) -> serde_json::Value {
    serde_json::json!({
        "name": action.name,
        "targets": action.targets.iter().map(|t| t.name.clone()).collect::<Vec<_>>(),
        "requests": action.requests.iter().map(|r| r.name.clone()).collect::<Vec<_>>(),
        "order": action.order,
        "pod_start_index": action.pod_start_index,
        "pod_count": action.pod_count,
        "loop_order": action.loop_order,
    })
}

/// GET /api/actions — list all configured actions.
pub async fn list_actions(State(app): State<AppState>) -> Json<serde_json::Value> {
    let list: Vec<serde_json::Value> = app
        .registry
        .actions()
        .iter()
        .map(|a| action_json(a))
        .collect();
    Json(serde_json::json!(list))
}

/// GET /api/actions/:name — action detail.
pub async fn get_action(
    State(app): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let action = app.registry.action(&name)?;
    Ok(Json(action_json(&action)))
}

/// POST /api/actions/:name — execute the named action.
///
/// Returns 200 with the full ActionResult even when some outcomes failed;
/// 404 for an unknown action; 502 when pod resolution failed.
pub async fn run_action(
    State(app): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ActionResult>, AppError> {
    let action = app.registry.action(&name)?;
    tracing::info!(action = %name, "executing action via API");
    let result = app.engine.execute(&action).await?;
    Ok(Json(result))
}
