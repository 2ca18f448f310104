use axum::extract::State;
use axum::Json;
use std::sync::Arc;

use crate::error::AppError;
use crate::state::AppState;
use fanout_core::{
    Action, ActionResult, LoopOrder, PodCount, PodOrder, Request,
};

#[derive(serde::Deserialize)]
pub struct InvokeBody {
    /// Name of a configured target.
    pub target: String,
    /// Name of a configured endpoint.
    pub endpoint: String,
    #[serde(default)]
    pub retries: u32,
    #[serde(default)]
    pub retry_delay_secs: f64,
}

/// POST /api/invoke — ad-hoc one-shot: hit one endpoint on every pod of one
/// target, without declaring an action in config.
pub async fn invoke_ad_hoc(
    State(app): State<AppState>,
    Json(body): Json<InvokeBody>,
) -> Result<Json<ActionResult>, AppError> {
    if !body.retry_delay_secs.is_finite() || body.retry_delay_secs < 0.0 {
        return Err(AppError::bad_request(
            "retry_delay_secs must be non-negative",
        ));
    }

    let target = app.registry.target(&body.target)?;
    let endpoint = app.registry.endpoint(&body.endpoint)?;

    let request = Arc::new(Request {
        name: format!("ad-hoc-{}", endpoint.name),
        endpoint,
        retries: body.retries,
        retry_delay_secs: body.retry_delay_secs,
    });
    let action = Action {
        name: format!("ad-hoc-{}", target.name),
        targets: vec![target],
        requests: vec![request],
        order: PodOrder::NameAscending,
        pod_start_index: 0,
        pod_count: PodCount::All,
        loop_order: LoopOrder::PodsOuter,
    };

    tracing::info!(target = %body.target, endpoint = %body.endpoint, "ad-hoc invoke");
    let result = app.engine.execute(&action).await?;
    Ok(Json(result))
}
