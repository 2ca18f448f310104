use axum::extract::State;
use axum::Json;

use crate::state::AppState;

/// GET /api/config — names of all loaded configuration objects.
pub async fn get_config(State(app): State<AppState>) -> Json<fanout_core::RegistrySummary> {
    Json(app.registry.summary())
}
