use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::services::normalize::{self, CoverReport};
use crate::services::reconcile::{PurgeMode, ReconcileReport, ScanReport};
use crate::state::AppState;

#[derive(Deserialize, utoipa::IntoParams)]
pub struct ReconcileQuery {
    pub mode: Option<PurgeMode>,
    pub dry_run: Option<bool>,
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(untagged)]
pub enum ReconcileOutcome {
    Scan(ScanReport),
    Purge(ReconcileReport),
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ActivateResponse {
    pub modified: u64,
}

#[utoipa::path(
    post,
    path = "/api/admin/reconcile",
    params(ReconcileQuery),
    responses(
        (status = 200, description = "Scan or purge report", body = ReconcileOutcome),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Maintenance"
)]
pub async fn reconcile(
    State(state): State<AppState>,
    Query(query): Query<ReconcileQuery>,
) -> Result<Json<ReconcileOutcome>, AppError> {
    let reconciler = state.reconciler();
    if query.dry_run.unwrap_or(false) {
        return Ok(Json(ReconcileOutcome::Scan(reconciler.scan().await?)));
    }
    let report = reconciler.reconcile(query.mode.unwrap_or_default()).await?;
    Ok(Json(ReconcileOutcome::Purge(report)))
}

#[utoipa::path(
    post,
    path = "/api/admin/events/activate",
    responses(
        (status = 200, description = "Number of events switched to ACTIVE", body = ActivateResponse),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Maintenance"
)]
pub async fn activate_events(State(state): State<AppState>) -> Result<Json<ActivateResponse>, AppError> {
    let modified = normalize::activate_all(&state.events()).await?;
    state.invalidate_cache().await;
    Ok(Json(ActivateResponse { modified }))
}

#[utoipa::path(
    post,
    path = "/api/admin/events/fix-covers",
    responses(
        (status = 200, description = "Rewritten cover paths and covers still missing on disk", body = CoverReport),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Maintenance"
)]
pub async fn fix_covers(State(state): State<AppState>) -> Result<Json<CoverReport>, AppError> {
    let report = normalize::fix_covers(
        &state.events(),
        &state.config.uploads_prefix,
        &state.config.uploads_dir,
    )
    .await?;
    state.invalidate_cache().await;
    Ok(Json(report))
}
