//! Activity API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::{Activity, CreateActivityRequest, Status};
use crate::AppState;

/// GET /api/activities - List all activities with their members.
pub async fn list_activities(State(state): State<AppState>) -> ApiResult<Vec<Activity>> {
    let activities = state.store.list_activities().await?;
    success(activities)
}

/// POST /api/activities - Create a new activity.
///
/// An empty member selection is allowed; an unknown status or member id is
/// rejected before anything is written.
pub async fn create_activity(
    State(state): State<AppState>,
    Json(request): Json<CreateActivityRequest>,
) -> ApiResult<Activity> {
    if request.title.trim().is_empty() {
        return Err(AppError::Validation(
            "Activity title is required".to_string(),
        ));
    }

    let status = Status::parse(&request.status).ok_or_else(|| {
        AppError::Validation(format!(
            "Invalid status '{}': expected todo, doing or done",
            request.status
        ))
    })?;

    let activity = state
        .store
        .add_activity(request.title.trim(), status, &request.member_ids)
        .await?;
    success(activity)
}

/// DELETE /api/activities/:id - Delete an activity.
pub async fn delete_activity(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    state.store.delete_activity(&id).await?;
    success(())
}
