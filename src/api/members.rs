//! Member API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::{CreateMemberRequest, Member};
use crate::AppState;

/// GET /api/members - List all members, sorted by name.
pub async fn list_members(State(state): State<AppState>) -> ApiResult<Vec<Member>> {
    let members = state.store.list_members().await?;
    success(members)
}

/// POST /api/members - Create a new member.
pub async fn create_member(
    State(state): State<AppState>,
    Json(request): Json<CreateMemberRequest>,
) -> ApiResult<Member> {
    // Validate required fields
    if request.name.trim().is_empty() {
        return Err(AppError::Validation("Member name is required".to_string()));
    }

    let member = state
        .store
        .add_member(request.name.trim(), request.role.as_deref())
        .await?;
    success(member)
}

/// DELETE /api/members/:id - Delete a member.
pub async fn delete_member(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    state.store.delete_member(&id).await?;
    success(())
}
