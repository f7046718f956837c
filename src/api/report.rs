//! Report API endpoint.

use axum::extract::State;

use crate::errors::AppError;
use crate::report;
use crate::AppState;

/// GET /api/report - Render the member and activity reports as plain text.
pub async fn get_report(State(state): State<AppState>) -> Result<String, AppError> {
    let members = state.store.list_members().await?;
    let activities = state.store.list_activities().await?;

    Ok(report::full_report(&members, &activities))
}
