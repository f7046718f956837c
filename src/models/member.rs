//! Team member model.

use serde::{Deserialize, Serialize};

/// A team member who can be assigned to activities.
///
/// The role is a free-text label; "Developer", "Documenter" and "Manager"
/// are the conventional values but nothing enforces the set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub registered_at: String,
}

/// Request body for creating a new member.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMemberRequest {
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
}
