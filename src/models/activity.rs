//! Activity model and status buckets.

use serde::{Deserialize, Serialize};

use super::Member;

/// Activity status bucket.
///
/// Parsed case-insensitively at every boundary and always written lowercase,
/// so "TODO" and "todo" land in the same bucket.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Todo,
    Doing,
    Done,
}

impl Status {
    /// All buckets in report order.
    pub const ALL: [Status; 3] = [Status::Todo, Status::Doing, Status::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Todo => "todo",
            Status::Doing => "doing",
            Status::Done => "done",
        }
    }

    /// Human-readable bucket heading.
    pub fn label(&self) -> &'static str {
        match self {
            Status::Todo => "To Do",
            Status::Doing => "Doing",
            Status::Done => "Done",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "todo" => Some(Status::Todo),
            "doing" => Some(Status::Doing),
            "done" => Some(Status::Done),
            _ => None,
        }
    }
}

/// A work activity with its assigned members.
///
/// The member list is fixed at creation time; no operation updates it later.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    /// External correlation token, unique per activity.
    pub token: String,
    pub title: String,
    pub status: Status,
    pub created_at: String,
    #[serde(default)]
    pub members: Vec<Member>,
}

/// Request body for creating a new activity.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateActivityRequest {
    pub title: String,
    /// Status as free text; parsed case-insensitively.
    pub status: String,
    #[serde(default)]
    pub member_ids: Vec<String>,
}
