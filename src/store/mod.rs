//! Storage layer with two interchangeable backends.
//!
//! Exactly one backend is active per process: SQLite (local file) or a
//! Firebase Realtime Database tree (remote documents). Both expose the same
//! operations through the [`Store`] trait.

mod firebase;
mod sqlite;

pub use firebase::FirebaseStore;
pub use sqlite::{init_database, SqliteStore};

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::{Activity, Member, Status};

/// Common operations over either storage backend.
///
/// Contract note on member deletion: the SQLite backend cascades the member
/// out of existing activity associations, while the Firebase backend stores
/// assignment-time snapshots inside each activity document and leaves them
/// untouched. `list_activities` therefore returns current member rows from
/// SQLite and snapshots from Firebase; callers must tolerate both.
#[async_trait]
pub trait Store: Send + Sync {
    /// Create a member with an optional role label.
    async fn add_member(&self, name: &str, role: Option<&str>) -> Result<Member, AppError>;

    /// Delete a member by id.
    async fn delete_member(&self, id: &str) -> Result<(), AppError>;

    /// List all members, ordered by name ascending.
    async fn list_members(&self) -> Result<Vec<Member>, AppError>;

    /// Create an activity with a fresh correlation token and the given
    /// members in submission order. Unknown member ids are rejected.
    async fn add_activity(
        &self,
        title: &str,
        status: Status,
        member_ids: &[String],
    ) -> Result<Activity, AppError>;

    /// Delete an activity by id.
    async fn delete_activity(&self, id: &str) -> Result<(), AppError>;

    /// List all activities with their member lists; activities with no
    /// members are returned with an empty list, never dropped.
    async fn list_activities(&self) -> Result<Vec<Activity>, AppError>;
}

/// Placeholder members created on first start, matching the original seed.
const SEED_MEMBERS: &[(&str, &str)] = &[
    ("Fulano", "Developer"),
    ("Beltrano", "Documenter"),
    ("Ciclano", "Manager"),
];

/// Seed placeholder members if the store is empty.
///
/// Any pre-existing member skips seeding entirely. Returns the number of
/// members created.
pub async fn seed_members(store: &dyn Store) -> Result<usize, AppError> {
    if !store.list_members().await?.is_empty() {
        return Ok(0);
    }

    for (name, role) in SEED_MEMBERS {
        store.add_member(name, Some(role)).await?;
    }

    Ok(SEED_MEMBERS.len())
}
