//! SQLite storage backend.
//!
//! The database file lives next to the process and is opened once per
//! process lifetime with foreign-key enforcement enabled, so deleting a
//! member cascades its activity associations away.

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;

use crate::errors::AppError;
use crate::models::{Activity, Member, Status};

use super::Store;

/// Initialize the database connection pool and run migrations.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    // Ensure the parent directory exists
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await.ok();
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30))
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    // Run embedded migrations
    run_migrations(&pool).await?;

    Ok(pool)
}

/// Run database migrations.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    // Create tables if they don't exist
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS members (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            role TEXT,
            registered_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS activities (
            id TEXT PRIMARY KEY,
            token TEXT NOT NULL UNIQUE,
            title TEXT NOT NULL,
            status TEXT NOT NULL,
            created_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS activity_members (
            activity_id TEXT NOT NULL REFERENCES activities(id) ON DELETE CASCADE,
            member_id TEXT NOT NULL REFERENCES members(id) ON DELETE CASCADE,
            position INTEGER NOT NULL,
            PRIMARY KEY (activity_id, member_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS action_log (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            action TEXT NOT NULL,
            logged_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes for common queries
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_members_name ON members(name);
        CREATE INDEX IF NOT EXISTS idx_activity_members_member ON activity_members(member_id);
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// SQLite-backed store.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Fire-and-forget entry in the action log. Failures are logged and
    /// swallowed; this never surfaces to the caller.
    pub async fn add_log_entry(&self, action: &str) {
        let now = Utc::now().to_rfc3339();
        let result = sqlx::query("INSERT INTO action_log (action, logged_at) VALUES (?, ?)")
            .bind(action)
            .bind(&now)
            .execute(&self.pool)
            .await;

        if let Err(err) = result {
            tracing::warn!("Failed to write action log entry: {}", err);
        }
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn add_member(&self, name: &str, role: Option<&str>) -> Result<Member, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query("INSERT INTO members (id, name, role, registered_at) VALUES (?, ?, ?, ?)")
            .bind(&id)
            .bind(name)
            .bind(role)
            .bind(&now)
            .execute(&self.pool)
            .await?;

        self.add_log_entry(&format!("member added: {}", name)).await;

        Ok(Member {
            id,
            name: name.to_string(),
            role: role.map(|r| r.to_string()),
            registered_at: now,
        })
    }

    async fn delete_member(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM members WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Member {} not found", id)));
        }

        self.add_log_entry(&format!("member deleted: {}", id)).await;
        Ok(())
    }

    async fn list_members(&self) -> Result<Vec<Member>, AppError> {
        let rows =
            sqlx::query("SELECT id, name, role, registered_at FROM members ORDER BY name")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.iter().map(member_from_row).collect())
    }

    async fn add_activity(
        &self,
        title: &str,
        status: Status,
        member_ids: &[String],
    ) -> Result<Activity, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let token = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        // The activity row and its association rows commit together, so a
        // rejected member id leaves no partial activity behind.
        let mut tx = self.pool.begin().await?;

        let mut members = Vec::with_capacity(member_ids.len());
        for member_id in member_ids {
            let row = sqlx::query("SELECT id, name, role, registered_at FROM members WHERE id = ?")
                .bind(member_id)
                .fetch_optional(&mut *tx)
                .await?;

            let member = row
                .as_ref()
                .map(member_from_row)
                .ok_or_else(|| AppError::Validation(format!("Unknown member {}", member_id)))?;
            members.push(member);
        }

        sqlx::query(
            "INSERT INTO activities (id, token, title, status, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&token)
        .bind(title)
        .bind(status.as_str())
        .bind(&now)
        .execute(&mut *tx)
        .await?;

        for (position, member_id) in member_ids.iter().enumerate() {
            sqlx::query(
                "INSERT INTO activity_members (activity_id, member_id, position) VALUES (?, ?, ?)",
            )
            .bind(&id)
            .bind(member_id)
            .bind(position as i64)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        self.add_log_entry(&format!("activity added: {}", title))
            .await;

        Ok(Activity {
            id,
            token,
            title: title.to_string(),
            status,
            created_at: now,
            members,
        })
    }

    async fn delete_activity(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM activities WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Activity {} not found", id)));
        }

        self.add_log_entry(&format!("activity deleted: {}", id))
            .await;
        Ok(())
    }

    async fn list_activities(&self) -> Result<Vec<Activity>, AppError> {
        let rows = sqlx::query(
            r#"SELECT a.id, a.token, a.title, a.status, a.created_at,
                      m.id AS member_id, m.name AS member_name,
                      m.role AS member_role, m.registered_at AS member_registered_at
               FROM activities a
               LEFT JOIN activity_members am ON am.activity_id = a.id
               LEFT JOIN members m ON m.id = am.member_id
               ORDER BY a.created_at, a.id, am.position"#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut flat = Vec::with_capacity(rows.len());
        for row in &rows {
            let status_text: String = row.get("status");
            let status = Status::parse(&status_text).ok_or_else(|| {
                AppError::Internal(format!("Unknown stored status: {}", status_text))
            })?;

            let activity = Activity {
                id: row.get("id"),
                token: row.get("token"),
                title: row.get("title"),
                status,
                created_at: row.get("created_at"),
                members: Vec::new(),
            };

            let member = row
                .get::<Option<String>, _>("member_id")
                .map(|member_id| Member {
                    id: member_id,
                    name: row.get("member_name"),
                    role: row.get("member_role"),
                    registered_at: row.get("member_registered_at"),
                });

            flat.push((activity, member));
        }

        Ok(group_activity_rows(flat))
    }
}

fn member_from_row(row: &sqlx::sqlite::SqliteRow) -> Member {
    Member {
        id: row.get("id"),
        name: row.get("name"),
        role: row.get("role"),
        registered_at: row.get("registered_at"),
    }
}

/// Group a flat join row sequence into one activity per distinct id.
///
/// First-occurrence order is preserved and members are collected in row
/// order. A row with no member (left-join miss) contributes the activity
/// but appends nothing to its member list.
fn group_activity_rows(rows: Vec<(Activity, Option<Member>)>) -> Vec<Activity> {
    let mut grouped: Vec<Activity> = Vec::new();
    let mut index_by_id: HashMap<String, usize> = HashMap::new();

    for (activity, member) in rows {
        let idx = match index_by_id.get(&activity.id) {
            Some(&idx) => idx,
            None => {
                index_by_id.insert(activity.id.clone(), grouped.len());
                grouped.push(activity);
                grouped.len() - 1
            }
        };

        if let Some(member) = member {
            grouped[idx].members.push(member);
        }
    }

    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn activity(id: &str) -> Activity {
        Activity {
            id: id.to_string(),
            token: format!("token-{}", id),
            title: format!("Activity {}", id),
            status: Status::Todo,
            created_at: "2024-01-01T00:00:00Z".to_string(),
            members: Vec::new(),
        }
    }

    fn member(id: &str, name: &str) -> Member {
        Member {
            id: id.to_string(),
            name: name.to_string(),
            role: Some("Developer".to_string()),
            registered_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_group_preserves_first_seen_order() {
        let rows = vec![
            (activity("a"), Some(member("m1", "Alice"))),
            (activity("b"), Some(member("m2", "Bob"))),
            (activity("a"), Some(member("m3", "Carol"))),
        ];

        let grouped = group_activity_rows(rows);

        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].id, "a");
        assert_eq!(grouped[1].id, "b");
        assert_eq!(grouped[0].members.len(), 2);
        assert_eq!(grouped[0].members[0].name, "Alice");
        assert_eq!(grouped[0].members[1].name, "Carol");
        assert_eq!(grouped[1].members.len(), 1);
    }

    #[test]
    fn test_group_keeps_memberless_activity() {
        let rows = vec![
            (activity("a"), None),
            (activity("b"), Some(member("m1", "Alice"))),
        ];

        let grouped = group_activity_rows(rows);

        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].id, "a");
        assert!(grouped[0].members.is_empty());
        assert_eq!(grouped[1].members.len(), 1);
    }

    #[test]
    fn test_group_empty_input() {
        assert!(group_activity_rows(Vec::new()).is_empty());
    }
}
