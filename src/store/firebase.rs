//! Firebase Realtime Database storage backend.
//!
//! Members live under `integrantes` keyed by member id; activities live
//! under `atividades` keyed by their correlation token, each embedding a
//! snapshot of its members taken at assignment time. Deleting a member
//! leaves those snapshots untouched.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{Activity, Member, Status};

use super::Store;

const MEMBERS_PATH: &str = "integrantes";
const ACTIVITIES_PATH: &str = "atividades";

/// Activity document as stored in the tree. The document key doubles as
/// both activity id and correlation token.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActivityDoc {
    title: String,
    status: String,
    created_at: String,
    #[serde(default)]
    members: Vec<Member>,
}

/// Store backed by a remote Realtime Database tree over HTTPS.
#[derive(Clone)]
pub struct FirebaseStore {
    http: Client,
    base_url: String,
    auth: Option<String>,
}

impl FirebaseStore {
    pub fn new(base_url: String, auth: Option<String>) -> Self {
        Self {
            http: Client::new(),
            base_url,
            auth,
        }
    }

    fn url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        match &self.auth {
            Some(token) => format!("{}/{}.json?auth={}", base, path, token),
            None => format!("{}/{}.json", base, path),
        }
    }

    /// GET a subtree. The Realtime Database returns JSON `null` for a
    /// missing path, which maps to `None`.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, AppError> {
        let response = self.http.get(self.url(path)).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Upstream(format!(
                "Document store returned {} for GET {}",
                status, path
            )));
        }

        Ok(response.json::<Option<T>>().await?)
    }

    async fn put_json<T: Serialize>(&self, path: &str, body: &T) -> Result<(), AppError> {
        let response = self.http.put(self.url(path)).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Upstream(format!(
                "Document store returned {} for PUT {}",
                status, path
            )));
        }

        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<(), AppError> {
        let response = self.http.delete(self.url(path)).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Upstream(format!(
                "Document store returned {} for DELETE {}",
                status, path
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl Store for FirebaseStore {
    async fn add_member(&self, name: &str, role: Option<&str>) -> Result<Member, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        let member = Member {
            id: id.clone(),
            name: name.to_string(),
            role: role.map(|r| r.to_string()),
            registered_at: now,
        };

        self.put_json(&format!("{}/{}", MEMBERS_PATH, id), &member)
            .await?;

        Ok(member)
    }

    async fn delete_member(&self, id: &str) -> Result<(), AppError> {
        let path = format!("{}/{}", MEMBERS_PATH, id);

        let existing: Option<Member> = self.get_json(&path).await?;
        if existing.is_none() {
            return Err(AppError::NotFound(format!("Member {} not found", id)));
        }

        // Snapshots embedded in activity documents are left untouched.
        self.delete(&path).await
    }

    async fn list_members(&self) -> Result<Vec<Member>, AppError> {
        let collection: Option<HashMap<String, Member>> = self.get_json(MEMBERS_PATH).await?;

        let mut members: Vec<Member> = collection.unwrap_or_default().into_values().collect();
        members.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));

        Ok(members)
    }

    async fn add_activity(
        &self,
        title: &str,
        status: Status,
        member_ids: &[String],
    ) -> Result<Activity, AppError> {
        let collection: Option<HashMap<String, Member>> = self.get_json(MEMBERS_PATH).await?;
        let known = collection.unwrap_or_default();

        // Embed full member records in submission order, not just ids.
        let mut members = Vec::with_capacity(member_ids.len());
        for member_id in member_ids {
            let member = known
                .get(member_id)
                .cloned()
                .ok_or_else(|| AppError::Validation(format!("Unknown member {}", member_id)))?;
            members.push(member);
        }

        let token = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        let doc = ActivityDoc {
            title: title.to_string(),
            status: status.as_str().to_string(),
            created_at: now.clone(),
            members: members.clone(),
        };

        self.put_json(&format!("{}/{}", ACTIVITIES_PATH, token), &doc)
            .await?;

        Ok(Activity {
            id: token.clone(),
            token,
            title: title.to_string(),
            status,
            created_at: now,
            members,
        })
    }

    async fn delete_activity(&self, id: &str) -> Result<(), AppError> {
        let path = format!("{}/{}", ACTIVITIES_PATH, id);

        let existing: Option<ActivityDoc> = self.get_json(&path).await?;
        if existing.is_none() {
            return Err(AppError::NotFound(format!("Activity {} not found", id)));
        }

        self.delete(&path).await
    }

    async fn list_activities(&self) -> Result<Vec<Activity>, AppError> {
        let collection: Option<BTreeMap<String, ActivityDoc>> =
            self.get_json(ACTIVITIES_PATH).await?;

        let mut activities = Vec::new();
        for (token, doc) in collection.unwrap_or_default() {
            let status = Status::parse(&doc.status).ok_or_else(|| {
                AppError::Internal(format!("Unknown stored status: {}", doc.status))
            })?;

            activities.push(Activity {
                id: token.clone(),
                token,
                title: doc.title,
                status,
                created_at: doc.created_at,
                members: doc.members,
            });
        }

        Ok(activities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_without_auth() {
        let store = FirebaseStore::new("https://example.firebaseio.com/".to_string(), None);
        assert_eq!(
            store.url("integrantes/abc"),
            "https://example.firebaseio.com/integrantes/abc.json"
        );
    }

    #[test]
    fn test_url_with_auth() {
        let store = FirebaseStore::new(
            "https://example.firebaseio.com".to_string(),
            Some("secret".to_string()),
        );
        assert_eq!(
            store.url("atividades"),
            "https://example.firebaseio.com/atividades.json?auth=secret"
        );
    }
}
