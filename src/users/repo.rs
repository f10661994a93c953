use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tokio::sync::RwLock;

use crate::error::ApiError;
use crate::storage::DocumentStore;
use crate::users::bmr::Gender;

pub const USERS_DOC: &str = "users.json";

/// Registered user. Immutable after creation; there is no update path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub age: u32,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub gender: Gender,
    pub goal: String,
    pub bmr: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub registered_at: OffsetDateTime,
}

/// Name → profile map, loaded whole at startup and rewritten whole on every
/// mutation. The write lock spans check-then-insert plus the rewrite, which
/// keeps the uniqueness invariant under concurrent requests.
pub struct UserStore {
    store: Arc<dyn DocumentStore>,
    users: RwLock<BTreeMap<String, UserProfile>>,
}

impl UserStore {
    pub async fn load(store: Arc<dyn DocumentStore>) -> anyhow::Result<Self> {
        let users = match store.read(USERS_DOC).await? {
            Some(raw) => serde_json::from_str(&raw).context("parse users.json")?,
            None => BTreeMap::new(),
        };
        Ok(Self { store, users: RwLock::new(users) })
    }

    pub async fn exists(&self, name: &str) -> bool {
        self.users.read().await.contains_key(name)
    }

    pub async fn get(&self, name: &str) -> Option<UserProfile> {
        self.users.read().await.get(name).cloned()
    }

    pub async fn create(&self, profile: UserProfile) -> Result<UserProfile, ApiError> {
        let mut users = self.users.write().await;
        if users.contains_key(&profile.name) {
            return Err(ApiError::DuplicateUser(profile.name));
        }
        users.insert(profile.name.clone(), profile.clone());
        let persisted = match serde_json::to_string_pretty(&*users).context("serialize users.json")
        {
            Ok(raw) => self.store.write(USERS_DOC, &raw).await,
            Err(e) => Err(e),
        };
        if let Err(e) = persisted {
            // memory and disk must keep agreeing after a failed rewrite
            users.remove(&profile.name);
            return Err(ApiError::Internal(e));
        }
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::users::bmr::compute_bmr;

    fn profile(name: &str) -> UserProfile {
        UserProfile {
            name: name.to_string(),
            age: 25,
            weight_kg: 70.0,
            height_cm: 175.0,
            gender: Gender::Male,
            goal: "maintain".to_string(),
            bmr: compute_bmr(Gender::Male, 70.0, 175.0, 25.0),
            registered_at: OffsetDateTime::now_utc(),
        }
    }

    #[tokio::test]
    async fn create_then_get() {
        let store = Arc::new(MemoryStore::default());
        let users = UserStore::load(store).await.expect("load");
        users.create(profile("ravi")).await.expect("create");

        assert!(users.exists("ravi").await);
        let back = users.get("ravi").await.expect("get");
        assert_eq!(back.name, "ravi");
        assert_eq!(back.age, 25);
    }

    #[tokio::test]
    async fn duplicate_name_is_rejected_and_first_profile_survives() {
        let store = Arc::new(MemoryStore::default());
        let users = UserStore::load(store).await.expect("load");
        users.create(profile("ravi")).await.expect("create");

        let mut second = profile("ravi");
        second.goal = "bulk".to_string();
        let err = users.create(second).await.unwrap_err();
        assert!(matches!(err, ApiError::DuplicateUser(ref name) if name == "ravi"));

        let back = users.get("ravi").await.expect("get");
        assert_eq!(back.goal, "maintain");
    }

    #[tokio::test]
    async fn reload_reproduces_identical_state() {
        let store = Arc::new(MemoryStore::default());
        let users = UserStore::load(store.clone()).await.expect("load");
        let created = users.create(profile("ravi")).await.expect("create");

        let reloaded = UserStore::load(store).await.expect("reload");
        let back = reloaded.get("ravi").await.expect("get");
        assert_eq!(back.name, created.name);
        assert_eq!(back.bmr, created.bmr);
        assert_eq!(back.gender, created.gender);
        assert_eq!(back.registered_at, created.registered_at);
    }

    #[tokio::test]
    async fn missing_document_loads_empty() {
        let store = Arc::new(MemoryStore::default());
        let users = UserStore::load(store).await.expect("load");
        assert!(!users.exists("anyone").await);
        assert!(users.get("anyone").await.is_none());
    }
}
