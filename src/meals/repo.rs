use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use tokio::sync::RwLock;

use crate::catalog::Nutrition;
use crate::error::ApiError;
use crate::storage::DocumentStore;

pub const MEALS_DOC: &str = "meals.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    /// Parses user input, lowercased first.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => Some(Self::Breakfast),
            "lunch" => Some(Self::Lunch),
            "dinner" => Some(Self::Dinner),
            "snack" => Some(Self::Snack),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
            Self::Snack => "snack",
        }
    }
}

impl std::fmt::Display for MealType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One logged meal with its resolved nutrition totals. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealEntry {
    pub meal_type: MealType,
    pub items: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub logged_at: OffsetDateTime,
    pub nutrition: Nutrition,
}

/// User name → chronological meal entries, loaded whole at startup and
/// rewritten whole on every append.
pub struct MealLogStore {
    store: Arc<dyn DocumentStore>,
    logs: RwLock<BTreeMap<String, Vec<MealEntry>>>,
}

impl MealLogStore {
    pub async fn load(store: Arc<dyn DocumentStore>) -> anyhow::Result<Self> {
        let logs = match store.read(MEALS_DOC).await? {
            Some(raw) => serde_json::from_str(&raw).context("parse meals.json")?,
            None => BTreeMap::new(),
        };
        Ok(Self { store, logs: RwLock::new(logs) })
    }

    pub async fn append(&self, user: &str, entry: MealEntry) -> Result<(), ApiError> {
        let mut logs = self.logs.write().await;
        logs.entry(user.to_string()).or_default().push(entry);
        let persisted = match serde_json::to_string_pretty(&*logs).context("serialize meals.json")
        {
            Ok(raw) => self.store.write(MEALS_DOC, &raw).await,
            Err(e) => Err(e),
        };
        if let Err(e) = persisted {
            // memory and disk must keep agreeing after a failed rewrite
            if let Some(entries) = logs.get_mut(user) {
                entries.pop();
            }
            if logs.get(user).is_some_and(Vec::is_empty) {
                logs.remove(user);
            }
            return Err(ApiError::Internal(e));
        }
        Ok(())
    }

    /// All entries for a user, oldest first. Unknown users get an empty
    /// list, not an error.
    pub async fn get_all(&self, user: &str) -> Vec<MealEntry> {
        self.logs.read().await.get(user).cloned().unwrap_or_default()
    }

    /// Entries whose UTC date component matches `date` exactly.
    pub async fn get_by_date(&self, user: &str, date: Date) -> Vec<MealEntry> {
        self.logs
            .read()
            .await
            .get(user)
            .map(|entries| {
                entries
                    .iter()
                    .filter(|e| e.logged_at.date() == date)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}
