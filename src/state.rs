use std::sync::Arc;

use crate::catalog::FoodCatalog;
use crate::config::AppConfig;
use crate::meals::repo::MealLogStore;
use crate::storage::{DocumentStore, FsStore};
use crate::users::repo::UserStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub catalog: Arc<FoodCatalog>,
    pub users: Arc<UserStore>,
    pub meals: Arc<MealLogStore>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let store: Arc<dyn DocumentStore> = Arc::new(FsStore::new(&config.data_dir));
        Self::from_store(config, store).await
    }

    pub async fn from_store(
        config: Arc<AppConfig>,
        store: Arc<dyn DocumentStore>,
    ) -> anyhow::Result<Self> {
        let users = Arc::new(UserStore::load(store.clone()).await?);
        let meals = Arc::new(MealLogStore::load(store).await?);
        Ok(Self {
            config,
            catalog: Arc::new(FoodCatalog::builtin()),
            users,
            meals,
        })
    }

    /// State over an in-memory store, for tests.
    pub async fn fake() -> Self {
        use crate::storage::MemoryStore;

        let config = Arc::new(AppConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            data_dir: "unused".into(),
        });
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::default());
        Self::from_store(config, store)
            .await
            .expect("memory-backed state")
    }
}
