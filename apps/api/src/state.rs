use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::Config;
use crate::matching::pool::JobPool;

/// One job's pool behind its own lock, so work on one job never waits on another.
pub type SharedPool = Arc<RwLock<JobPool>>;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// In-memory job pools keyed by job id. The map lock is only held for lookups and inserts.
    pub pools: Arc<RwLock<HashMap<String, SharedPool>>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            pools: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn pool(&self, job_id: &str) -> Option<SharedPool> {
        self.pools.read().await.get(job_id).cloned()
    }
}
