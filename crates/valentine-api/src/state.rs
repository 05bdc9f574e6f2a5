use std::sync::Arc;

use tracing::error;
use valentine_db::Storage;

use crate::error::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub storage: Arc<dyn Storage>,
}

impl AppStateInner {
    pub fn new(storage: Arc<dyn Storage>) -> AppState {
        Arc::new(Self { storage })
    }

    /// Run a storage call off the async runtime.
    pub async fn run<F, T>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&dyn Storage) -> valentine_db::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let storage = self.storage.clone();
        tokio::task::spawn_blocking(move || f(storage.as_ref()))
            .await
            .map_err(|e| {
                error!("spawn_blocking join error: {}", e);
                ApiError::Internal
            })?
            .map_err(ApiError::from)
    }
}
