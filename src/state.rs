use crate::config::Config;
use crate::models::Entity;
use crate::store::{Repository, Storage};
use std::sync::Arc;

/// Application state shared across handlers and middleware
#[derive(Clone)]
pub struct AppState {
    /// Persistence handle opened at startup
    pub store: Arc<dyn Storage>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn Storage>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    pub fn repo<E: Entity>(&self) -> Repository<E> {
        Repository::new(self.store.clone())
    }
}
