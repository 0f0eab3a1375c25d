use std::sync::Arc;

use skillstack_core::engine::SkillProgressEngine;
use skillstack_core::oracle::KeywordOracle;
use skillstack_core::store::Store;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone; everything sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Storage backend. PostgreSQL in production, in-memory in tests.
    pub store: Arc<dyn Store>,
    pub engine: Arc<SkillProgressEngine>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Wire the progress engine to `store` with the keyword oracle.
    pub fn new(store: Arc<dyn Store>, config: ServerConfig) -> Self {
        let engine = SkillProgressEngine::new(
            Arc::clone(&store),
            Arc::new(KeywordOracle),
            config.engine.clone(),
        );
        Self {
            store,
            engine: Arc::new(engine),
            config: Arc::new(config),
        }
    }
}
