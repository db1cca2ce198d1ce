use std::sync::Arc;

use async_graphql::ErrorExtensions;

use crate::auth::TokenIssuer;
use crate::config::AppConfig;
use crate::database::DbPool;
use crate::errors::{LedgerError, LedgerResult};
use crate::services::{AuthService, GameService, PlayerDirectory};

/// Shared by every resolver through the schema data.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: AppConfig,
    pub tokens: Arc<TokenIssuer>,
}

impl AppState {
    pub fn new(pool: DbPool, config: AppConfig) -> Self {
        let tokens = Arc::new(TokenIssuer::new(&config.auth));
        Self {
            pool,
            config,
            tokens,
        }
    }

    pub fn games(&self) -> GameService {
        GameService::new(self.pool.clone(), self.config.ledger.clone())
    }

    pub fn players(&self) -> PlayerDirectory {
        PlayerDirectory::new(self.pool.clone())
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(self.pool.clone(), Arc::clone(&self.tokens))
    }
}

/// Run blocking store work off the async executor and convert its error into
/// a GraphQL error carrying `extensions.code`.
pub async fn run_blocking<T, F>(work: F) -> async_graphql::Result<T>
where
    F: FnOnce() -> LedgerResult<T> + Send + 'static,
    T: Send + 'static,
{
    let outcome = tokio::task::spawn_blocking(work).await.map_err(|e| {
        LedgerError::Storage(anyhow::anyhow!("Blocking task failed: {e}")).extend()
    })?;
    outcome.map_err(|e| e.extend())
}
