// Application state shared across all modules

use sqlx::SqlitePool;
use std::sync::Arc;

use crate::auth::{AccessGuard, TokenService};
use crate::common::AppConfig;
use crate::services::Corrector;
use crate::users::UserStore;

/// Application state containing database pool, services, and configuration
///
/// Built once at startup and shared read-only between requests.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub tokens: Arc<TokenService>,
    pub users: UserStore,
    pub guard: AccessGuard,
    pub corrector: Arc<dyn Corrector>,
}

impl AppState {
    pub fn new(db: SqlitePool, config: AppConfig, corrector: Arc<dyn Corrector>) -> Self {
        let tokens = Arc::new(TokenService::new(&config.secret_key));
        let users = UserStore::new(db.clone(), config.bcrypt_cost);
        let guard = AccessGuard::new(tokens.clone(), users.clone());

        Self {
            db,
            config: Arc::new(config),
            tokens,
            users,
            guard,
            corrector,
        }
    }
}
