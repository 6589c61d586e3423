//! Application state - shared across all handlers.

use std::sync::Arc;

use tera::Tera;
use uuid::Uuid;

use yatube_core::ports::{
    GroupRepository, PasswordService, PostRepository, TokenService, UserRepository,
};
use yatube_core::services::{AuthoringService, FeedService};
use yatube_infra::auth::{Argon2PasswordService, JwtTokenService};
use yatube_infra::database::DatabaseConnections;
use yatube_infra::memory::InMemoryStore;

#[cfg(feature = "postgres")]
use yatube_infra::database::{
    PostgresGroupRepository, PostgresPostRepository, PostgresUserRepository,
};

use crate::config::{AppConfig, SessionConfig};
use crate::templates;

/// The three repositories, from whichever backend is active.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub backend: &'static str,
}

impl Repositories {
    pub fn in_memory(store: &InMemoryStore) -> Self {
        Self {
            users: Arc::new(store.users()),
            groups: Arc::new(store.groups()),
            posts: Arc::new(store.posts()),
            backend: "memory",
        }
    }

    #[cfg(feature = "postgres")]
    pub fn postgres(db: &DatabaseConnections) -> Self {
        Self {
            users: Arc::new(PostgresUserRepository::new(db.main.clone())),
            groups: Arc::new(PostgresGroupRepository::new(db.main.clone())),
            posts: Arc::new(PostgresPostRepository::new(db.main.clone())),
            backend: "postgres",
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub feed: FeedService,
    pub authoring: AuthoringService,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    pub templates: Arc<Tera>,
    /// Hash checked when a login names an unknown user, so both failures
    /// cost one Argon2 verification.
    pub login_decoy: Arc<str>,
    pub session: SessionConfig,
    pub storage: &'static str,
    pub db: Option<Arc<DatabaseConnections>>,
}

impl AppState {
    /// Assemble the state from already-built parts.
    pub fn from_parts(
        repos: Repositories,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
        session: SessionConfig,
        db: Option<Arc<DatabaseConnections>>,
    ) -> anyhow::Result<Self> {
        let templates = Arc::new(templates::load()?);
        let login_decoy = Arc::from(passwords.hash(&Uuid::new_v4().to_string())?);

        Ok(Self {
            feed: FeedService::new(repos.users.clone(), repos.groups.clone(), repos.posts.clone()),
            authoring: AuthoringService::new(repos.groups, repos.posts),
            users: repos.users,
            tokens,
            passwords,
            templates,
            login_decoy,
            session,
            storage: repos.backend,
            db,
        })
    }

    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let (db, repos) = Self::connect(config).await;

        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));
        let passwords: Arc<dyn PasswordService> =
            Arc::new(Argon2PasswordService::with_config(config.password)?);

        let state = Self::from_parts(repos, tokens, passwords, config.session.clone(), db)?;
        tracing::info!(storage = state.storage, "Application state initialized");
        Ok(state)
    }

    #[cfg(feature = "postgres")]
    async fn connect(config: &AppConfig) -> (Option<Arc<DatabaseConnections>>, Repositories) {
        let Some(db_config) = &config.database else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return (None, Repositories::in_memory(&InMemoryStore::new()));
        };

        match DatabaseConnections::init(db_config).await {
            Ok(connections) => {
                let repos = Repositories::postgres(&connections);
                (Some(Arc::new(connections)), repos)
            }
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                (None, Repositories::in_memory(&InMemoryStore::new()))
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn connect(_config: &AppConfig) -> (Option<Arc<DatabaseConnections>>, Repositories) {
        tracing::info!("Running without postgres feature - using in-memory repositories");
        (None, Repositories::in_memory(&InMemoryStore::new()))
    }
}
