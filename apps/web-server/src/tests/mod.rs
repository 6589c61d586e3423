//! In-process HTTP tests against the in-memory store.

use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use tera::Value;

use yatube_core::domain::{Group, NewGroup, NewPost, NewUser, Post, PostFilter, User};
use yatube_core::ports::{GroupRepository, PostRepository, UserRepository};
use yatube_infra::auth::{Argon2PasswordService, JwtConfig, JwtTokenService, PasswordConfig};
use yatube_infra::memory::InMemoryStore;

use crate::config::SessionConfig;
use crate::state::{AppState, Repositories};
use crate::view::Page;

pub const PASSWORD: &str = "correct horse battery staple";

/// Builds the full application, middleware included, around a state.
macro_rules! init_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(crate::middleware::error::error_pages())
                .wrap(crate::observability::RequestIdMiddleware)
                .app_data(actix_web::web::Data::new($state))
                .configure(crate::handlers::configure_routes),
        )
        .await
    };
}
pub(crate) use init_app;

mod auth;
mod forms;

pub struct Fixture {
    pub store: InMemoryStore,
    pub state: AppState,
}

impl Fixture {
    pub fn new() -> Self {
        let store = InMemoryStore::new();
        let tokens = Arc::new(JwtTokenService::new(JwtConfig {
            secret: "test-secret".to_string(),
            ..JwtConfig::default()
        }));
        let passwords = Arc::new(
            Argon2PasswordService::with_config(PasswordConfig {
                memory_kib: 1024,
                iterations: 1,
                parallelism: 1,
            })
            .unwrap(),
        );
        let state = AppState::from_parts(
            Repositories::in_memory(&store),
            tokens,
            passwords,
            SessionConfig::default(),
            None,
        )
        .unwrap();

        Self { store, state }
    }

    pub async fn user(&self, username: &str) -> User {
        let hash = self.state.passwords.hash(PASSWORD).unwrap();
        self.store
            .users()
            .create(NewUser::new(username, format!("{username}@example.com"), hash))
            .await
            .unwrap()
    }

    pub async fn group(&self, slug: &str) -> Group {
        self.store
            .groups()
            .create(NewGroup::new(format!("Test group {slug}"), slug, "Test description"))
            .await
            .unwrap()
    }

    pub async fn post(&self, author: &User, group: Option<&Group>, text: &str) -> Post {
        self.store
            .posts()
            .create(NewPost::new(author.id, text, group.map(|g| g.id)))
            .await
            .unwrap()
    }

    pub async fn posts(&self, author: &User, group: Option<&Group>, n: usize) {
        for i in 0..n {
            self.post(author, group, &format!("Test post {i}")).await;
        }
    }

    pub async fn post_count(&self) -> u64 {
        self.store.posts().count(PostFilter::All).await.unwrap()
    }

    /// Newest post in the store.
    pub async fn latest_post(&self) -> Option<Post> {
        self.store
            .posts()
            .list(PostFilter::All, 0, 1)
            .await
            .unwrap()
            .pop()
    }

    /// Session cookie as issued by a successful login.
    pub fn login_cookie(&self, user: &User) -> Cookie<'static> {
        let token = self
            .state
            .tokens
            .generate_token(user.id, &user.username)
            .unwrap();
        Cookie::new(self.state.session.cookie_name.clone(), token)
    }
}

/// The page a response was rendered from.
pub fn rendered<B>(resp: &ServiceResponse<B>) -> Page {
    resp.response()
        .extensions()
        .get::<Page>()
        .cloned()
        .expect("response was not rendered from a template")
}

/// A context entry of the rendered page.
pub fn context<B>(resp: &ServiceResponse<B>, key: &str) -> Value {
    rendered(resp)
        .context
        .get(key)
        .cloned()
        .unwrap_or_else(|| panic!("`{key}` missing from context"))
}

/// Number of posts on the rendered page.
pub fn page_len<B>(resp: &ServiceResponse<B>) -> usize {
    rendered(resp).context.get("page_obj").expect("no page_obj")["object_list"]
        .as_array()
        .map(Vec::len)
        .unwrap_or_default()
}

pub fn location<B>(resp: &ServiceResponse<B>) -> &str {
    resp.headers()
        .get(actix_web::http::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}
