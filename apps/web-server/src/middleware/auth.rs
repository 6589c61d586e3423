//! Session identity extraction.

use actix_web::cookie::{Cookie, SameSite, time::Duration};
use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use std::future::{Ready, ready};

use yatube_core::Actor;
use yatube_core::ports::{AuthError, TokenClaims};

use crate::config::SessionConfig;
use crate::state::AppState;

/// Signed-in user, decoded from the session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i64,
    pub username: String,
}

impl Identity {
    pub fn actor(&self) -> Actor {
        Actor::new(self.user_id, self.username.clone())
    }
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username,
        }
    }
}

/// Session token from the login cookie, or from a `Bearer` header.
fn session_token(req: &HttpRequest, cookie_name: &str) -> Option<String> {
    if let Some(cookie) = req.cookie(cookie_name) {
        return Some(cookie.value().to_string());
    }

    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
}

fn resolve(req: &HttpRequest) -> Result<Option<Identity>, AuthError> {
    let Some(state) = req.app_data::<web::Data<AppState>>() else {
        tracing::error!("AppState not found in app data");
        return Err(AuthError::InvalidToken(
            "Server configuration error".to_string(),
        ));
    };

    let Some(token) = session_token(req, &state.session.cookie_name) else {
        return Ok(None);
    };

    state
        .tokens
        .validate_token(&token)
        .map(|claims| Some(Identity::from(claims)))
}

/// Caller identity; `None` for guests.
///
/// A missing, expired or tampered token is treated as a guest rather than an
/// error, so public pages keep working with a stale cookie.
#[derive(Debug, Clone)]
pub struct OptionalIdentity(pub Option<Identity>);

impl OptionalIdentity {
    pub fn get(&self) -> Option<&Identity> {
        self.0.as_ref()
    }

    pub fn actor(&self) -> Option<Actor> {
        self.0.as_ref().map(Identity::actor)
    }
}

impl FromRequest for OptionalIdentity {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match resolve(req) {
            Ok(identity) => ready(Ok(OptionalIdentity(identity))),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring invalid session token");
                ready(Ok(OptionalIdentity(None)))
            }
        }
    }
}

/// Cookie carrying a freshly issued session token.
pub fn session_cookie(config: &SessionConfig, token: String, max_age_secs: i64) -> Cookie<'static> {
    Cookie::build(config.cookie_name.clone(), token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.secure)
        .max_age(Duration::seconds(max_age_secs))
        .finish()
}

/// Cookie that makes the browser drop the session.
pub fn removal_cookie(config: &SessionConfig) -> Cookie<'static> {
    let mut cookie = Cookie::build(config.cookie_name.clone(), "")
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.secure)
        .finish();
    cookie.make_removal();
    cookie
}
