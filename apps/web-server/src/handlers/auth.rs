//! Login and logout pages.

use actix_web::{HttpResponse, web};

use yatube_shared::dto::{LoginFormData, NextQuery};

use crate::middleware::auth::{OptionalIdentity, removal_cookie, session_cookie};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;
use crate::templates;
use crate::urls;
use crate::view::{Page, View};

const INVALID_LOGIN: &str =
    "Please enter a correct username and password. Note that both fields may be case-sensitive.";

fn login_page(
    identity: &OptionalIdentity,
    error: Option<&str>,
    username: &str,
    next: Option<&str>,
) -> Page {
    Page::new(templates::LOGIN, identity.get())
        .with("error", &error)
        .with("username", username)
        .with("next", &next)
}

/// GET /auth/login/
pub async fn login_form(identity: OptionalIdentity, query: web::Query<NextQuery>) -> View {
    login_page(&identity, None, "", query.next.as_deref()).into()
}

/// POST /auth/login/
pub async fn login(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    body: web::Form<LoginFormData>,
) -> AppResult<HttpResponse> {
    let form = body.into_inner();
    let next = form.next.as_deref().filter(|n| !n.is_empty());

    let user = state.users.find_by_username(form.username.trim()).await?;
    let hash = user
        .as_ref()
        .map_or(&*state.login_decoy, |u| u.password_hash.as_str());
    let verified = state
        .passwords
        .verify(&form.password, hash)
        .map_err(|e| AppError::Internal(e.to_string()))?
        && user.is_some();

    let Some(user) = user.filter(|_| verified) else {
        tracing::info!(username = %form.username, "Rejected login");
        return login_page(&identity, Some(INVALID_LOGIN), &form.username, next).render(&state);
    };

    let token = state
        .tokens
        .generate_token(user.id, &user.username)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    let cookie = session_cookie(&state.session, token, state.tokens.expiration_seconds());
    tracing::info!(user_id = user.id, username = %user.username, "User logged in");

    let target = match next {
        Some(next) if urls::is_safe_redirect(next) => next.to_string(),
        _ => urls::index(),
    };
    let mut response = crate::view::found(&target);
    response
        .add_cookie(&cookie)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(response)
}

/// GET|POST /auth/logout/
pub async fn logout(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
) -> AppResult<HttpResponse> {
    if let Some(user) = identity.get() {
        tracing::info!(user_id = user.user_id, username = %user.username, "User logged out");
    }

    let mut response = Page::new(templates::LOGGED_OUT, None).render(&state)?;
    response
        .add_cookie(&removal_cookie(&state.session))
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(response)
}
