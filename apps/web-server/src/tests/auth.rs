use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use actix_web::http::StatusCode;
use actix_web::test;

use yatube_core::ports::{AuthError, PasswordService};
use yatube_shared::dto::LoginFormData;

use super::{Fixture, PASSWORD, context, init_app, location, rendered};
use crate::templates;

fn credentials(username: &str, password: &str, next: Option<&str>) -> LoginFormData {
    LoginFormData {
        username: username.to_string(),
        password: password.to_string(),
        next: next.map(str::to_string),
    }
}

#[actix_web::test]
async fn test_login_page_keeps_next() {
    let fx = Fixture::new();
    let app = init_app!(fx.state.clone());

    let req = test::TestRequest::get()
        .uri("/auth/login/?next=%2Fcreate%2F")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(rendered(&resp).template, templates::LOGIN);
    assert_eq!(context(&resp, "next"), "/create/");
}

#[actix_web::test]
async fn test_login_sets_session_and_follows_next() {
    let fx = Fixture::new();
    let user = fx.user("auth").await;
    let app = init_app!(fx.state.clone());

    let req = test::TestRequest::post()
        .uri("/auth/login/")
        .set_form(credentials("auth", PASSWORD, Some("/create/")))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/create/");

    let cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == fx.state.session.cookie_name)
        .expect("session cookie");
    assert_eq!(cookie.http_only(), Some(true));
    let claims = fx.state.tokens.validate_token(cookie.value()).unwrap();
    assert_eq!(claims.user_id, user.id);
}

#[actix_web::test]
async fn test_login_ignores_offsite_next() {
    let fx = Fixture::new();
    fx.user("auth").await;
    let app = init_app!(fx.state.clone());

    let req = test::TestRequest::post()
        .uri("/auth/login/")
        .set_form(credentials("auth", PASSWORD, Some("https://evil.example/")))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/");
}

#[actix_web::test]
async fn test_wrong_password_redisplays_login() {
    let fx = Fixture::new();
    fx.user("auth").await;
    let app = init_app!(fx.state.clone());

    for (username, password) in [("auth", "wrong"), ("nobody", PASSWORD)] {
        let req = test::TestRequest::post()
            .uri("/auth/login/")
            .set_form(credentials(username, password, None))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(rendered(&resp).template, templates::LOGIN);
        assert!(context(&resp, "error").is_string());
        assert_eq!(context(&resp, "username"), username);
        assert_eq!(resp.response().cookies().count(), 0);
    }
}

#[actix_web::test]
async fn test_logout_clears_session() {
    let fx = Fixture::new();
    let user = fx.user("auth").await;
    let app = init_app!(fx.state.clone());

    let req = test::TestRequest::get()
        .uri("/auth/logout/")
        .cookie(fx.login_cookie(&user))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(rendered(&resp).template, templates::LOGGED_OUT);
    let cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == fx.state.session.cookie_name)
        .expect("removal cookie");
    assert_eq!(cookie.value(), "");
}

#[actix_web::test]
async fn test_tampered_session_is_a_guest() {
    let fx = Fixture::new();
    let app = init_app!(fx.state.clone());

    let req = test::TestRequest::get()
        .uri("/")
        .cookie(actix_web::cookie::Cookie::new(
            fx.state.session.cookie_name.clone(),
            "not-a-token",
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(context(&resp, "current_user").is_null());

    let req = test::TestRequest::get()
        .uri("/create/")
        .cookie(actix_web::cookie::Cookie::new(
            fx.state.session.cookie_name.clone(),
            "not-a-token",
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
}

#[actix_web::test]
async fn test_bearer_header_is_accepted() {
    let fx = Fixture::new();
    let user = fx.user("auth").await;
    let app = init_app!(fx.state.clone());
    let token = fx.state.tokens.generate_token(user.id, &user.username).unwrap();

    let req = test::TestRequest::get()
        .uri("/create/")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
}

/// Counts the hashes each login checks.
struct CountingPasswords {
    inner: Arc<dyn PasswordService>,
    verified: Arc<AtomicUsize>,
}

impl PasswordService for CountingPasswords {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        self.inner.hash(password)
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        self.verified.fetch_add(1, Ordering::SeqCst);
        self.inner.verify(password, hash)
    }
}

#[actix_web::test]
async fn test_unknown_username_costs_one_verification() {
    let fx = Fixture::new();
    fx.user("auth").await;
    let verified = Arc::new(AtomicUsize::new(0));
    let mut state = fx.state.clone();
    state.passwords = Arc::new(CountingPasswords {
        inner: fx.state.passwords.clone(),
        verified: verified.clone(),
    });
    let app = init_app!(state);

    for (username, password) in [("auth", "wrong"), ("nobody", PASSWORD), ("nobody", "wrong")] {
        let before = verified.load(Ordering::SeqCst);
        let req = test::TestRequest::post()
            .uri("/auth/login/")
            .set_form(credentials(username, password, None))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK, "{username}");
        assert_eq!(rendered(&resp).template, templates::LOGIN);
        assert_eq!(verified.load(Ordering::SeqCst) - before, 1, "{username}");
    }
}

#[actix_web::test]
async fn test_login_decoy_is_a_real_hash() {
    let fx = Fixture::new();
    assert_eq!(fx.state.passwords.verify(PASSWORD, &fx.state.login_decoy).unwrap(), false);
}
