use actix_web::http::StatusCode;
use actix_web::test;

use yatube_core::forms::{INVALID_CHOICE_MESSAGE, REQUIRED_MESSAGE};
use yatube_core::ports::BaseRepository;
use yatube_shared::dto::PostFormData;

use super::{Fixture, context, init_app, location};

fn form(text: &str, group: &str) -> PostFormData {
    PostFormData {
        text: text.to_string(),
        group: group.to_string(),
    }
}

#[actix_web::test]
async fn test_create_post_redirects_to_profile() {
    let fx = Fixture::new();
    let user = fx.user("mob2556").await;
    let group = fx.group("test_slug").await;
    let app = init_app!(fx.state.clone());
    let before = fx.post_count().await;

    let req = test::TestRequest::post()
        .uri("/create/")
        .cookie(fx.login_cookie(&user))
        .set_form(form("Form data", &group.id.to_string()))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/profile/mob2556/");
    assert_eq!(fx.post_count().await, before + 1);

    let post = fx.latest_post().await.unwrap();
    assert_eq!(post.text, "Form data");
    assert_eq!(post.author_id, user.id);
    assert_eq!(post.group_id, Some(group.id));
}

#[actix_web::test]
async fn test_create_post_without_group() {
    let fx = Fixture::new();
    let user = fx.user("auth").await;
    let app = init_app!(fx.state.clone());

    let req = test::TestRequest::post()
        .uri("/create/")
        .cookie(fx.login_cookie(&user))
        .set_form(form("No group", ""))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(fx.latest_post().await.unwrap().group_id, None);
}

#[actix_web::test]
async fn test_guest_cannot_create_post() {
    let fx = Fixture::new();
    let app = init_app!(fx.state.clone());

    let req = test::TestRequest::post()
        .uri("/create/")
        .set_form(form("Guest post", ""))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/auth/login/?next=%2Fcreate%2F");
    assert_eq!(fx.post_count().await, 0);
}

#[actix_web::test]
async fn test_blank_text_redisplays_form() {
    let fx = Fixture::new();
    let user = fx.user("auth").await;
    let app = init_app!(fx.state.clone());

    let req = test::TestRequest::post()
        .uri("/create/")
        .cookie(fx.login_cookie(&user))
        .set_form(form("   ", ""))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let errors = &context(&resp, "form")["fields"]["text"]["errors"];
    assert_eq!(errors[0], REQUIRED_MESSAGE);
    assert_eq!(fx.post_count().await, 0);
}

#[actix_web::test]
async fn test_unknown_group_redisplays_form() {
    let fx = Fixture::new();
    let user = fx.user("auth").await;
    let app = init_app!(fx.state.clone());

    let req = test::TestRequest::post()
        .uri("/create/")
        .cookie(fx.login_cookie(&user))
        .set_form(form("Text", "999"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let errors = &context(&resp, "form")["fields"]["group"]["errors"];
    assert_eq!(errors[0], INVALID_CHOICE_MESSAGE);
    assert_eq!(fx.post_count().await, 0);
}

#[actix_web::test]
async fn test_author_edits_post() {
    let fx = Fixture::new();
    let author = fx.user("auth").await;
    let group = fx.group("test_slug").await;
    let post = fx.post(&author, Some(&group), "text").await;
    let app = init_app!(fx.state.clone());

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/edit/", post.id))
        .cookie(fx.login_cookie(&author))
        .set_form(form("Changed text", ""))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/posts/{}/", post.id));
    assert_eq!(fx.post_count().await, 1);

    let stored = fx.store.posts().find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.text, "Changed text");
    assert_eq!(stored.group_id, None);
    assert_eq!(stored.author_id, author.id);
    assert_eq!(stored.pub_date, post.pub_date);
}

#[actix_web::test]
async fn test_non_author_edit_changes_nothing() {
    let fx = Fixture::new();
    let author = fx.user("auth").await;
    let stranger = fx.user("mob2556").await;
    let post = fx.post(&author, None, "text").await;
    let app = init_app!(fx.state.clone());

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/edit/", post.id))
        .cookie(fx.login_cookie(&stranger))
        .set_form(form("hijacked", ""))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/posts/{}/", post.id));

    let stored = fx.store.posts().find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored, post);
}

#[actix_web::test]
async fn test_invalid_edit_redisplays_form_and_keeps_post() {
    let fx = Fixture::new();
    let author = fx.user("auth").await;
    let group = fx.group("test_slug").await;
    let post = fx.post(&author, Some(&group), "text").await;
    let app = init_app!(fx.state.clone());

    for (data, field, message) in [
        (form("", &group.id.to_string()), "text", REQUIRED_MESSAGE),
        (form("Changed text", "999"), "group", INVALID_CHOICE_MESSAGE),
    ] {
        let req = test::TestRequest::post()
            .uri(&format!("/posts/{}/edit/", post.id))
            .cookie(fx.login_cookie(&author))
            .set_form(data)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK, "{field}");
        assert_eq!(context(&resp, "is_edit"), true);
        assert_eq!(context(&resp, "post_id"), post.id);
        let fields = &context(&resp, "form")["fields"];
        assert_eq!(fields[field]["errors"][0], message);

        let stored = fx.store.posts().find_by_id(post.id).await.unwrap().unwrap();
        assert_eq!(stored, post);
    }
}
