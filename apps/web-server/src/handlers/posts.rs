//! Feed, detail and editor pages.

use actix_web::{HttpRequest, web};

use yatube_core::PostFormInput;
use yatube_core::domain::PageRequest;
use yatube_core::services::EditorOutcome;
use yatube_shared::dto::{PageQuery, PostFormData};

use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::AppResult;
use crate::state::AppState;
use crate::templates;
use crate::urls;
use crate::view::{Page, View};

fn page_request(query: &PageQuery) -> PageRequest {
    PageRequest::parse(query.page.as_deref())
}

fn form_input(data: PostFormData) -> PostFormInput {
    PostFormInput {
        text: data.text,
        group: data.group,
    }
}

/// Where the editor goes next, given what the service decided.
fn editor_view(
    req: &HttpRequest,
    identity: &OptionalIdentity,
    outcome: EditorOutcome,
    edited: Option<i64>,
) -> View {
    match outcome {
        EditorOutcome::LoginRequired => View::redirect(urls::login(Some(req.path()))),
        EditorOutcome::Denied(post) => View::redirect(urls::post_detail(post.id)),
        EditorOutcome::Saved(post) => match edited {
            Some(_) => View::redirect(urls::post_detail(post.id)),
            None => match identity.get() {
                Some(author) => View::redirect(urls::profile(&author.username)),
                None => View::redirect(urls::index()),
            },
        },
        EditorOutcome::Form(form) => Page::new(templates::CREATE_POST, identity.get())
            .with("form", &form)
            .with("action", &edited.map_or_else(urls::post_create, urls::post_edit))
            .with("is_edit", &edited.is_some())
            .with("post_id", &edited)
            .into(),
    }
}

/// GET /
pub async fn index(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    query: web::Query<PageQuery>,
) -> AppResult<View> {
    let page = state.feed.index(page_request(&query)).await?;

    Ok(Page::new(templates::INDEX, identity.get())
        .with("page_obj", &page)
        .into())
}

/// GET /group/{slug}/
pub async fn group_list(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    slug: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<View> {
    let feed = state.feed.group(&slug, page_request(&query)).await?;

    Ok(Page::new(templates::GROUP_LIST, identity.get())
        .with("group", &feed.group)
        .with("page_obj", &feed.page)
        .into())
}

/// GET /profile/{username}/
pub async fn profile(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    username: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<View> {
    let feed = state.feed.profile(&username, page_request(&query)).await?;

    Ok(Page::new(templates::PROFILE, identity.get())
        .with("author", &feed.author)
        .with("posts_count", &feed.posts_count)
        .with("page_obj", &feed.page)
        .into())
}

/// GET /posts/{post_id}/
pub async fn post_detail(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    post_id: web::Path<i64>,
) -> AppResult<View> {
    let detail = state.feed.detail(post_id.into_inner()).await?;

    Ok(Page::new(templates::POST_DETAIL, identity.get())
        .with("user_post", &detail.post)
        .with("posts_count", &detail.posts_count)
        .into())
}

/// GET /create/
pub async fn post_create_form(
    req: HttpRequest,
    state: web::Data<AppState>,
    identity: OptionalIdentity,
) -> AppResult<View> {
    let outcome = state
        .authoring
        .create_form(identity.actor().as_ref())
        .await?;
    Ok(editor_view(&req, &identity, outcome, None))
}

/// POST /create/
pub async fn post_create(
    req: HttpRequest,
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    body: web::Form<PostFormData>,
) -> AppResult<View> {
    let outcome = state
        .authoring
        .create(identity.actor().as_ref(), form_input(body.into_inner()))
        .await?;
    Ok(editor_view(&req, &identity, outcome, None))
}

/// GET /posts/{post_id}/edit/
pub async fn post_edit_form(
    req: HttpRequest,
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    post_id: web::Path<i64>,
) -> AppResult<View> {
    let post_id = post_id.into_inner();
    let outcome = state
        .authoring
        .edit_form(identity.actor().as_ref(), post_id)
        .await?;
    Ok(editor_view(&req, &identity, outcome, Some(post_id)))
}

/// POST /posts/{post_id}/edit/
pub async fn post_edit(
    req: HttpRequest,
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    post_id: web::Path<i64>,
    body: web::Form<PostFormData>,
) -> AppResult<View> {
    let post_id = post_id.into_inner();
    let outcome = state
        .authoring
        .edit(identity.actor().as_ref(), post_id, form_input(body.into_inner()))
        .await?;
    Ok(editor_view(&req, &identity, outcome, Some(post_id)))
}
