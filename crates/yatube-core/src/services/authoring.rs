//! Write side: creating and editing posts.

use std::sync::Arc;

use crate::access::{Access, Action, Actor, Gate};
use crate::domain::{NewPost, Post};
use crate::error::DomainError;
use crate::forms::{PostForm, PostFormInput};
use crate::ports::{GroupRepository, PostRepository};

/// What the create and edit pages should do next.
#[derive(Debug)]
pub enum EditorOutcome {
    /// Show the form: fresh, pre-filled, or carrying validation errors.
    Form(PostForm),
    /// The post was stored.
    Saved(Post),
    /// Anonymous caller; nothing was read or written.
    LoginRequired,
    /// Signed-in caller who does not own the post.
    Denied(Post),
}

#[derive(Clone)]
pub struct AuthoringService {
    groups: Arc<dyn GroupRepository>,
    posts: Arc<dyn PostRepository>,
}

impl AuthoringService {
    pub fn new(groups: Arc<dyn GroupRepository>, posts: Arc<dyn PostRepository>) -> Self {
        Self { groups, posts }
    }

    pub async fn create_form(&self, actor: Option<&Actor>) -> Result<EditorOutcome, DomainError> {
        if !Gate::check(actor, &Action::CreatePost).is_granted() {
            return Ok(EditorOutcome::LoginRequired);
        }

        let groups = self.groups.list().await?;
        Ok(EditorOutcome::Form(PostForm::blank(&groups)))
    }

    pub async fn create(
        &self,
        actor: Option<&Actor>,
        input: PostFormInput,
    ) -> Result<EditorOutcome, DomainError> {
        let actor = match actor {
            Some(actor) if Gate::check(Some(actor), &Action::CreatePost).is_granted() => actor,
            _ => return Ok(EditorOutcome::LoginRequired),
        };

        let groups = self.groups.list().await?;
        let form = PostForm::bind(input, &groups);
        let Some(changes) = form.cleaned().cloned() else {
            return Ok(EditorOutcome::Form(form));
        };

        let post = self
            .posts
            .create(NewPost::new(actor.user_id, changes.text, changes.group_id))
            .await?;
        tracing::info!(post_id = post.id, author = %actor.username, "Post created");

        Ok(EditorOutcome::Saved(post))
    }

    pub async fn edit_form(
        &self,
        actor: Option<&Actor>,
        post_id: i64,
    ) -> Result<EditorOutcome, DomainError> {
        let post = match self.authorize_edit(actor, post_id).await? {
            Ok(post) => post,
            Err(outcome) => return Ok(outcome),
        };

        let groups = self.groups.list().await?;
        Ok(EditorOutcome::Form(PostForm::for_post(&post, &groups)))
    }

    pub async fn edit(
        &self,
        actor: Option<&Actor>,
        post_id: i64,
        input: PostFormInput,
    ) -> Result<EditorOutcome, DomainError> {
        let post = match self.authorize_edit(actor, post_id).await? {
            Ok(post) => post,
            Err(outcome) => return Ok(outcome),
        };

        let groups = self.groups.list().await?;
        let form = PostForm::bind(input, &groups);
        let Some(changes) = form.cleaned().cloned() else {
            return Ok(EditorOutcome::Form(form));
        };

        let post = self.posts.update(post.id, changes).await?;
        tracing::info!(post_id = post.id, "Post edited");

        Ok(EditorOutcome::Saved(post))
    }

    /// Login is checked before the post is loaded, authorship after.
    async fn authorize_edit(
        &self,
        actor: Option<&Actor>,
        post_id: i64,
    ) -> Result<Result<Post, EditorOutcome>, DomainError> {
        if actor.is_none() {
            return Ok(Err(EditorOutcome::LoginRequired));
        }

        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_id))?;

        let action = Action::EditPost {
            author_id: post.author_id,
        };
        Ok(match Gate::check(actor, &action) {
            Access::Granted => Ok(post),
            Access::LoginRequired => Err(EditorOutcome::LoginRequired),
            Access::Denied => Err(EditorOutcome::Denied(post)),
        })
    }
}
