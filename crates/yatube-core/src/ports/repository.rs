use async_trait::async_trait;

use crate::domain::{
    Group, NewGroup, NewPost, NewUser, Post, PostChanges, PostFilter, User,
};
use crate::error::RepoError;

/// Lookups shared by every repository.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Fetch every entity whose ID is in `ids`, in no particular order.
    async fn find_many(&self, ids: Vec<ID>) -> Result<Vec<T>, RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, i64> {
    /// Find a user by their username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// Store a new user. Fails with `RepoError::Constraint` on a taken username.
    async fn create(&self, user: NewUser) -> Result<User, RepoError>;
}

/// Group repository.
#[async_trait]
pub trait GroupRepository: BaseRepository<Group, i64> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError>;

    /// All groups ordered by title.
    async fn list(&self) -> Result<Vec<Group>, RepoError>;

    async fn create(&self, group: NewGroup) -> Result<Group, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, i64> {
    /// Number of posts matching `filter`.
    async fn count(&self, filter: PostFilter) -> Result<u64, RepoError>;

    /// Posts matching `filter`, newest first, skipping `offset` and taking at
    /// most `limit`.
    async fn list(
        &self,
        filter: PostFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError>;

    async fn create(&self, post: NewPost) -> Result<Post, RepoError>;

    /// Overwrite the editable fields of an existing post.
    async fn update(&self, id: i64, changes: PostChanges) -> Result<Post, RepoError>;
}
