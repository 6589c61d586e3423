//! Read side: paginated feeds and post detail.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::{
    Group, PAGE_SIZE, Page, PageRequest, Paginator, Post, PostEntry, PostFilter, User,
};
use crate::error::DomainError;
use crate::ports::{GroupRepository, PostRepository, UserRepository};

/// Posts of one group.
#[derive(Debug, Clone)]
pub struct GroupFeed {
    pub group: Group,
    pub page: Page<PostEntry>,
}

/// Posts of one author.
#[derive(Debug, Clone)]
pub struct ProfileFeed {
    pub author: User,
    pub posts_count: u64,
    pub page: Page<PostEntry>,
}

/// A single post with its author's post count.
#[derive(Debug, Clone)]
pub struct PostDetail {
    pub post: PostEntry,
    pub posts_count: u64,
}

/// Builds the feeds shown on the index, group and profile pages.
#[derive(Clone)]
pub struct FeedService {
    users: Arc<dyn UserRepository>,
    groups: Arc<dyn GroupRepository>,
    posts: Arc<dyn PostRepository>,
}

impl FeedService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        groups: Arc<dyn GroupRepository>,
        posts: Arc<dyn PostRepository>,
    ) -> Self {
        Self {
            users,
            groups,
            posts,
        }
    }

    /// Every post, newest first.
    pub async fn index(&self, page: PageRequest) -> Result<Page<PostEntry>, DomainError> {
        self.paginate(PostFilter::All, page).await
    }

    pub async fn group(&self, slug: &str, page: PageRequest) -> Result<GroupFeed, DomainError> {
        let group = self
            .groups
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found("group", slug))?;

        let page = self.paginate(PostFilter::Group(group.id), page).await?;
        Ok(GroupFeed { group, page })
    }

    pub async fn profile(
        &self,
        username: &str,
        page: PageRequest,
    ) -> Result<ProfileFeed, DomainError> {
        let author = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found("user", username))?;

        let page = self.paginate(PostFilter::Author(author.id), page).await?;
        Ok(ProfileFeed {
            author,
            posts_count: page.count,
            page,
        })
    }

    pub async fn detail(&self, post_id: i64) -> Result<PostDetail, DomainError> {
        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_id))?;

        let posts_count = self.posts.count(PostFilter::Author(post.author_id)).await?;
        let post = self
            .hydrate(vec![post])
            .await?
            .pop()
            .ok_or_else(|| DomainError::Internal("post vanished while loading".to_string()))?;

        Ok(PostDetail { post, posts_count })
    }

    async fn paginate(
        &self,
        filter: PostFilter,
        request: PageRequest,
    ) -> Result<Page<PostEntry>, DomainError> {
        let total = self.posts.count(filter).await?;
        let paginator = Paginator::new(total, PAGE_SIZE);

        let posts = match paginator.window(request) {
            Some((offset, limit)) => self.posts.list(filter, offset, limit).await?,
            None => Vec::new(),
        };
        tracing::debug!(?filter, total, page = request.number(), "Loaded feed page");

        let entries = self.hydrate(posts).await?;
        Ok(paginator.page(request, entries))
    }

    /// Attach authors and groups, keeping the order of `posts`.
    async fn hydrate(&self, posts: Vec<Post>) -> Result<Vec<PostEntry>, DomainError> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let mut author_ids: Vec<i64> = posts.iter().map(|p| p.author_id).collect();
        author_ids.sort_unstable();
        author_ids.dedup();
        let mut group_ids: Vec<i64> = posts.iter().filter_map(|p| p.group_id).collect();
        group_ids.sort_unstable();
        group_ids.dedup();

        let authors: HashMap<i64, User> = self
            .users
            .find_many(author_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();
        let groups: HashMap<i64, Group> = if group_ids.is_empty() {
            HashMap::new()
        } else {
            self.groups
                .find_many(group_ids)
                .await?
                .into_iter()
                .map(|g| (g.id, g))
                .collect()
        };

        posts
            .into_iter()
            .map(|post| {
                let author = authors.get(&post.author_id).cloned().ok_or_else(|| {
                    DomainError::Internal(format!("author {} of post {} missing", post.author_id, post.id))
                })?;
                let group = post.group_id.and_then(|id| groups.get(&id).cloned());
                Ok(PostEntry::new(post, author, group))
            })
            .collect()
    }
}
