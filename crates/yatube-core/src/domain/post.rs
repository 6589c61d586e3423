use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Group, User};

/// Post entity - a single entry written by one author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author_id: i64,
    pub group_id: Option<i64>,
}

/// A post that has not been stored yet.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub text: String,
    pub author_id: i64,
    pub group_id: Option<i64>,
    pub pub_date: DateTime<Utc>,
}

impl NewPost {
    /// Create a new post stamped with the current time.
    pub fn new(author_id: i64, text: impl Into<String>, group_id: Option<i64>) -> Self {
        Self {
            text: text.into(),
            author_id,
            group_id,
            pub_date: Utc::now(),
        }
    }
}

/// Editable part of a post. Author and publication date are fixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostChanges {
    pub text: String,
    pub group_id: Option<i64>,
}

/// A post joined with its author and group, as shown on pages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostEntry {
    pub id: i64,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author: User,
    pub group: Option<Group>,
}

impl PostEntry {
    pub fn new(post: Post, author: User, group: Option<Group>) -> Self {
        Self {
            id: post.id,
            text: post.text,
            pub_date: post.pub_date,
            author,
            group,
        }
    }
}

/// Which posts a listing covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostFilter {
    All,
    Group(i64),
    Author(i64),
}

impl PostFilter {
    pub fn matches(&self, post: &Post) -> bool {
        match *self {
            PostFilter::All => true,
            PostFilter::Group(id) => post.group_id == Some(id),
            PostFilter::Author(id) => post.author_id == id,
        }
    }
}
