//! Domain entities - the core business objects.

mod group;
mod pagination;
mod post;
mod user;

pub use group::{Group, NewGroup, is_valid_slug};
pub use pagination::{PAGE_SIZE, Page, PageRequest, Paginator};
pub use post::{NewPost, Post, PostChanges, PostEntry, PostFilter};
pub use user::{NewUser, User};
