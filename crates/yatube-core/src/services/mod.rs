//! Application services built on top of the repository ports.

mod authoring;
mod feed;

pub use authoring::{AuthoringService, EditorOutcome};
pub use feed::{FeedService, GroupFeed, PostDetail, ProfileFeed};
