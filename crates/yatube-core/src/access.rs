//! Access-control gate for feed, create and edit actions.

/// The signed-in caller of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: i64,
    pub username: String,
}

impl Actor {
    pub fn new(user_id: i64, username: impl Into<String>) -> Self {
        Self {
            user_id,
            username: username.into(),
        }
    }
}

/// Something a caller wants to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ViewFeed,
    ViewPost,
    CreatePost,
    EditPost { author_id: i64 },
}

/// Outcome of an access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    /// Anonymous caller on a members-only action.
    LoginRequired,
    /// Signed-in caller who is not allowed to perform the action.
    Denied,
}

impl Access {
    pub fn is_granted(&self) -> bool {
        matches!(self, Access::Granted)
    }
}

/// Stateless per-request permission check.
pub struct Gate;

impl Gate {
    pub fn check(actor: Option<&Actor>, action: &Action) -> Access {
        match (action, actor) {
            (Action::ViewFeed | Action::ViewPost, _) => Access::Granted,
            (Action::CreatePost | Action::EditPost { .. }, None) => Access::LoginRequired,
            (Action::CreatePost, Some(_)) => Access::Granted,
            (Action::EditPost { author_id }, Some(actor)) if actor.user_id == *author_id => {
                Access::Granted
            }
            (Action::EditPost { .. }, Some(actor)) => {
                tracing::debug!(user = %actor.username, "Edit denied for non-author");
                Access::Denied
            }
        }
    }
}
