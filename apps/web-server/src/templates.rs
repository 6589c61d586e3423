//! Tera templates, embedded into the binary at compile time.

use tera::Tera;

pub const INDEX: &str = "posts/index.html";
pub const GROUP_LIST: &str = "posts/group_list.html";
pub const PROFILE: &str = "posts/profile.html";
pub const POST_DETAIL: &str = "posts/post_detail.html";
pub const CREATE_POST: &str = "posts/create_post.html";
pub const LOGIN: &str = "users/login.html";
pub const LOGGED_OUT: &str = "users/logged_out.html";
pub const NOT_FOUND: &str = "core/404.html";
pub const SERVER_ERROR: &str = "core/500.html";

macro_rules! embedded {
    ($($name:literal),* $(,)?) => {
        vec![$(($name, include_str!(concat!("../templates/", $name)))),*]
    };
}

/// Build the template engine with every page registered.
pub fn load() -> Result<Tera, tera::Error> {
    let mut tera = Tera::default();
    tera.add_raw_templates(embedded![
        "base.html",
        "includes/header.html",
        "includes/paginator.html",
        "includes/post_card.html",
        "posts/index.html",
        "posts/group_list.html",
        "posts/profile.html",
        "posts/post_detail.html",
        "posts/create_post.html",
        "users/login.html",
        "users/logged_out.html",
        "core/404.html",
        "core/500.html",
    ])?;
    Ok(tera)
}
