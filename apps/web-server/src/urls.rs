//! URL reversing for every named route.

pub fn index() -> String {
    "/".to_string()
}

pub fn group_list(slug: &str) -> String {
    format!("/group/{slug}/")
}

pub fn profile(username: &str) -> String {
    format!("/profile/{username}/")
}

pub fn post_detail(post_id: i64) -> String {
    format!("/posts/{post_id}/")
}

pub fn post_create() -> String {
    "/create/".to_string()
}

pub fn post_edit(post_id: i64) -> String {
    format!("/posts/{post_id}/edit/")
}

/// Login page, remembering where to go afterwards.
pub fn login(next: Option<&str>) -> String {
    match next.and_then(|n| serde_urlencoded::to_string([("next", n)]).ok()) {
        Some(query) => format!("/auth/login/?{query}"),
        None => "/auth/login/".to_string(),
    }
}

/// Only same-site paths are accepted as post-login targets.
pub fn is_safe_redirect(target: &str) -> bool {
    target.starts_with('/') && !target.starts_with("//") && !target.contains('\\')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse() {
        assert_eq!(index(), "/");
        assert_eq!(group_list("group-slug"), "/group/group-slug/");
        assert_eq!(profile("Artem1993"), "/profile/Artem1993/");
        assert_eq!(post_detail(3), "/posts/3/");
        assert_eq!(post_create(), "/create/");
        assert_eq!(post_edit(3), "/posts/3/edit/");
    }

    #[test]
    fn test_login_encodes_next() {
        assert_eq!(login(None), "/auth/login/");
        assert_eq!(login(Some("/create/")), "/auth/login/?next=%2Fcreate%2F");
    }

    #[test]
    fn test_safe_redirects() {
        assert!(is_safe_redirect("/create/"));
        assert!(is_safe_redirect("/posts/1/edit/"));
        assert!(!is_safe_redirect("https://evil.example/"));
        assert!(!is_safe_redirect("//evil.example/"));
        assert!(!is_safe_redirect("/\\evil.example"));
        assert!(!is_safe_redirect(""));
    }
}
