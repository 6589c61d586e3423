//! Data Transfer Objects - form bodies, query strings and JSON responses.

use serde::{Deserialize, Serialize};

/// Body of the create/edit post form.
///
/// Missing fields decode as empty strings so that an incomplete submission
/// reaches validation instead of failing to deserialize.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostFormData {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub group: String,
}

/// Body of the login form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginFormData {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub next: Option<String>,
}

/// `?page=` on feed pages. Kept as a string: junk falls back to page 1.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// `?next=` on the login page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

/// Response of the health endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub storage: String,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_form_missing_fields_default_to_empty() {
        let form: PostFormData = serde_urlencoded::from_str("group=").unwrap();
        assert_eq!(form.text, "");
        assert_eq!(form.group, "");
    }

    #[test]
    fn test_page_query_accepts_junk() {
        let query: PageQuery = serde_urlencoded::from_str("page=abc").unwrap();
        assert_eq!(query.page.as_deref(), Some("abc"));
    }

    #[test]
    fn test_health_response_shape() {
        let json = serde_json::to_value(HealthResponse {
            status: "ok".to_string(),
            version: "0.1.0".to_string(),
            storage: "memory".to_string(),
            timestamp: "2024-01-01T00:00:00Z".to_string(),
        })
        .unwrap();
        assert_eq!(json["storage"], "memory");
    }
}
