//! Rendering of handler results: template pages and redirects.

use actix_web::body::BoxBody;
use actix_web::http::header::{self, ContentType};
use actix_web::{HttpRequest, HttpResponse, Responder, ResponseError, web};
use serde::Serialize;
use tera::Context;

use crate::middleware::auth::Identity;
use crate::middleware::error::AppError;
use crate::state::AppState;

/// A template together with the context it was rendered with.
///
/// Kept in the response extensions after rendering, so middleware and tests
/// can see which page was produced from what.
#[derive(Debug, Clone)]
pub struct Page {
    pub template: &'static str,
    pub context: Context,
}

impl Page {
    pub fn new(template: &'static str, identity: Option<&Identity>) -> Self {
        let mut context = Context::new();
        context.insert("current_user", &identity.map(|i| i.username.as_str()));
        Self { template, context }
    }

    pub fn with<T: Serialize + ?Sized>(mut self, key: &str, value: &T) -> Self {
        self.context.insert(key, value);
        self
    }

    /// Render into a 200 HTML response.
    pub fn render(self, state: &AppState) -> Result<HttpResponse, AppError> {
        let html = state.templates.render(self.template, &self.context).map_err(|e| {
            AppError::Internal(format!("rendering {} failed: {e:?}", self.template))
        })?;

        let mut response = HttpResponse::Ok()
            .content_type(ContentType::html())
            .body(html);
        response.extensions_mut().insert(self);
        Ok(response)
    }
}

/// What a page handler produces.
#[derive(Debug)]
pub enum View {
    Page(Page),
    Redirect(String),
}

impl View {
    pub fn redirect(location: impl Into<String>) -> Self {
        View::Redirect(location.into())
    }
}

impl From<Page> for View {
    fn from(page: Page) -> Self {
        View::Page(page)
    }
}

/// 302 to `location`.
pub fn found(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

impl Responder for View {
    type Body = BoxBody;

    fn respond_to(self, req: &HttpRequest) -> HttpResponse<Self::Body> {
        match self {
            View::Redirect(location) => found(&location),
            View::Page(page) => {
                let Some(state) = req.app_data::<web::Data<AppState>>() else {
                    return AppError::Internal("AppState not registered".to_string())
                        .error_response();
                };
                page.render(state).unwrap_or_else(|e| e.error_response())
            }
        }
    }
}
