//! HTML presentation: askama templates and the view models they render.

mod forms;
mod listing;
mod pages;

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use askama::Template;

use crate::middleware::auth::Identity;
use crate::middleware::error::AppError;

pub use forms::{FieldView, SelectOption};
pub use listing::{GroupLink, Listing, PageLink, PaginatorView, PostCard};
pub use pages::{
    CommentView, ErrorTemplate, FollowTemplate, GroupListTemplate, IndexTemplate,
    LoggedOutTemplate, LoginTemplate, PostDetailTemplate, PostFormTemplate, ProfileTemplate,
    SignupTemplate,
};

/// `/profile/<username>/`, the name percent-encoded as a single path segment.
pub fn profile_url(username: &str) -> String {
    let segment: String = url::form_urlencoded::byte_serialize(username.as_bytes()).collect();
    format!("/profile/{}/", segment)
}

/// Navigation bar state: who is looking at the page.
#[derive(Debug, Clone, Default)]
pub struct Nav {
    pub username: Option<String>,
    pub profile_url: Option<String>,
}

impl Nav {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn for_viewer(viewer: Option<&Identity>) -> Self {
        Self {
            username: viewer.map(|identity| identity.username.clone()),
            profile_url: viewer.map(|identity| profile_url(&identity.username)),
        }
    }
}

pub fn render<T: Template>(template: &T) -> Result<String, AppError> {
    template.render().map_err(|err| {
        tracing::error!(error = %err, "Template rendering failed");
        AppError::Internal("Template rendering failed".to_string())
    })
}

pub fn html(body: String) -> HttpResponse {
    html_with_status(StatusCode::OK, body)
}

pub fn html_with_status(status: StatusCode, body: String) -> HttpResponse {
    HttpResponse::build(status)
        .content_type(ContentType::html())
        .body(body)
}

/// Render a template straight into a `200 OK` page.
pub fn page<T: Template>(template: &T) -> Result<HttpResponse, AppError> {
    render(template).map(html)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_url_encodes_segment() {
        assert_eq!(profile_url("leo"), "/profile/leo/");
        assert_eq!(profile_url("a+b@c.d"), "/profile/a%2Bb%40c.d/");
        assert_eq!(profile_url("лев"), "/profile/%D0%BB%D0%B5%D0%B2/");
    }
}
