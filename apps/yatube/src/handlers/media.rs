//! Uploaded media files.

use actix_web::{HttpResponse, web};

use yatube_core::error::DomainError;

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /media/{path}
pub async fn serve_media(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let name = path.into_inner();
    let bytes = state
        .media
        .open(&name)
        .await?
        .ok_or_else(|| DomainError::not_found("Media", &name))?;

    let mime = mime_guess::from_path(&name).first_or_octet_stream();
    Ok(HttpResponse::Ok()
        .content_type(mime.essence_str())
        .body(bytes))
}
