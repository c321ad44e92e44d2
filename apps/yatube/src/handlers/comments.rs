//! Comment submission.

use actix_web::{HttpResponse, web};

use yatube_core::domain::{NewComment, Post};
use yatube_core::error::DomainError;
use yatube_core::forms::CommentForm;
use yatube_core::ports::BaseRepository;
use yatube_shared::dto::CommentFormData;

use super::{found, parse_id};
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /posts/{post_id}/comment/
///
/// Valid or not, the submission ends on the post page; an empty comment is
/// simply not stored.
pub async fn add_comment(
    state: web::Data<AppState>,
    identity: Identity,
    post_id: web::Path<String>,
    body: web::Form<CommentFormData>,
) -> AppResult<HttpResponse> {
    let post_id = parse_id(&post_id)?;
    let post: Post = state
        .posts
        .find_by_id(post_id)
        .await?
        .ok_or_else(|| DomainError::not_found("Post", post_id))?;

    match CommentForm::new(body.into_inner().text).clean() {
        Ok(text) => {
            let comment = state
                .comments
                .create(NewComment {
                    post_id: post.id,
                    author_id: identity.user_id,
                    text,
                })
                .await?;
            tracing::info!(comment_id = comment.id, post_id, "Comment added");
        }
        Err(errors) => {
            tracing::debug!(?errors, post_id, "Rejected empty comment");
        }
    }

    Ok(found(format!("/posts/{}/", post_id)))
}
