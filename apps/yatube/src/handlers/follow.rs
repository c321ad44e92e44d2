//! Author subscriptions.

use actix_web::{HttpRequest, HttpResponse, web};

use yatube_core::domain::{NewFollow, PostFilter, User};
use yatube_core::error::DomainError;
use yatube_core::pagination::PageRequest;

use super::{found, query_param};
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;
use crate::views::{self, FollowTemplate, Listing, Nav, profile_url};

/// GET /follow/ - posts of every author the viewer follows.
pub async fn follow_index(
    state: web::Data<AppState>,
    identity: Identity,
    req: HttpRequest,
) -> AppResult<HttpResponse> {
    let request = PageRequest::parse(
        query_param(&req, "page").as_deref(),
        state.settings.posts_per_page,
    );
    let page = state
        .posts
        .page(PostFilter::FollowedBy(identity.user_id), request)
        .await?;

    views::page(&FollowTemplate {
        nav: Nav::for_viewer(Some(&identity)),
        listing: Listing::new(page, state.media.as_ref()),
    })
}

async fn find_author(state: &AppState, username: &str) -> AppResult<User> {
    let author = state
        .users
        .find_by_username(username)
        .await?
        .ok_or_else(|| DomainError::not_found("User", username))?;
    Ok(author)
}

/// GET /profile/{username}/follow/
///
/// Repeated follows keep a single edge; following yourself does nothing.
pub async fn profile_follow(
    state: web::Data<AppState>,
    identity: Identity,
    username: web::Path<String>,
) -> AppResult<HttpResponse> {
    let author = find_author(&state, &username).await?;

    match NewFollow::new(identity.user_id, author.id) {
        Ok(edge) => {
            let created = state.follows.follow(edge).await?;
            tracing::debug!(user_id = identity.user_id, author_id = author.id, created, "Follow");
        }
        Err(e) => tracing::debug!(error = %e, user_id = identity.user_id, "Ignoring self-follow"),
    }

    Ok(found(profile_url(&author.username)))
}

/// GET /profile/{username}/unfollow/
pub async fn profile_unfollow(
    state: web::Data<AppState>,
    identity: Identity,
    username: web::Path<String>,
) -> AppResult<HttpResponse> {
    let author = find_author(&state, &username).await?;

    let removed = state.follows.unfollow(identity.user_id, author.id).await?;
    tracing::debug!(user_id = identity.user_id, author_id = author.id, removed, "Unfollow");

    Ok(found(profile_url(&author.username)))
}
