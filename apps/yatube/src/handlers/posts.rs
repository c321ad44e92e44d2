//! Post listings, detail page, and the create/edit forms.

use actix_multipart::Multipart;
use actix_web::http::header::{self, ContentDisposition};
use actix_web::{Either, HttpRequest, HttpResponse, web};
use futures::StreamExt;

use yatube_core::domain::{Group, NewPost, PostChanges, PostFilter};
use yatube_core::error::DomainError;
use yatube_core::forms::{CommentForm, FormErrors, ImageUpload, PostForm};
use yatube_core::pagination::PageRequest;
use yatube_shared::dto::PostFormData;

use super::{found, parse_id, query_param};
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;
use crate::views::{
    self, CommentView, FieldView, GroupListTemplate, IndexTemplate, Listing, Nav,
    PostDetailTemplate, PostCard, PostFormTemplate, ProfileTemplate, profile_url,
};

/// Cache key of a rendered index page.
///
/// The navigation bar differs per viewer, so the viewer is part of the key.
/// The page part is the parsed request, so junk `?page=` values share a key.
pub fn index_cache_key(viewer: Option<i32>, request: &PageRequest) -> String {
    let viewer = viewer.map_or_else(|| "anon".to_string(), |id| id.to_string());
    format!("index_page:{}:{}", viewer, request.label())
}

/// GET /
///
/// Rendered pages are cached for `INDEX_CACHE_SECONDS`; new posts show up
/// once the entry expires or the cache is cleared.
pub async fn index(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    req: HttpRequest,
) -> AppResult<HttpResponse> {
    let request = PageRequest::parse(
        query_param(&req, "page").as_deref(),
        state.settings.posts_per_page,
    );
    let key = index_cache_key(viewer.user_id(), &request);

    if let Some(body) = state.cache.get(&key).await {
        tracing::debug!(key = %key, "Index page served from cache");
        return Ok(views::html(body));
    }

    let page = state.posts.page(PostFilter::All, request).await?;

    let body = views::render(&IndexTemplate {
        nav: Nav::for_viewer(viewer.identity()),
        listing: Listing::new(page, state.media.as_ref()),
    })?;

    if let Err(e) = state
        .cache
        .set(&key, &body, Some(state.settings.index_cache_ttl))
        .await
    {
        tracing::warn!(key = %key, error = %e, "Failed to cache index page");
    }

    Ok(views::html(body))
}

/// GET /group/{slug}/
pub async fn group_posts(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    slug: web::Path<String>,
    req: HttpRequest,
) -> AppResult<HttpResponse> {
    let group = state
        .groups
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| DomainError::not_found("Group", slug.as_str()))?;

    let request = PageRequest::parse(
        query_param(&req, "page").as_deref(),
        state.settings.posts_per_page,
    );
    let page = state.posts.page(PostFilter::Group(group.id), request).await?;

    views::page(&GroupListTemplate {
        nav: Nav::for_viewer(viewer.identity()),
        group,
        listing: Listing::new(page, state.media.as_ref()),
    })
}

/// GET /profile/{username}/
pub async fn profile(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    username: web::Path<String>,
    req: HttpRequest,
) -> AppResult<HttpResponse> {
    let author = state
        .users
        .find_by_username(&username)
        .await?
        .ok_or_else(|| DomainError::not_found("User", username.as_str()))?;

    let request = PageRequest::parse(
        query_param(&req, "page").as_deref(),
        state.settings.posts_per_page,
    );
    let page = state.posts.page(PostFilter::Author(author.id), request).await?;

    let (following, show_follow) = match viewer.user_id() {
        Some(user_id) if user_id != author.id => {
            (state.follows.is_following(user_id, author.id).await?, true)
        }
        _ => (false, false),
    };

    views::page(&ProfileTemplate {
        nav: Nav::for_viewer(viewer.identity()),
        posts_count: page.total_items(),
        profile_url: profile_url(&author.username),
        author: author.into(),
        following,
        show_follow,
        listing: Listing::new(page, state.media.as_ref()),
    })
}

/// GET /posts/{post_id}/
pub async fn post_detail(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    post_id: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post_id = parse_id(&post_id)?;
    let entry = state
        .posts
        .find_entry(post_id)
        .await?
        .ok_or_else(|| DomainError::not_found("Post", post_id))?;

    let posts_count = state
        .posts
        .count(PostFilter::Author(entry.author.id))
        .await?;
    let comments = state.comments.list_for_post(post_id).await?;

    views::page(&PostDetailTemplate {
        nav: Nav::for_viewer(viewer.identity()),
        title: entry.post.summary(),
        can_edit: viewer.user_id() == Some(entry.author.id),
        posts_count,
        post: PostCard::new(entry, state.media.as_ref()),
        comments: comments.into_iter().map(CommentView::from).collect(),
        comment_fields: vec![FieldView::new(CommentForm::TEXT, "textarea", "")],
        comment_action: format!("/posts/{}/comment/", post_id),
    })
}

/// GET /create/
pub async fn create_form(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let groups = state.groups.list().await?;
    render_post_form(
        &identity,
        None,
        &PostForm::default(),
        &groups,
        &FormErrors::new(),
        None,
    )
}

/// POST /create/
pub async fn create_submit(
    state: web::Data<AppState>,
    identity: Identity,
    body: Either<web::Form<PostFormData>, Multipart>,
) -> AppResult<HttpResponse> {
    let form = read_post_form(body, state.settings.max_upload_bytes).await?;
    let groups = state.groups.list().await?;

    let cleaned = match form.clean(&groups) {
        Ok(cleaned) => cleaned,
        Err(errors) => return render_post_form(&identity, None, &form, &groups, &errors, None),
    };

    let mut draft = NewPost::new(identity.user_id, cleaned.text.clone());
    if let Some(group_id) = cleaned.group_id {
        draft = draft.in_group(group_id);
    }
    if let Some(upload) = &cleaned.image {
        draft = draft.with_image(state.media.save(upload).await?);
    }

    let post = state.posts.create(draft).await?;
    tracing::info!(post_id = post.id, author = %identity.username, "Post published");

    Ok(found(profile_url(&identity.username)))
}

/// GET /posts/{post_id}/edit/
pub async fn edit_form(
    state: web::Data<AppState>,
    identity: Identity,
    post_id: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post_id = parse_id(&post_id)?;
    let entry = state
        .posts
        .find_entry(post_id)
        .await?
        .ok_or_else(|| DomainError::not_found("Post", post_id))?;

    if !entry.post.is_authored_by(identity.user_id) {
        return Ok(found(format!("/posts/{}/", post_id)));
    }

    let groups = state.groups.list().await?;
    let current_image = entry.post.image.as_deref().map(|name| state.media.url(name));
    render_post_form(
        &identity,
        Some(post_id),
        &PostForm::from_entry(&entry),
        &groups,
        &FormErrors::new(),
        current_image,
    )
}

/// POST /posts/{post_id}/edit/
///
/// Only the author may edit; anyone else is sent back to the post untouched.
pub async fn edit_submit(
    state: web::Data<AppState>,
    identity: Identity,
    post_id: web::Path<String>,
    body: Either<web::Form<PostFormData>, Multipart>,
) -> AppResult<HttpResponse> {
    let post_id = parse_id(&post_id)?;
    let entry = state
        .posts
        .find_entry(post_id)
        .await?
        .ok_or_else(|| DomainError::not_found("Post", post_id))?;

    if !entry.post.is_authored_by(identity.user_id) {
        tracing::warn!(post_id, user_id = identity.user_id, "Edit attempt by non-author");
        return Ok(found(format!("/posts/{}/", post_id)));
    }

    let form = read_post_form(body, state.settings.max_upload_bytes).await?;
    let groups = state.groups.list().await?;

    let cleaned = match form.clean(&groups) {
        Ok(cleaned) => cleaned,
        Err(errors) => {
            let current_image = entry.post.image.as_deref().map(|name| state.media.url(name));
            return render_post_form(
                &identity,
                Some(post_id),
                &form,
                &groups,
                &errors,
                current_image,
            );
        }
    };

    let uploaded = match &cleaned.image {
        Some(upload) => Some(state.media.save(upload).await?),
        None => None,
    };

    state
        .posts
        .update(
            post_id,
            PostChanges {
                image: cleaned.resolve_image(entry.post.image.clone(), uploaded),
                text: cleaned.text,
                group_id: cleaned.group_id,
            },
        )
        .await?;

    Ok(found(format!("/posts/{}/", post_id)))
}

fn render_post_form(
    identity: &Identity,
    post_id: Option<i32>,
    form: &PostForm,
    groups: &[Group],
    errors: &FormErrors,
    current_image: Option<String>,
) -> AppResult<HttpResponse> {
    let fields = vec![
        FieldView::new(PostForm::TEXT, "textarea", form.text.clone()).with_errors(errors),
        FieldView::group_select(PostForm::GROUP, groups, &form.group).with_errors(errors),
        FieldView::new(PostForm::IMAGE, "file", "").with_errors(errors),
    ];

    let action = match post_id {
        Some(id) => format!("/posts/{}/edit/", id),
        None => "/create/".to_string(),
    };

    views::page(&PostFormTemplate {
        nav: Nav::for_viewer(Some(identity)),
        is_edit: post_id.is_some(),
        action,
        fields,
        current_image,
    })
}

/// Bind a post submission, urlencoded or multipart (needed for uploads).
async fn read_post_form(
    body: Either<web::Form<PostFormData>, Multipart>,
    limit: usize,
) -> AppResult<PostForm> {
    match body {
        Either::Left(data) => {
            let clear_image = data.clear_image();
            let data = data.into_inner();
            Ok(PostForm {
                text: data.text,
                group: data.group,
                image: None,
                clear_image,
            })
        }
        Either::Right(multipart) => read_multipart(multipart, limit).await,
    }
}

async fn read_multipart(mut multipart: Multipart, limit: usize) -> AppResult<PostForm> {
    let mut form = PostForm::default();
    let mut total_bytes: usize = 0;

    while let Some(field) = multipart.next().await {
        let mut field =
            field.map_err(|e| AppError::BadRequest(format!("Multipart error: {}", e)))?;

        let disposition = field
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|value| ContentDisposition::from_raw(value).ok());
        let name = disposition
            .as_ref()
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();
        let filename = disposition
            .as_ref()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk =
                chunk.map_err(|e| AppError::BadRequest(format!("Multipart error: {}", e)))?;
            total_bytes += chunk.len();
            if total_bytes > limit {
                return Err(AppError::PayloadTooLarge);
            }
            bytes.extend_from_slice(&chunk);
        }

        match name.as_str() {
            "text" => form.text = String::from_utf8_lossy(&bytes).into_owned(),
            "group" => form.group = String::from_utf8_lossy(&bytes).into_owned(),
            "image-clear" => form.clear_image = !bytes.is_empty(),
            "image" => {
                // An empty file input still sends a part, without a file name.
                if let Some(filename) = filename.filter(|f| !f.is_empty()) {
                    form.image = Some(ImageUpload { filename, bytes });
                }
            }
            other => tracing::debug!(field = %other, "Ignoring unknown form field"),
        }
    }

    Ok(form)
}
