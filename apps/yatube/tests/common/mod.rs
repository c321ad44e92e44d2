#![allow(dead_code)]

use actix_web::cookie::Cookie;
use tempfile::TempDir;

use yatube::config::Settings;
use yatube::middleware::auth::SESSION_COOKIE;
use yatube::state::AppState;
use yatube_core::domain::{Group, NewGroup, NewPost, NewUser, Post, User};
use yatube_infra::{JwtConfig, MediaConfig};

pub const PASSWORD: &str = "correct-horse-42";

/// A 2x1 GIF.
pub const SMALL_GIF: &[u8] = &[
    0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x02, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00,
    0x00, 0xFF, 0xFF, 0xFF, 0x21, 0xF9, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x2C, 0x00, 0x00,
    0x00, 0x00, 0x02, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02, 0x0C, 0x0A, 0x00, 0x3B,
];

/// In-memory state with its media root in a temporary directory.
pub fn test_state() -> (AppState, TempDir) {
    let media_root = tempfile::tempdir().unwrap();
    let state = AppState::in_memory(
        Settings::default(),
        MediaConfig {
            root: media_root.path().to_path_buf(),
            url_prefix: "/media/".to_string(),
        },
        JwtConfig::default(),
    );
    (state, media_root)
}

pub async fn create_user(state: &AppState, username: &str) -> User {
    let hash = state.passwords.hash(PASSWORD).unwrap();
    state
        .users
        .create(NewUser::new(username, "", hash))
        .await
        .unwrap()
}

pub async fn create_group(state: &AppState, title: &str, slug: &str) -> Group {
    state
        .groups
        .create(NewGroup::new(title, slug, "Test description"))
        .await
        .unwrap()
}

pub async fn create_post(state: &AppState, author: &User, text: &str, group: Option<&Group>) -> Post {
    let mut draft = NewPost::new(author.id, text);
    if let Some(group) = group {
        draft = draft.in_group(group.id);
    }
    state.posts.create(draft).await.unwrap()
}

/// Session cookie of a signed-in `user`.
pub fn session(state: &AppState, user: &User) -> Cookie<'static> {
    let token = state
        .tokens
        .generate_token(user.id, &user.username)
        .unwrap();
    Cookie::new(SESSION_COOKIE, token)
}

/// Number of post cards on a rendered listing.
pub fn card_count(body: &[u8]) -> usize {
    String::from_utf8_lossy(body)
        .matches("<article class=\"post\">")
        .count()
}

pub fn body_text(body: &[u8]) -> String {
    String::from_utf8_lossy(body).into_owned()
}
