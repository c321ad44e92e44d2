use askama::Template;

use yatube_core::domain::{Author, CommentEntry, Group};

use super::{FieldView, Listing, Nav, PostCard};

#[derive(Template)]
#[template(path = "posts/index.html")]
pub struct IndexTemplate {
    pub nav: Nav,
    pub listing: Listing,
}

#[derive(Template)]
#[template(path = "posts/group_list.html")]
pub struct GroupListTemplate {
    pub nav: Nav,
    pub group: Group,
    pub listing: Listing,
}

#[derive(Template)]
#[template(path = "posts/profile.html")]
pub struct ProfileTemplate {
    pub nav: Nav,
    pub author: Author,
    pub profile_url: String,
    pub posts_count: u64,
    pub following: bool,
    /// Viewer is signed in and is not the author.
    pub show_follow: bool,
    pub listing: Listing,
}

#[derive(Debug, Clone)]
pub struct CommentView {
    pub author: String,
    pub author_url: String,
    pub text: String,
    pub created: String,
}

impl From<CommentEntry> for CommentView {
    fn from(entry: CommentEntry) -> Self {
        Self {
            created: entry.comment.created_at.format("%d %B %Y %H:%M").to_string(),
            author_url: super::profile_url(&entry.author.username),
            author: entry.author.username,
            text: entry.comment.text,
        }
    }
}

#[derive(Template)]
#[template(path = "posts/post_detail.html")]
pub struct PostDetailTemplate {
    pub nav: Nav,
    /// First characters of the text, used as the page title.
    pub title: String,
    pub post: PostCard,
    pub posts_count: u64,
    pub can_edit: bool,
    pub comments: Vec<CommentView>,
    pub comment_fields: Vec<FieldView>,
    pub comment_action: String,
}

#[derive(Template)]
#[template(path = "posts/create_post.html")]
pub struct PostFormTemplate {
    pub nav: Nav,
    pub is_edit: bool,
    pub action: String,
    pub fields: Vec<FieldView>,
    /// URL of the image already attached to the edited post.
    pub current_image: Option<String>,
}

#[derive(Template)]
#[template(path = "posts/follow.html")]
pub struct FollowTemplate {
    pub nav: Nav,
    pub listing: Listing,
}

#[derive(Template)]
#[template(path = "users/login.html")]
pub struct LoginTemplate {
    pub nav: Nav,
    pub fields: Vec<FieldView>,
    pub non_field_errors: Vec<String>,
    pub next: Option<String>,
}

#[derive(Template)]
#[template(path = "users/signup.html")]
pub struct SignupTemplate {
    pub nav: Nav,
    pub fields: Vec<FieldView>,
    pub non_field_errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "users/logged_out.html")]
pub struct LoggedOutTemplate {
    pub nav: Nav,
}

#[derive(Template)]
#[template(path = "core/error.html")]
pub struct ErrorTemplate {
    pub nav: Nav,
    pub status: u16,
    pub title: String,
    pub message: String,
}
