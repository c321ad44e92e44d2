//! Domain entities - the core business objects.

mod comment;
mod follow;
mod group;
mod post;
mod user;

pub use comment::{Comment, CommentEntry, NewComment};
pub use follow::{Follow, NewFollow};
pub use group::{Group, NewGroup};
pub use post::{NewPost, Post, PostChanges, PostEntry, PostFilter};
pub use user::{Author, NewUser, User};
