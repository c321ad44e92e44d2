//! Form binding and validation.
//!
//! Forms hold the raw submitted values so a rejected submission can be
//! re-rendered as the user typed it. `clean` turns them into validated values
//! or a per-field error map.

mod account;
mod comment;
mod errors;
mod post;

pub use account::{CleanedSignup, LoginForm, SignupForm};
pub use comment::CommentForm;
pub use errors::FormErrors;
pub use post::{CleanedPost, ImageUpload, PostForm};

pub(crate) const REQUIRED: &str = "This field is required.";

/// Presentation metadata of a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMeta {
    pub name: &'static str,
    pub label: &'static str,
    pub help_text: Option<&'static str>,
    pub placeholder: Option<&'static str>,
    pub required: bool,
}
