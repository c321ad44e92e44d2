use crate::domain::{Group, PostEntry};

use super::{FieldMeta, FormErrors, REQUIRED};

const INVALID_CHOICE: &str =
    "Select a valid choice. That choice is not one of the available choices.";
const INVALID_IMAGE: &str = "Upload a valid image. The file you uploaded was either not an image or a corrupted image.";

/// An uploaded file as received from a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Whether the bytes decode as a supported image format.
    pub fn is_image(&self) -> bool {
        imagesize::blob_size(&self.bytes).is_ok()
    }
}

/// Post create/edit form: `group`, `text` and `image`.
#[derive(Debug, Clone, Default)]
pub struct PostForm {
    pub text: String,
    /// Raw group choice; empty means "no group".
    pub group: String,
    pub image: Option<ImageUpload>,
    /// The "clear" checkbox of the image widget.
    pub clear_image: bool,
}

/// Values of a post form that passed validation.
#[derive(Debug, Clone)]
pub struct CleanedPost {
    pub text: String,
    pub group_id: Option<i32>,
    pub image: Option<ImageUpload>,
    pub clear_image: bool,
}

impl PostForm {
    pub const TEXT: FieldMeta = FieldMeta {
        name: "text",
        label: "Text",
        help_text: Some("Text of the new post"),
        placeholder: Some("Enter text"),
        required: true,
    };

    pub const GROUP: FieldMeta = FieldMeta {
        name: "group",
        label: "Group",
        help_text: Some("Group the post will belong to"),
        placeholder: None,
        required: false,
    };

    pub const IMAGE: FieldMeta = FieldMeta {
        name: "image",
        label: "Image",
        help_text: None,
        placeholder: None,
        required: false,
    };

    /// Initial values for editing an existing post.
    pub fn from_entry(entry: &PostEntry) -> Self {
        Self {
            text: entry.post.text.clone(),
            group: entry
                .post
                .group_id
                .map(|id| id.to_string())
                .unwrap_or_default(),
            image: None,
            clear_image: false,
        }
    }

    /// Validate against the groups a post may be filed under.
    pub fn clean(&self, groups: &[Group]) -> Result<CleanedPost, FormErrors> {
        let mut errors = FormErrors::new();

        let text = self.text.trim();
        if text.is_empty() {
            errors.add(Self::TEXT.name, REQUIRED);
        }

        let choice = self.group.trim();
        let group_id = if choice.is_empty() {
            None
        } else {
            match choice.parse::<i32>() {
                Ok(id) if groups.iter().any(|g| g.id == id) => Some(id),
                _ => {
                    errors.add(Self::GROUP.name, INVALID_CHOICE);
                    None
                }
            }
        };

        if let Some(upload) = &self.image {
            if !upload.is_image() {
                errors.add(Self::IMAGE.name, INVALID_IMAGE);
            }
        }

        errors.into_result(|| CleanedPost {
            text: text.to_string(),
            group_id,
            image: self.image.clone(),
            clear_image: self.clear_image,
        })
    }
}

impl CleanedPost {
    /// Image name to store after the upload (if any) was saved as `uploaded`.
    pub fn resolve_image(&self, current: Option<String>, uploaded: Option<String>) -> Option<String> {
        match uploaded {
            Some(name) => Some(name),
            None if self.clear_image => None,
            None => current,
        }
    }
}
