//! Data Transfer Objects - form payloads and the health check body.
//!
//! Missing form fields deserialize to empty strings so that the form layer,
//! not the extractor, decides what is required.

use serde::{Deserialize, Serialize};

/// Post create/edit submission (urlencoded variant; uploads come as multipart).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostFormData {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub group: String,
    /// Checkbox of the clearable image widget.
    #[serde(default, rename = "image-clear")]
    pub image_clear: Option<String>,
}

impl PostFormData {
    pub fn clear_image(&self) -> bool {
        self.image_clear
            .as_deref()
            .is_some_and(|v| !v.is_empty() && v != "off" && v != "false")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentFormData {
    #[serde(default)]
    pub text: String,
}

/// Login submission. `next` travels as a hidden field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginData {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignupData {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password1: String,
    #[serde(default)]
    pub password2: String,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
    pub database: String,
    pub cache: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default_to_empty() {
        let data: PostFormData = serde_json::from_str("{}").unwrap();
        assert_eq!(data.text, "");
        assert_eq!(data.group, "");
        assert!(!data.clear_image());
    }

    #[test]
    fn test_image_clear_checkbox() {
        let data: PostFormData =
            serde_json::from_str(r#"{"text":"hi","image-clear":"on"}"#).unwrap();
        assert!(data.clear_image());
    }
}
