use super::{FieldMeta, FormErrors, REQUIRED};

/// Comment form: a single `text` field.
#[derive(Debug, Clone, Default)]
pub struct CommentForm {
    pub text: String,
}

impl CommentForm {
    pub const TEXT: FieldMeta = FieldMeta {
        name: "text",
        label: "Text",
        help_text: Some("Text of the new comment"),
        placeholder: None,
        required: true,
    };

    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The trimmed comment text.
    pub fn clean(&self) -> Result<String, FormErrors> {
        let text = self.text.trim();
        let mut errors = FormErrors::new();
        if text.is_empty() {
            errors.add(Self::TEXT.name, REQUIRED);
        }
        errors.into_result(|| text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_text_is_trimmed() {
        assert_eq!(CommentForm::new(" hi ").clean().unwrap(), "hi");
    }

    #[test]
    fn test_empty_comment_is_rejected() {
        assert!(CommentForm::new("\n").clean().unwrap_err().has("text"));
    }
}
