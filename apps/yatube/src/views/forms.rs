use yatube_core::domain::Group;
use yatube_core::forms::{FieldMeta, FormErrors};

#[derive(Debug, Clone)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// A bound form field ready for rendering.
#[derive(Debug, Clone)]
pub struct FieldView {
    pub name: &'static str,
    pub label: &'static str,
    pub help_text: Option<&'static str>,
    pub placeholder: Option<&'static str>,
    pub required: bool,
    /// `text`, `email`, `password`, `textarea`, `select` or `file`.
    pub widget: &'static str,
    pub value: String,
    pub options: Vec<SelectOption>,
    pub errors: Vec<String>,
}

impl FieldView {
    pub fn new(meta: FieldMeta, widget: &'static str, value: impl Into<String>) -> Self {
        Self {
            name: meta.name,
            label: meta.label,
            help_text: meta.help_text,
            placeholder: meta.placeholder,
            required: meta.required,
            widget,
            value: value.into(),
            options: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// A group choice with an empty "no group" option first.
    pub fn group_select(meta: FieldMeta, groups: &[Group], selected: &str) -> Self {
        let selected = selected.trim();
        let mut options = vec![SelectOption {
            value: String::new(),
            label: "---------".to_string(),
            selected: selected.is_empty(),
        }];
        options.extend(groups.iter().map(|g| {
            let value = g.id.to_string();
            SelectOption {
                selected: value == selected,
                value,
                label: g.title.clone(),
            }
        }));

        Self {
            options,
            ..Self::new(meta, "select", selected)
        }
    }

    pub fn is_textarea(&self) -> bool {
        self.widget == "textarea"
    }

    pub fn is_select(&self) -> bool {
        self.widget == "select"
    }

    pub fn is_file(&self) -> bool {
        self.widget == "file"
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn with_errors(mut self, errors: &FormErrors) -> Self {
        self.errors = errors.field(self.name).to_vec();
        self
    }
}
