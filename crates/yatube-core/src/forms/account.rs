use super::{FieldMeta, FormErrors, REQUIRED};

const USERNAME_MAX_CHARS: usize = 150;
const PASSWORD_MIN_CHARS: usize = 8;

/// Registration form.
#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub password1: String,
    pub password2: String,
}

#[derive(Debug, Clone)]
pub struct CleanedSignup {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl SignupForm {
    pub const USERNAME: FieldMeta = FieldMeta {
        name: "username",
        label: "Username",
        help_text: Some("Required. 150 characters or fewer. Letters, digits and @/./+/-/_ only."),
        placeholder: None,
        required: true,
    };

    pub const EMAIL: FieldMeta = FieldMeta {
        name: "email",
        label: "Email address",
        help_text: None,
        placeholder: None,
        required: false,
    };

    pub const PASSWORD1: FieldMeta = FieldMeta {
        name: "password1",
        label: "Password",
        help_text: Some("Your password must contain at least 8 characters and can't be entirely numeric."),
        placeholder: None,
        required: true,
    };

    pub const PASSWORD2: FieldMeta = FieldMeta {
        name: "password2",
        label: "Password confirmation",
        help_text: Some("Enter the same password as before, for verification."),
        placeholder: None,
        required: true,
    };

    pub fn clean(&self) -> Result<CleanedSignup, FormErrors> {
        let mut errors = FormErrors::new();

        let username = self.username.trim();
        if username.is_empty() {
            errors.add(Self::USERNAME.name, REQUIRED);
        } else if username.chars().count() > USERNAME_MAX_CHARS {
            errors.add(
                Self::USERNAME.name,
                "Ensure this value has at most 150 characters.",
            );
        } else if !username.chars().all(is_username_char) {
            errors.add(
                Self::USERNAME.name,
                "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
            );
        }

        let email = self.email.trim();
        if !email.is_empty() && !is_plausible_email(email) {
            errors.add(Self::EMAIL.name, "Enter a valid email address.");
        }

        if self.password1.is_empty() {
            errors.add(Self::PASSWORD1.name, REQUIRED);
        }
        if self.password2.is_empty() {
            errors.add(Self::PASSWORD2.name, REQUIRED);
        }
        if !self.password1.is_empty() && !self.password2.is_empty() {
            if self.password1 != self.password2 {
                errors.add(
                    Self::PASSWORD2.name,
                    "The two password fields didn't match.",
                );
            } else {
                if self.password1.chars().count() < PASSWORD_MIN_CHARS {
                    errors.add(
                        Self::PASSWORD2.name,
                        "This password is too short. It must contain at least 8 characters.",
                    );
                }
                if self.password1.chars().all(|c| c.is_ascii_digit()) {
                    errors.add(Self::PASSWORD2.name, "This password is entirely numeric.");
                }
            }
        }

        errors.into_result(|| CleanedSignup {
            username: username.to_string(),
            email: email.to_string(),
            password: self.password1.clone(),
        })
    }
}

fn is_username_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_')
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@')
        }
        None => false,
    }
}

/// Login form.
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub const USERNAME: FieldMeta = FieldMeta {
        name: "username",
        label: "Username",
        help_text: None,
        placeholder: None,
        required: true,
    };

    pub const PASSWORD: FieldMeta = FieldMeta {
        name: "password",
        label: "Password",
        help_text: None,
        placeholder: None,
        required: true,
    };

    /// Checks presence only; credentials are verified by the caller.
    pub fn clean(&self) -> Result<(String, String), FormErrors> {
        let mut errors = FormErrors::new();
        let username = self.username.trim();
        if username.is_empty() {
            errors.add(Self::USERNAME.name, REQUIRED);
        }
        if self.password.is_empty() {
            errors.add(Self::PASSWORD.name, REQUIRED);
        }
        errors.into_result(|| (username.to_string(), self.password.clone()))
    }
}
