//! # Yatube Shared
//!
//! Request and response shapes exchanged with browsers: form payloads and
//! the health check body.

pub mod dto;

pub use dto::{CommentFormData, HealthResponse, LoginData, PostFormData, SignupData};
