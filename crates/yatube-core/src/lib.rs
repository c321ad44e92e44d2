//! # Yatube Core
//!
//! The domain layer of the Yatube blog: posts, groups, comments and the
//! follow graph, together with form validation, pagination windowing and the
//! ports that infrastructure has to implement.
//! This crate has no infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod forms;
pub mod pagination;
pub mod ports;

pub use error::{DomainError, RepoError};
pub use pagination::{Page, PageRequest};
