//! # Yatube Core
//!
//! The domain layer of Yatube: entities, pagination, the post form, the
//! access gate and the feed/authoring services.
//! This crate contains pure business logic with zero infrastructure dependencies.

pub mod access;
pub mod domain;
pub mod error;
pub mod forms;
pub mod ports;
pub mod services;

pub use access::{Access, Action, Actor, Gate};
pub use error::DomainError;
pub use forms::{PostForm, PostFormInput};
