//! # Yatube Shared
//!
//! Request and response payloads exchanged with browsers and API clients.

pub mod dto;

pub use dto::{HealthResponse, LoginFormData, NextQuery, PageQuery, PostFormData};
