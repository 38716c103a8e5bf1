//! Core types and repository traits for Pressroom.
//!
//! This crate has no HTTP or database dependencies.
//! Storage backends implement the traits in [`repository`]; the HTTP layer
//! depends on those traits, not on any concrete backend.

pub mod error;
pub mod patch;
pub mod post;
pub mod repository;
pub mod user;
pub mod validate;

pub use error::{Error, ErrorKind, Result};
