//! # LookAt Core
//!
//! The domain layer of the LookAt feed.
//! Entities, ports, and the posts/likes repository. No infrastructure dependencies:
//! stores and attachment backends are injected through the traits in [`ports`].

pub mod domain;
pub mod error;
pub mod fixtures;
pub mod ports;
pub mod repository;

pub use error::RepositoryError;
pub use repository::{Collections, StorePostsRepository};
