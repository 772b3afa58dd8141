//! # LookAt Shared
//!
//! Types shared between the data layer and any presentation front end.

pub mod dto;
pub mod loadable;

pub use dto::{NewPostRequest, PostResponse};
pub use loadable::Loadable;
