//! Domain entities - the core business objects.

mod like;
mod post;
mod user;

pub use like::Like;
pub use post::{Post, PostDocument};
pub use user::{User, UserId};
