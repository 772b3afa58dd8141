//! Sample data for previews, stubs and tests.

use crate::domain::{Post, User};

pub fn test_user() -> User {
    User::new("test-user", "Isaac Newton")
}

pub fn test_post() -> Post {
    Post::new("Look@", "What goes up must come down", test_user())
}
