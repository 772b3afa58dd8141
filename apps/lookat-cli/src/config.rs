//! Application configuration loaded from environment variables.

use std::env;

use lookat_core::Collections;
use lookat_core::domain::User;
use lookat_infra::LocalAttachmentConfig;

use crate::telemetry::TelemetryConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Identity handed over by the external sign-in flow.
    pub user: User,
    pub collections: Collections,
    /// Use the Redis document store (REDIS_URL is set).
    pub use_redis: bool,
    pub attachments: LocalAttachmentConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Collections::default();

        Self {
            user: User::new(
                env::var("LOOKAT_USER_ID").unwrap_or_else(|_| "local-user".to_string()),
                env::var("LOOKAT_USER_NAME")
                    .or_else(|_| env::var("USER"))
                    .unwrap_or_else(|_| "Anonymous".to_string()),
            ),
            collections: Collections {
                posts: env::var("POSTS_COLLECTION").unwrap_or(defaults.posts),
                likes: env::var("LIKES_COLLECTION").unwrap_or(defaults.likes),
            },
            use_redis: env::var("REDIS_URL").is_ok(),
            attachments: LocalAttachmentConfig::from_env(),
            telemetry: TelemetryConfig::from_env(),
        }
    }
}
