pub mod app_config;
pub mod config;
pub mod resource_name;
pub mod reviews;
pub mod session;

use thiserror::Error;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use resource_name::{ResourceName, ResourceNameError};
pub use reviews::{
    map_star_rating, pending_reviews, DecodedReviews, Review, Reviewer, ReviewsEnvelope,
    StarRating, ANONYMOUS_REVIEWER, NO_COMMENT,
};
pub use session::{
    Credentials, CredentialsError, FileSessionStore, Session, SessionStore,
    GMB_ACCESS_TOKEN_KEY, GMB_ACCOUNT_ID_KEY, GMB_ACCOUNT_NAME_KEY, TOKEN_KEY,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read session file {path}: {source}")]
    SessionFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse session file: {0}")]
    SessionFileParse(#[source] serde_yaml::Error),
}
