//! Error types for taskboard

use crate::task::MAX_DESCRIPTION_LEN;
use thiserror::Error;

/// Failure talking to the task API.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }
}

/// Problems with a draft that stop it from being sent.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Please fill all the required fields.")]
    MissingRequired,

    #[error("Description cannot exceed {max} characters.")]
    DescriptionTooLong { len: usize, max: usize },
}

impl ValidationError {
    pub fn description_too_long(len: usize) -> Self {
        ValidationError::DescriptionTooLong {
            len,
            max: MAX_DESCRIPTION_LEN,
        }
    }
}

#[derive(Error, Debug)]
pub enum BoardError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("session expired, please log in again")]
    SessionExpired,

    #[error("no task is being edited")]
    NotEditing,

    #[error("error fetching tasks: {0}")]
    Fetch(#[source] ApiError),

    #[error("error saving the task: {0}")]
    Save(#[source] ApiError),

    #[error("error deleting the task: {0}")]
    Delete(#[source] ApiError),
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("login failed: {0}")]
    Login(#[source] ApiError),

    #[error("registration failed: {0}")]
    Register(#[source] ApiError),

    #[error("failed to store session: {0}")]
    Session(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine config directory")]
    NoConfigDir,

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid API URL {0:?}: {1}")]
    InvalidUrl(String, #[source] url::ParseError),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}
