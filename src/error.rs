use thiserror::Error;

/// Failures talking to the backend or the metadata service.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Data format error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Rejected add-movie form input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("title must not be empty")]
    EmptyTitle,

    #[error("price must be a positive whole number, got {0:?}")]
    InvalidPrice(String),
}

/// Invalid start-up configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid {name} URL {value:?}: {reason}")]
    Url {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Timeout must be at least one second")]
    Timeout,

    #[error("Could not determine a cache directory for the log file")]
    NoCacheDir,
}

impl ConfigError {
    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            ConfigError::Url { name, value, reason } => {
                format!("The {} URL \"{}\" is not usable ({}). Check --{}-url.", name, value, reason, flag_prefix(name))
            }
            ConfigError::Timeout => "The timeout must be at least one second. Check --timeout-secs.".to_string(),
            ConfigError::NoCacheDir => "Could not find a cache directory. Pass --log-file explicitly.".to_string(),
        }
    }
}

fn flag_prefix(name: &str) -> &'static str {
    match name {
        "metadata" => "omdb",
        _ => "api",
    }
}
