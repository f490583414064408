use crate::error::ConfigError;
use clap::Args;
use reqwest::Url;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_OMDB_URL: &str = "https://www.omdbapi.com/";
/// Public demo key; pass your own with `--omdb-key` or `OMDB_API_KEY`.
pub const DEFAULT_OMDB_KEY: &str = "thewdb";
const LOG_FILE_NAME: &str = "movie-stocks.log";

/// Connection settings shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Base URL of the movie-stock backend
    #[arg(long, env = "MOVIE_STOCKS_API_URL", default_value = DEFAULT_API_URL, global = true)]
    pub api_url: String,

    /// Base URL of the OMDb-compatible metadata service
    #[arg(long, env = "MOVIE_STOCKS_OMDB_URL", default_value = DEFAULT_OMDB_URL, global = true)]
    pub omdb_url: String,

    /// API key for the metadata service
    #[arg(long, env = "OMDB_API_KEY", default_value = DEFAULT_OMDB_KEY, global = true, hide_env_values = true)]
    pub omdb_key: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "MOVIE_STOCKS_TIMEOUT_SECS", default_value_t = 10, global = true)]
    pub timeout_secs: u64,

    /// Log file (defaults to the user cache directory)
    #[arg(long, env = "MOVIE_STOCKS_LOG", global = true)]
    pub log_file: Option<PathBuf>,
}

/// Validated runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: Url,
    pub omdb_url: Url,
    pub omdb_key: String,
    pub timeout: Duration,
    pub log_file: PathBuf,
}

impl Config {
    pub fn from_args(args: ConfigArgs) -> Result<Self, ConfigError> {
        if args.timeout_secs == 0 {
            return Err(ConfigError::Timeout);
        }
        let log_file = match args.log_file {
            Some(path) => path,
            None => default_log_file()?,
        };
        Ok(Self {
            api_url: parse_base_url("backend", &args.api_url)?,
            omdb_url: parse_url("metadata", &args.omdb_url)?,
            omdb_key: args.omdb_key,
            timeout: Duration::from_secs(args.timeout_secs),
            log_file,
        })
    }
}

fn default_log_file() -> Result<PathBuf, ConfigError> {
    let project_dirs = directories::ProjectDirs::from("com", "moviestocks", "movie-stocks")
        .ok_or(ConfigError::NoCacheDir)?;
    Ok(project_dirs.cache_dir().join(LOG_FILE_NAME))
}

fn parse_url(name: &'static str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value).map_err(|e| ConfigError::Url {
        name,
        value: value.to_string(),
        reason: e.to_string(),
    })?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Url {
            name,
            value: value.to_string(),
            reason: "scheme must be http or https".to_string(),
        });
    }
    Ok(url)
}

/// Parse a base URL so that relative joins append to its path.
fn parse_base_url(name: &'static str, value: &str) -> Result<Url, ConfigError> {
    let mut url = parse_url(name, value)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
