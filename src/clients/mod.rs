mod backend;
mod metadata;

pub use backend::{BackendApi, BackendClient, BuyOutcome, Prediction, predict_title};
pub use metadata::{MetadataApi, OmdbClient};

use crate::error::ClientError;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Build the shared HTTP client used by every service client.
pub fn http_client(timeout: Duration) -> Result<Client, ClientError> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(concat!("movie-stocks/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// Join a path onto a base URL, keeping any path prefix of the base.
pub fn join_url(base: &Url, path: &str) -> Result<Url, ClientError> {
    base.join(path.trim_start_matches('/'))
        .map_err(|e| ClientError::InvalidUrl(format!("{base} + {path}: {e}")))
}

/// GET a URL and decode its JSON body, failing on non-success status.
async fn get_json<T: DeserializeOwned>(client: &Client, url: Url) -> Result<T, ClientError> {
    let res = client.get(url.clone()).send().await?;
    let status = res.status();
    let text = res.text().await?;
    if !status.is_success() {
        return Err(ClientError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(serde_json::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url_keeps_prefix() {
        let base = Url::parse("http://localhost:8000/app/").unwrap();
        let url = join_url(&base, "/api/movies").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/app/api/movies");

        let base = Url::parse("http://localhost:8000").unwrap();
        let url = join_url(&base, "api/buy/101").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/buy/101");
    }
}
