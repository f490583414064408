use super::{get_json, join_url};
use crate::error::ClientError;
use crate::models::MovieRecord;
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::debug;

/// Reply of the title-autocomplete endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Prediction {
    #[serde(default, rename = "match")]
    pub matched: Option<String>,
    #[serde(default)]
    pub exact: bool,
}

impl Prediction {
    /// A suggestion is only worth showing for a non-exact match.
    pub fn suggestion(self) -> Option<String> {
        match self.matched {
            Some(title) if !self.exact => Some(title),
            _ => None,
        }
    }
}

/// Result of a buy request the backend answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuyOutcome {
    /// Shares now owned for the movie.
    Owned(u32),
    /// Application-level rejection with the message to show.
    Rejected(String),
}

#[derive(Debug, Deserialize)]
struct BuyResponse {
    shares: Option<u32>,
    error: Option<String>,
}

impl From<BuyResponse> for BuyOutcome {
    fn from(res: BuyResponse) -> Self {
        match (res.shares, res.error) {
            (Some(shares), _) => BuyOutcome::Owned(shares),
            (None, Some(message)) if !message.is_empty() => BuyOutcome::Rejected(message),
            (None, _) => BuyOutcome::Rejected("Something went wrong".to_string()),
        }
    }
}

/// The movie-stock backend.
#[async_trait]
pub trait BackendApi: Send + Sync {
    async fn fetch_movies(&self) -> Result<Vec<MovieRecord>, ClientError>;
    async fn predict(&self, title: &str) -> Result<Prediction, ClientError>;
    async fn buy(&self, movie_id: u64) -> Result<BuyOutcome, ClientError>;
}

/// Suggest a title for partial input, never failing.
///
/// Blank input returns immediately without asking the backend.
pub async fn predict_title(api: &dyn BackendApi, input: &str) -> Option<String> {
    if input.trim().is_empty() {
        return None;
    }
    match api.predict(input).await {
        Ok(prediction) => prediction.suggestion(),
        Err(e) => {
            debug!(input, error = %e, "prediction failed");
            None
        }
    }
}

#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base: Url,
}

impl BackendClient {
    pub fn new(client: Client, base: Url) -> Self {
        Self { client, base }
    }
}

#[async_trait]
impl BackendApi for BackendClient {
    async fn fetch_movies(&self) -> Result<Vec<MovieRecord>, ClientError> {
        let url = join_url(&self.base, "api/movies")?;
        get_json(&self.client, url).await
    }

    async fn predict(&self, title: &str) -> Result<Prediction, ClientError> {
        let mut url = join_url(&self.base, "api/predict")?;
        url.query_pairs_mut().append_pair("title", title);
        get_json(&self.client, url).await
    }

    async fn buy(&self, movie_id: u64) -> Result<BuyOutcome, ClientError> {
        let url = join_url(&self.base, &format!("api/buy/{movie_id}"))?;
        // Rejections arrive as JSON bodies, so the status is not checked here.
        let text = self.client.post(url).send().await?.text().await?;
        let res: BuyResponse = serde_json::from_str(&text)?;
        Ok(res.into())
    }
}
