use super::get_json;
use crate::error::ClientError;
use crate::models::{Metadata, NOT_AVAILABLE, PLACEHOLDER_POSTER};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::debug;

/// Source of descriptive movie metadata.
#[async_trait]
pub trait MetadataApi: Send + Sync {
    /// Look a title up, reporting any failure.
    async fn fetch(&self, title: &str) -> Result<Metadata, ClientError>;

    /// Look a title up. Failures turn into [`Metadata::unavailable`].
    async fn lookup(&self, title: &str) -> Metadata {
        match self.fetch(title).await {
            Ok(metadata) => metadata,
            Err(e) => {
                debug!(title, error = %e, "metadata lookup failed");
                Metadata::unavailable()
            }
        }
    }
}

/// Client for an OMDb-compatible metadata service.
#[derive(Debug, Clone)]
pub struct OmdbClient {
    client: Client,
    base: Url,
    api_key: String,
}

impl OmdbClient {
    pub fn new(client: Client, base: Url, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base,
            api_key: api_key.into(),
        }
    }

    fn title_url(&self, title: &str) -> Url {
        let mut url = self.base.clone();
        url.query_pairs_mut()
            .append_pair("apikey", &self.api_key)
            .append_pair("t", title);
        url
    }
}

#[async_trait]
impl MetadataApi for OmdbClient {
    async fn fetch(&self, title: &str) -> Result<Metadata, ClientError> {
        let data: OmdbResponse = get_json(&self.client, self.title_url(title)).await?;
        data.into_metadata(title)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OmdbResponse {
    poster: Option<String>,
    director: Option<String>,
    actors: Option<String>,
    plot: Option<String>,
    year: Option<String>,
    genre: Option<String>,
    runtime: Option<String>,
    #[serde(rename = "imdbRating")]
    imdb_rating: Option<String>,
    language: Option<String>,
    response: Option<String>,
    error: Option<String>,
}

impl OmdbResponse {
    fn into_metadata(self, title: &str) -> Result<Metadata, ClientError> {
        if self.response.as_deref() == Some("False") {
            let reason = self.error.unwrap_or_else(|| "no result".to_string());
            return Err(ClientError::NotFound(format!("{title:?} ({reason})")));
        }

        let poster = match self.poster {
            Some(p) if !p.is_empty() && p != NOT_AVAILABLE => p,
            _ => PLACEHOLDER_POSTER.to_string(),
        };

        Ok(Metadata {
            poster,
            director: or_sentinel(self.director),
            cast: or_sentinel(self.actors),
            plot: or_sentinel(self.plot),
            year: or_sentinel(self.year),
            genre: or_sentinel(self.genre),
            runtime: or_sentinel(self.runtime),
            imdb_rating: or_sentinel(self.imdb_rating),
            language: or_sentinel(self.language),
        })
    }
}

fn or_sentinel(value: Option<String>) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}
