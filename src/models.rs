use serde::{Deserialize, Serialize};

/// Shown wherever a poster is missing or unusable.
pub const PLACEHOLDER_POSTER: &str = "https://placehold.co/200x300?text=No+Image";

/// Sentinel for metadata the lookup could not provide.
pub const NOT_AVAILABLE: &str = "N/A";

/// Movies that are always appended after whatever the backend returns.
const FALLBACK_MOVIES: [(u64, &str, u32); 5] = [
    (101, "Drishyam", 350),
    (102, "Thudarum", 400),
    (103, "Baahubali", 450),
    (104, "Master", 300),
    (105, "Jawan", 380),
];

/// A single tradable movie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub id: u64,
    pub title: String,
    pub stock_price: u32,
    #[serde(default, deserialize_with = "non_empty")]
    pub poster: Option<String>,
    #[serde(default)]
    pub director: Option<String>,
    #[serde(default)]
    pub cast: Option<String>,
    #[serde(default)]
    pub plot: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub runtime: Option<String>,
    #[serde(default, rename = "imdbRating")]
    pub imdb_rating: Option<String>,
    /// `Language` as delivered by OMDb-shaped payloads. Takes precedence.
    #[serde(default, rename = "Language")]
    pub language_primary: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

/// Descriptive fields filled in from the metadata service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub poster: String,
    pub director: String,
    pub cast: String,
    pub plot: String,
    pub year: String,
    pub genre: String,
    pub runtime: String,
    pub imdb_rating: String,
    pub language: String,
}

impl Metadata {
    /// The result of a lookup that failed for any reason.
    pub fn unavailable() -> Self {
        Self {
            poster: PLACEHOLDER_POSTER.to_string(),
            director: NOT_AVAILABLE.to_string(),
            cast: NOT_AVAILABLE.to_string(),
            plot: NOT_AVAILABLE.to_string(),
            year: NOT_AVAILABLE.to_string(),
            genre: NOT_AVAILABLE.to_string(),
            runtime: NOT_AVAILABLE.to_string(),
            imdb_rating: NOT_AVAILABLE.to_string(),
            language: NOT_AVAILABLE.to_string(),
        }
    }
}

impl MovieRecord {
    pub fn new(id: u64, title: impl Into<String>, stock_price: u32) -> Self {
        Self {
            id,
            title: title.into(),
            stock_price,
            poster: None,
            director: None,
            cast: None,
            plot: None,
            year: None,
            genre: None,
            runtime: None,
            imdb_rating: None,
            language_primary: None,
            language: None,
        }
    }

    /// The hardcoded list shown regardless of backend availability.
    pub fn fallback_list() -> Vec<MovieRecord> {
        FALLBACK_MOVIES
            .iter()
            .map(|&(id, title, price)| MovieRecord::new(id, title, price))
            .collect()
    }

    /// Enriched once both poster and director are known.
    pub fn is_enriched(&self) -> bool {
        self.poster.is_some() && self.director.is_some()
    }

    /// Overwrite the enrichment fields with a lookup result.
    ///
    /// A backend-provided poster or language is kept when present.
    pub fn apply_metadata(&mut self, metadata: &Metadata) {
        if self.poster.is_none() {
            self.poster = Some(metadata.poster.clone());
        }
        self.director = Some(metadata.director.clone());
        self.cast = Some(metadata.cast.clone());
        self.plot = Some(metadata.plot.clone());
        self.year = Some(metadata.year.clone());
        self.genre = Some(metadata.genre.clone());
        self.runtime = Some(metadata.runtime.clone());
        self.imdb_rating = Some(metadata.imdb_rating.clone());
        if self.language_primary.is_none() && self.language.is_none() {
            self.language_primary = Some(metadata.language.clone());
        }
    }

    /// Language field, capitalized spelling first.
    pub fn language_field(&self) -> Option<&str> {
        self.language_primary
            .as_deref()
            .or(self.language.as_deref())
    }

    pub fn genres(&self) -> Vec<&str> {
        split_list(self.genre.as_deref())
    }

    pub fn languages(&self) -> Vec<&str> {
        split_list(self.language_field())
    }
}

/// Split a comma separated field, trimming each entry.
pub fn split_list(value: Option<&str>) -> Vec<&str> {
    match value {
        Some(v) => v.split(',').map(str::trim).collect(),
        None => Vec::new(),
    }
}

fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_record_parsing() {
        let json = r#"[
            {"id": 1, "title": "Thangalaan", "stock_price": 150, "poster": "/static/posters/thangalaan.jpg"},
            {"id": 2, "title": "Lucky Baskhar", "stock_price": 220, "poster": ""}
        ]"#;
        let records: Vec<MovieRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].poster.as_deref(), Some("/static/posters/thangalaan.jpg"));
        assert_eq!(records[1].poster, None);
        assert!(!records[0].is_enriched());
    }

    #[test]
    fn test_language_precedence() {
        let json = r#"{"id": 3, "title": "Salaar", "stock_price": 180,
                       "Language": "Telugu, Hindi", "language": "Tamil"}"#;
        let record: MovieRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.languages(), vec!["Telugu", "Hindi"]);

        let json = r#"{"id": 3, "title": "Salaar", "stock_price": 180, "language": "Tamil"}"#;
        let record: MovieRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.languages(), vec!["Tamil"]);
    }

    #[test]
    fn test_fallback_list() {
        let list = MovieRecord::fallback_list();
        let ids: Vec<u64> = list.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![101, 102, 103, 104, 105]);
        assert_eq!(list[0].title, "Drishyam");
        assert_eq!(list[4].stock_price, 380);
    }

    #[test]
    fn test_apply_metadata_keeps_backend_poster() {
        let mut record = MovieRecord::new(1, "Salaar", 180);
        record.poster = Some("/static/posters/salaar.jpg".to_string());
        record.apply_metadata(&Metadata::unavailable());
        assert_eq!(record.poster.as_deref(), Some("/static/posters/salaar.jpg"));
        assert_eq!(record.director.as_deref(), Some(NOT_AVAILABLE));
        assert!(record.is_enriched());
        assert_eq!(record.language_field(), Some(NOT_AVAILABLE));
    }

    #[test]
    fn test_unavailable_metadata_defaults() {
        let m = Metadata::unavailable();
        assert_eq!(m.poster, PLACEHOLDER_POSTER);
        for field in [&m.director, &m.cast, &m.plot, &m.year, &m.genre, &m.runtime, &m.imdb_rating] {
            assert_eq!(field, NOT_AVAILABLE);
        }
    }
}
