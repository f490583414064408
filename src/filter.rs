use crate::models::{MovieRecord, NOT_AVAILABLE};
use std::collections::BTreeSet;

/// Attribute criteria from the filter bar. `None` means "any".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeFilter {
    pub year: Option<String>,
    pub genre: Option<String>,
    pub language: Option<String>,
}

impl AttributeFilter {
    pub fn is_empty(&self) -> bool {
        self.year.is_none() && self.genre.is_none() && self.language.is_none()
    }

    /// All present criteria must hold.
    pub fn matches(&self, movie: &MovieRecord) -> bool {
        if let Some(ref year) = self.year {
            if movie.year.as_deref() != Some(year.as_str()) {
                return false;
            }
        }
        if let Some(ref genre) = self.genre {
            if !movie.genres().contains(&genre.as_str()) {
                return false;
            }
        }
        if let Some(ref language) = self.language {
            if !movie.languages().contains(&language.as_str()) {
                return false;
            }
        }
        true
    }

    /// Short human description, e.g. `2023 · Action · Hindi`.
    pub fn describe(&self) -> String {
        let parts: Vec<&str> = [&self.year, &self.genre, &self.language]
            .into_iter()
            .filter_map(|c| c.as_deref())
            .collect();
        if parts.is_empty() {
            "all".to_string()
        } else {
            parts.join(" · ")
        }
    }
}

/// Indices of movies whose title contains `query`, ignoring case.
pub fn filter_by_text(movies: &[MovieRecord], query: &str) -> Vec<usize> {
    let query = query.to_lowercase();
    movies
        .iter()
        .enumerate()
        .filter(|(_, m)| query.is_empty() || m.title.to_lowercase().contains(&query))
        .map(|(i, _)| i)
        .collect()
}

/// Indices of movies satisfying every criterion of `filter`, in order.
pub fn filter_by_attributes(movies: &[MovieRecord], filter: &AttributeFilter) -> Vec<usize> {
    movies
        .iter()
        .enumerate()
        .filter(|(_, m)| filter.matches(m))
        .map(|(i, _)| i)
        .collect()
}

/// Distinct values offered by the filter bar, each sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub years: Vec<String>,
    pub genres: Vec<String>,
    pub languages: Vec<String>,
}

impl FilterOptions {
    pub fn collect<'a>(movies: impl IntoIterator<Item = &'a MovieRecord>) -> Self {
        let mut years = BTreeSet::new();
        let mut genres = BTreeSet::new();
        let mut languages = BTreeSet::new();
        for movie in movies {
            if let Some(year) = movie.year.as_deref() {
                insert_value(&mut years, year);
            }
            for genre in movie.genres() {
                insert_value(&mut genres, genre);
            }
            for language in movie.languages() {
                insert_value(&mut languages, language);
            }
        }
        Self {
            years: years.into_iter().collect(),
            genres: genres.into_iter().collect(),
            languages: languages.into_iter().collect(),
        }
    }
}

fn insert_value(set: &mut BTreeSet<String>, value: &str) {
    let value = value.trim();
    if !value.is_empty() && value != NOT_AVAILABLE {
        set.insert(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn movie(id: u64, title: &str, year: &str, genre: &str, language: Option<&str>) -> MovieRecord {
        let mut m = MovieRecord::new(id, title, 100);
        m.year = Some(year.to_string());
        m.genre = Some(genre.to_string());
        m.language = language.map(str::to_string);
        m
    }

    fn sample() -> Vec<MovieRecord> {
        vec![
            movie(1, "Jawan", "2023", "Action, Thriller", Some("Hindi, Tamil")),
            movie(2, "Drishyam", "2013", "Crime, Drama, Thriller", Some("Malayalam")),
            movie(3, "Master", "2021", "Action, Thriller", Some("Tamil")),
            movie(4, "Baahubali", "2015", "Action, Drama", None),
        ]
    }

    #[test]
    fn test_text_filter_is_case_insensitive() {
        let movies = sample();
        assert_eq!(filter_by_text(&movies, "MAS"), vec![2]);
        assert_eq!(filter_by_text(&movies, "a"), vec![0, 1, 2, 3]);
        assert_eq!(filter_by_text(&movies, ""), vec![0, 1, 2, 3]);
        assert!(filter_by_text(&movies, "zzz").is_empty());
    }

    #[test]
    fn test_attribute_filter_composes() {
        let movies = sample();
        let f = AttributeFilter {
            genre: Some("Thriller".into()),
            ..Default::default()
        };
        assert_eq!(filter_by_attributes(&movies, &f), vec![0, 1, 2]);

        let f = AttributeFilter {
            genre: Some("Action".into()),
            language: Some("Tamil".into()),
            ..Default::default()
        };
        assert_eq!(filter_by_attributes(&movies, &f), vec![0, 2]);

        let f = AttributeFilter {
            year: Some("2015".into()),
            ..Default::default()
        };
        assert_eq!(filter_by_attributes(&movies, &f), vec![3]);
    }

    #[test]
    fn test_genre_is_membership_not_substring() {
        let movies = sample();
        let f = AttributeFilter {
            genre: Some("Act".into()),
            ..Default::default()
        };
        assert!(filter_by_attributes(&movies, &f).is_empty());
    }

    #[test]
    fn test_capitalized_language_wins() {
        let mut m = movie(1, "Salaar", "2023", "Action", Some("Kannada"));
        m.language_primary = Some("Telugu".into());
        let f = AttributeFilter {
            language: Some("Kannada".into()),
            ..Default::default()
        };
        assert!(!f.matches(&m));
    }

    #[test]
    fn test_options_are_distinct_and_sorted() {
        let mut movies = sample();
        movies.push(MovieRecord::new(5, "Thudarum", 400));
        let mut na = movie(6, "Unknown", NOT_AVAILABLE, NOT_AVAILABLE, None);
        na.language_primary = Some(NOT_AVAILABLE.into());
        movies.push(na);

        let options = FilterOptions::collect(&movies);
        assert_eq!(options.years, vec!["2013", "2015", "2021", "2023"]);
        assert_eq!(options.genres, vec!["Action", "Crime", "Drama", "Thriller"]);
        assert_eq!(options.languages, vec!["Hindi", "Malayalam", "Tamil"]);
    }

    #[test]
    fn test_describe() {
        assert_eq!(AttributeFilter::default().describe(), "all");
        let f = AttributeFilter {
            year: Some("2023".into()),
            language: Some("Hindi".into()),
            ..Default::default()
        };
        assert_eq!(f.describe(), "2023 · Hindi");
    }

    fn arb_movie() -> impl Strategy<Value = MovieRecord> {
        let years = prop::sample::select(vec!["2013", "2015", "2021", "2023"]);
        let genres = prop::sample::subsequence(vec!["Action", "Drama", "Thriller", "Crime"], 0..4);
        let languages = prop::sample::subsequence(vec!["Hindi", "Tamil", "Telugu"], 0..3);
        (1u64..100, years, genres, languages).prop_map(|(id, year, genres, languages)| {
            let mut m = MovieRecord::new(id, format!("Movie {id}"), 100);
            m.year = Some(year.to_string());
            m.genre = Some(genres.join(", "));
            m.language = Some(languages.join(","));
            m
        })
    }

    fn arb_filter() -> impl Strategy<Value = AttributeFilter> {
        (
            prop::option::of(prop::sample::select(vec!["2013", "2021", "2023"])),
            prop::option::of(prop::sample::select(vec!["Action", "Drama"])),
            prop::option::of(prop::sample::select(vec!["Hindi", "Tamil"])),
        )
            .prop_map(|(year, genre, language)| AttributeFilter {
                year: year.map(str::to_string),
                genre: genre.map(str::to_string),
                language: language.map(str::to_string),
            })
    }

    proptest! {
        #[test]
        fn prop_attribute_filter_is_ordered_subset(
            movies in prop::collection::vec(arb_movie(), 0..25),
            filter in arb_filter(),
        ) {
            let picked = filter_by_attributes(&movies, &filter);
            prop_assert!(picked.windows(2).all(|w| w[0] < w[1]));
            for &i in &picked {
                prop_assert!(filter.matches(&movies[i]));
                if let Some(ref year) = filter.year {
                    prop_assert_eq!(movies[i].year.as_deref(), Some(year.as_str()));
                }
            }
            let rejected = movies.len() - picked.len();
            prop_assert_eq!(
                rejected,
                movies.iter().filter(|m| !filter.matches(m)).count()
            );
        }

        #[test]
        fn prop_empty_filter_keeps_everything(movies in prop::collection::vec(arb_movie(), 0..25)) {
            let all: Vec<usize> = (0..movies.len()).collect();
            prop_assert_eq!(filter_by_attributes(&movies, &AttributeFilter::default()), all);
        }
    }
}
