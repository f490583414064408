use crate::error::{ClientError, InputError};
use crate::models::{Metadata, MovieRecord};
use tokio::sync::watch;
use tracing::{info, warn};

/// A validated add-movie submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMovie {
    pub title: String,
    pub stock_price: u32,
}

impl NewMovie {
    /// Validate raw form input: a non-empty title and a positive whole price.
    pub fn parse(title: &str, price: &str) -> Result<Self, InputError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(InputError::EmptyTitle);
        }
        let stock_price = match price.trim().parse::<u32>() {
            Ok(p) if p > 0 => p,
            _ => return Err(InputError::InvalidPrice(price.to_string())),
        };
        Ok(Self {
            title: title.to_string(),
            stock_price,
        })
    }
}

/// The ordered list of movies currently known to the client.
///
/// Membership changes (load, add, remove) bump a revision published on a
/// watch channel; that channel is the one place the UI learns it must
/// rebuild the grid.
pub struct CatalogStore {
    movies: Vec<MovieRecord>,
    revision: watch::Sender<u64>,
}

impl CatalogStore {
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            movies: Vec::new(),
            revision,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    #[cfg(test)]
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    pub fn movies(&self) -> &[MovieRecord] {
        &self.movies
    }

    pub fn get(&self, index: usize) -> Option<&MovieRecord> {
        self.movies.get(index)
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Replace the contents with the backend result followed by the fallback list.
    ///
    /// A failed fetch leaves only the fallback list. Ids are not checked for
    /// collisions between the two sources.
    pub fn load(&mut self, fetched: Result<Vec<MovieRecord>, ClientError>) {
        let mut movies = match fetched {
            Ok(movies) => {
                info!(count = movies.len(), "catalog fetched from backend");
                movies
            }
            Err(e) => {
                warn!(error = %e, "catalog fetch failed, showing fallback list only");
                Vec::new()
            }
        };
        movies.extend(MovieRecord::fallback_list());
        self.movies = movies;
        self.bump();
    }

    /// Id the next added movie receives.
    pub fn next_id(&self) -> u64 {
        self.movies
            .iter()
            .map(|m| m.id)
            .max()
            .unwrap_or(0)
            .saturating_add(1)
    }

    /// Insert an enriched movie at the front and return its new id.
    pub fn add(&mut self, movie: NewMovie, metadata: &Metadata) -> u64 {
        let id = self.next_id();
        let mut record = MovieRecord::new(id, movie.title, movie.stock_price);
        record.apply_metadata(metadata);
        info!(id, title = %record.title, "movie added");
        self.movies.insert(0, record);
        self.bump();
        id
    }

    /// Remove the first movie with `id`. Returns whether anything was removed.
    #[cfg(test)]
    pub fn remove(&mut self, id: u64) -> bool {
        match self.movies.iter().position(|m| m.id == id) {
            Some(pos) => self.remove_at(pos).is_some(),
            None => false,
        }
    }

    /// Remove the movie at `index`, whatever its id.
    pub fn remove_at(&mut self, index: usize) -> Option<MovieRecord> {
        if index >= self.movies.len() {
            return None;
        }
        let removed = self.movies.remove(index);
        info!(id = removed.id, title = %removed.title, "movie removed");
        self.bump();
        Some(removed)
    }

    /// Fill the enrichment fields of the first un-enriched movie with `id` and `title`.
    ///
    /// Ids may repeat across backend and fallback records, so the title
    /// identifies which lookup the metadata belongs to. Not a membership
    /// change, so subscribers are not notified.
    pub fn apply_metadata(&mut self, id: u64, title: &str, metadata: &Metadata) -> bool {
        match self
            .movies
            .iter_mut()
            .find(|m| m.id == id && m.title == title && !m.is_enriched())
        {
            Some(movie) => {
                movie.apply_metadata(metadata);
                true
            }
            None => false,
        }
    }

    fn bump(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn store_with(movies: Vec<MovieRecord>) -> CatalogStore {
        let mut store = CatalogStore::new();
        store.movies = movies;
        store
    }

    #[test]
    fn test_load_appends_fallback_after_backend() {
        let mut store = CatalogStore::new();
        let fetched: Vec<MovieRecord> =
            serde_json::from_str(r#"[{"id":1,"title":"X","stock_price":100}]"#).unwrap();
        store.load(Ok(fetched));

        let titles: Vec<&str> = store.movies().iter().map(|m| m.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["X", "Drishyam", "Thudarum", "Baahubali", "Master", "Jawan"]
        );
    }

    #[test]
    fn test_load_failure_uses_fallback_only() {
        let mut store = CatalogStore::new();
        store.load(Err(ClientError::NotFound("backend".into())));
        assert_eq!(store.movies(), MovieRecord::fallback_list().as_slice());
    }

    #[test]
    fn test_load_does_not_deduplicate() {
        let mut store = CatalogStore::new();
        store.load(Ok(vec![MovieRecord::new(101, "Drishyam", 350)]));
        assert_eq!(store.len(), 6);
        assert_eq!(store.movies().iter().filter(|m| m.id == 101).count(), 2);
    }

    #[test]
    fn test_add_on_empty_store_starts_at_one() {
        let mut store = CatalogStore::new();
        let id = store.add(NewMovie::parse("Salaar", "180").unwrap(), &Metadata::unavailable());
        assert_eq!(id, 1);
        assert!(store.movies()[0].is_enriched());
    }

    #[test]
    fn test_new_movie_validation() {
        assert_eq!(NewMovie::parse("  ", "10"), Err(InputError::EmptyTitle));
        assert!(matches!(NewMovie::parse("Jawan", "0"), Err(InputError::InvalidPrice(_))));
        assert!(matches!(NewMovie::parse("Jawan", "-5"), Err(InputError::InvalidPrice(_))));
        assert!(matches!(NewMovie::parse("Jawan", ""), Err(InputError::InvalidPrice(_))));
        assert_eq!(
            NewMovie::parse(" Jawan ", " 380 "),
            Ok(NewMovie {
                title: "Jawan".into(),
                stock_price: 380
            })
        );
    }

    #[test]
    fn test_membership_changes_notify_subscribers() {
        let mut store = CatalogStore::new();
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());

        store.load(Ok(Vec::new()));
        assert!(rx.has_changed().unwrap());
        rx.borrow_and_update();

        assert!(store.apply_metadata(101, "Drishyam", &Metadata::unavailable()));
        assert!(!rx.has_changed().unwrap());

        assert!(!store.remove(9999));
        assert!(!rx.has_changed().unwrap());

        assert!(store.remove(101));
        assert!(rx.has_changed().unwrap());
    }

    #[test]
    fn test_apply_metadata_skips_enriched() {
        let mut store = CatalogStore::new();
        store.load(Ok(Vec::new()));
        let mut first = Metadata::unavailable();
        first.director = "Jeethu Joseph".into();
        assert!(store.apply_metadata(101, "Drishyam", &first));

        let mut second = Metadata::unavailable();
        second.director = "Someone Else".into();
        assert!(!store.apply_metadata(101, "Drishyam", &second));
        assert_eq!(store.movies()[0].director.as_deref(), Some("Jeethu Joseph"));
    }

    #[test]
    fn test_apply_metadata_matches_title_for_shared_ids() {
        let mut store = CatalogStore::new();
        store.load(Ok(vec![MovieRecord::new(101, "Salaar", 180)]));

        let mut salaar = Metadata::unavailable();
        salaar.director = "Prashanth Neel".into();
        assert!(store.apply_metadata(101, "Salaar", &salaar));
        assert!(!store.movies()[1].is_enriched());

        let mut drishyam = Metadata::unavailable();
        drishyam.director = "Jeethu Joseph".into();
        assert!(store.apply_metadata(101, "Drishyam", &drishyam));
        assert_eq!(store.movies()[0].director.as_deref(), Some("Prashanth Neel"));
        assert_eq!(store.movies()[1].director.as_deref(), Some("Jeethu Joseph"));

        assert!(!store.apply_metadata(101, "Unknown", &drishyam));
    }

    #[test]
    fn test_apply_metadata_fills_same_title_duplicates_one_at_a_time() {
        let mut store = CatalogStore::new();
        store.load(Ok(vec![MovieRecord::new(101, "Drishyam", 350)]));
        assert!(store.apply_metadata(101, "Drishyam", &Metadata::unavailable()));
        assert!(store.movies()[0].is_enriched());
        assert!(!store.movies()[1].is_enriched());
        assert!(store.apply_metadata(101, "Drishyam", &Metadata::unavailable()));
        assert!(store.movies()[1].is_enriched());
    }

    #[test]
    fn test_next_id_does_not_overflow() {
        let store = store_with(vec![MovieRecord::new(u64::MAX, "Edge", 1)]);
        assert_eq!(store.next_id(), u64::MAX);
    }

    #[test]
    fn test_remove_at_targets_position() {
        let mut store = CatalogStore::new();
        store.load(Ok(vec![MovieRecord::new(101, "Salaar", 180)]));
        let mut rx = store.subscribe();

        let removed = store.remove_at(1).unwrap();
        assert_eq!(removed.title, "Drishyam");
        assert_eq!(store.movies()[0].title, "Salaar");
        assert!(rx.has_changed().unwrap());
        rx.borrow_and_update();

        assert!(store.remove_at(99).is_none());
        assert!(!rx.has_changed().unwrap());
    }

    fn arb_movies() -> impl Strategy<Value = Vec<MovieRecord>> {
        prop::collection::vec((1u64..500, "[A-Za-z ]{1,12}", 1u32..1000), 0..20).prop_map(|rows| {
            rows.into_iter()
                .map(|(id, title, price)| MovieRecord::new(id, title, price))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_add_goes_to_front_with_greater_id(
            movies in arb_movies(),
            title in "[A-Za-z]{1,10}",
            price in 1u32..100_000,
        ) {
            let max_before = movies.iter().map(|m| m.id).max();
            let len_before = movies.len();
            let mut store = store_with(movies);

            let id = store.add(NewMovie::parse(&title, &price.to_string()).unwrap(), &Metadata::unavailable());

            prop_assert_eq!(store.len(), len_before + 1);
            let front = &store.movies()[0];
            prop_assert_eq!(front.id, id);
            prop_assert_eq!(front.stock_price, price);
            prop_assert_eq!(&front.title, &title);
            if let Some(max) = max_before {
                prop_assert!(id > max);
            } else {
                prop_assert_eq!(id, 1);
            }
        }

        #[test]
        fn prop_remove_is_exact_and_idempotent(movies in arb_movies(), pick in any::<prop::sample::Index>()) {
            prop_assume!(!movies.is_empty());
            let target = movies[pick.index(movies.len())].id;
            let occurrences = movies.iter().filter(|m| m.id == target).count();
            let first_pos = movies.iter().position(|m| m.id == target).unwrap();
            let mut expected = movies.clone();
            expected.remove(first_pos);

            let mut store = store_with(movies);
            prop_assert!(store.remove(target));
            prop_assert_eq!(store.movies(), expected.as_slice());

            if occurrences == 1 {
                let rev = store.revision();
                prop_assert!(!store.remove(target));
                prop_assert_eq!(store.movies(), expected.as_slice());
                prop_assert_eq!(store.revision(), rev);
            }
        }
    }
}
