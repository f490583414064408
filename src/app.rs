use crate::catalog::{CatalogStore, NewMovie};
use crate::clients::{BackendApi, BuyOutcome, MetadataApi, predict_title};
use crate::error::ClientError;
use crate::events::{self, AppEvent, EventReceiver, EventSender};
use crate::filter::{self, AttributeFilter, FilterOptions};
use crate::frames::{FRAME_TICK, FrameRotator};
use crate::models::MovieRecord;
use crate::sequence::RequestSequence;
use crate::ui::add_form::AddMovieForm;
use crate::ui::filters::FilterBar;
use reqwest::Url;
use std::collections::HashMap;
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Which view is currently active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Grid,
    Filters,
    AddMovie,
}

/// Input mode for the search bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// What decides the displayed subset of the catalog. The last one applied wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewQuery {
    All,
    Text(String),
    Attributes(AttributeFilter),
}

/// Width of one card including its border.
pub const CARD_WIDTH: u16 = 40;
/// Height of one card including its border.
pub const CARD_HEIGHT: u16 = 15;
/// Rows taken by header, search bar, suggestion line and status bar.
pub const GRID_OVERHEAD: u16 = 8;

const TRAILER_SEARCH: &str = "https://www.youtube.com/results?search_query=";

/// Remote services the app talks to.
#[derive(Clone)]
pub struct Services {
    pub backend: Arc<dyn BackendApi>,
    pub metadata: Arc<dyn MetadataApi>,
}

/// Main application state.
pub struct App {
    services: Services,
    events: EventSender,
    /// Base for resolving relative poster paths.
    pub api_base: Url,

    pub catalog: CatalogStore,
    catalog_rx: watch::Receiver<u64>,

    pub should_quit: bool,
    pub view: View,
    pub show_help: bool,
    pub input_mode: InputMode,

    // Search bar
    pub search: String,
    pub prediction: Option<String>,
    predict_seq: RequestSequence,

    // Displayed grid
    pub query: ViewQuery,
    pub visible: Vec<usize>,
    pub selected: usize,
    pub row_offset: usize,
    pub grid_columns: usize,
    pub grid_rows: usize,
    pub frames: FrameRotator,
    frame_seq: RequestSequence,
    frame_task: Option<JoinHandle<()>>,
    enrich_seq: RequestSequence,
    enrich_task: Option<JoinHandle<()>>,
    load_seq: RequestSequence,

    pub filter_options: FilterOptions,
    pub filter_bar: FilterBar,
    pub add_form: AddMovieForm,

    pub shares: HashMap<u64, u32>,
    pub alert: Option<String>,
    pub status_msg: String,
}

impl App {
    pub fn new(services: Services, api_base: Url) -> (Self, EventReceiver) {
        let (events, rx) = events::channel();
        let catalog = CatalogStore::new();
        let catalog_rx = catalog.subscribe();
        let app = Self {
            services,
            events,
            api_base,
            catalog,
            catalog_rx,

            should_quit: false,
            view: View::Grid,
            show_help: false,
            input_mode: InputMode::Normal,

            search: String::new(),
            prediction: None,
            predict_seq: RequestSequence::new(),

            query: ViewQuery::All,
            visible: Vec::new(),
            selected: 0,
            row_offset: 0,
            grid_columns: 1,
            grid_rows: 1,
            frames: FrameRotator::default(),
            frame_seq: RequestSequence::new(),
            frame_task: None,
            enrich_seq: RequestSequence::new(),
            enrich_task: None,
            load_seq: RequestSequence::new(),

            filter_options: FilterOptions::default(),
            filter_bar: FilterBar::default(),
            add_form: AddMovieForm::default(),

            shares: HashMap::new(),
            alert: None,
            status_msg: "Loading movies...".to_string(),
        };
        (app, rx)
    }

    /// Initial catalog load.
    pub async fn init(&mut self) {
        let fetched = self.services.backend.fetch_movies().await;
        self.load_catalog(fetched);
        self.sync_catalog();
    }

    /// A failed fetch is only logged; the fallback list is shown as if loaded.
    fn load_catalog(&mut self, fetched: Result<Vec<MovieRecord>, ClientError>) {
        self.catalog.load(fetched);
        self.status_msg = format!("{} movies loaded", self.catalog.len());
    }

    /// Fetch the catalog again in the background.
    pub fn reload(&mut self) {
        let seq = self.load_seq.issue();
        let backend = Arc::clone(&self.services.backend);
        let tx = self.events.clone();
        tokio::spawn(async move {
            let result = backend.fetch_movies().await;
            let _ = tx.send(AppEvent::CatalogFetched { seq, result });
        });
        self.status_msg = "Reloading movies...".to_string();
    }

    /// Rebuild the grid if the catalog membership changed since the last look.
    pub fn sync_catalog(&mut self) -> bool {
        if !self.catalog_rx.has_changed().unwrap_or(false) {
            return false;
        }
        let revision = *self.catalog_rx.borrow_and_update();
        debug!(revision, "catalog changed, rebuilding grid");
        self.rebuild_grid();
        true
    }

    /// Apply a new query and rebuild the grid from the top.
    pub fn set_query(&mut self, query: ViewQuery) {
        self.query = query;
        self.selected = 0;
        self.row_offset = 0;
        self.rebuild_grid();
    }

    /// Recompute the displayed subset, then restart enrichment and the frame clock.
    fn rebuild_grid(&mut self) {
        let movies = self.catalog.movies();
        self.visible = match &self.query {
            ViewQuery::All => (0..movies.len()).collect(),
            ViewQuery::Text(q) => filter::filter_by_text(movies, q),
            ViewQuery::Attributes(f) => filter::filter_by_attributes(movies, f),
        };
        self.filter_options = FilterOptions::collect(movies);

        if self.selected >= self.visible.len() {
            self.selected = self.visible.len().saturating_sub(1);
        }
        self.ensure_selected_visible();
        self.restart_frames();
        self.schedule_enrichment();
    }

    /// Look up metadata for visible movies that lack it, one after another.
    fn schedule_enrichment(&mut self) {
        if let Some(task) = self.enrich_task.take() {
            task.abort();
        }
        let seq = self.enrich_seq.issue();
        let pending: Vec<(u64, String)> = self
            .visible_movies()
            .filter(|m| !m.is_enriched())
            .map(|m| (m.id, m.title.clone()))
            .collect();
        if pending.is_empty() {
            return;
        }

        debug!(count = pending.len(), "enriching visible movies");
        let api = Arc::clone(&self.services.metadata);
        let tx = self.events.clone();
        self.enrich_task = Some(tokio::spawn(async move {
            for (id, title) in pending {
                let metadata = api.lookup(&title).await;
                if tx.send(AppEvent::Enriched { seq, id, title, metadata }).is_err() {
                    break;
                }
            }
        }));
    }

    /// Replace the frame clock with one for the grid just built.
    fn restart_frames(&mut self) {
        if let Some(task) = self.frame_task.take() {
            task.abort();
        }
        let generation = self.frame_seq.issue();
        self.frames = FrameRotator::new(self.visible.len(), Instant::now(), &mut rand::thread_rng());
        if self.visible.is_empty() {
            return;
        }

        let tx = self.events.clone();
        self.frame_task = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(FRAME_TICK);
            loop {
                interval.tick().await;
                if tx.send(AppEvent::FrameTick { generation }).is_err() {
                    break;
                }
            }
        }));
    }

    /// Apply a result reported by a background task.
    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::CatalogFetched { seq, result } => {
                if self.load_seq.is_latest(seq) {
                    self.load_catalog(result);
                }
            }
            AppEvent::Enriched {
                seq,
                id,
                title,
                metadata,
            } => {
                if self.enrich_seq.is_latest(seq) && self.catalog.apply_metadata(id, &title, &metadata) {
                    self.filter_options = FilterOptions::collect(self.catalog.movies());
                }
            }
            AppEvent::MovieReady { movie, metadata } => {
                let title = movie.title.clone();
                let id = self.catalog.add(movie, &metadata);
                self.status_msg = format!("Added \"{}\" (#{})", title, id);
            }
            AppEvent::Prediction { seq, suggestion } => {
                if self.predict_seq.is_latest(seq) {
                    self.prediction = suggestion;
                }
            }
            AppEvent::BuyFinished { id, result } => self.finish_buy(id, result),
            AppEvent::FrameTick { generation } => {
                if self.frame_seq.is_latest(generation) {
                    self.frames.tick(Instant::now(), &mut rand::thread_rng());
                }
            }
        }
    }

    // ── Search ──

    pub fn search_push(&mut self, c: char) {
        self.search.push(c);
        self.on_search_changed();
    }

    pub fn search_pop(&mut self) {
        if self.search.pop().is_some() {
            self.on_search_changed();
        }
    }

    /// Take the suggested title as the search text.
    pub fn accept_prediction(&mut self) {
        if let Some(title) = self.prediction.take() {
            self.search = title;
            self.on_search_changed();
        }
    }

    fn on_search_changed(&mut self) {
        self.set_query(ViewQuery::Text(self.search.clone()));
        self.request_prediction();
    }

    /// Ask for a suggestion for the current search text.
    ///
    /// Blank input clears the suggestion right away and outdates any request
    /// still in flight.
    fn request_prediction(&mut self) {
        let seq = self.predict_seq.issue();
        if self.search.trim().is_empty() {
            self.prediction = None;
            return;
        }
        let backend = Arc::clone(&self.services.backend);
        let tx = self.events.clone();
        let input = self.search.clone();
        tokio::spawn(async move {
            let suggestion = predict_title(backend.as_ref(), &input).await;
            let _ = tx.send(AppEvent::Prediction { seq, suggestion });
        });
    }

    /// Drop search text and attribute filters.
    pub fn clear_query(&mut self) {
        self.search.clear();
        self.prediction = None;
        self.predict_seq.issue();
        self.set_query(ViewQuery::All);
    }

    // ── Filter bar ──

    pub fn open_filters(&mut self) {
        if let ViewQuery::Attributes(ref f) = self.query {
            self.filter_bar.selection = f.clone();
        }
        self.view = View::Filters;
    }

    pub fn apply_attribute_filter(&mut self, filter: AttributeFilter) {
        self.search.clear();
        self.prediction = None;
        self.predict_seq.issue();
        self.status_msg = format!("Filter: {}", filter.describe());
        self.set_query(ViewQuery::Attributes(filter));
        self.view = View::Grid;
    }

    // ── Add form ──

    /// Validate the form and look the title up before inserting it.
    ///
    /// Invalid input leaves the form open and untouched.
    pub fn submit_add_form(&mut self) {
        let movie = match NewMovie::parse(&self.add_form.title, &self.add_form.price) {
            Ok(movie) => movie,
            Err(e) => {
                debug!(error = %e, "add-movie form not submitted");
                return;
            }
        };
        self.status_msg = format!("Looking up \"{}\"...", movie.title);
        self.add_form.reset();
        self.view = View::Grid;

        let api = Arc::clone(&self.services.metadata);
        let tx = self.events.clone();
        tokio::spawn(async move {
            let metadata = api.lookup(&movie.title).await;
            let _ = tx.send(AppEvent::MovieReady { movie, metadata });
        });
    }

    // ── Card actions ──

    pub fn buy_selected(&mut self) {
        let (id, title) = match self.selected_movie() {
            Some(movie) => (movie.id, movie.title.clone()),
            None => return,
        };
        self.status_msg = format!("Buying a share of \"{}\"...", title);

        let backend = Arc::clone(&self.services.backend);
        let tx = self.events.clone();
        tokio::spawn(async move {
            let result = backend.buy(id).await;
            let _ = tx.send(AppEvent::BuyFinished { id, result });
        });
    }

    fn finish_buy(&mut self, id: u64, result: Result<BuyOutcome, ClientError>) {
        match result {
            Ok(BuyOutcome::Owned(shares)) => {
                info!(id, shares, "share purchased");
                self.shares.insert(id, shares);
                self.status_msg = format!("Purchased! {}", self.share_label(id));
            }
            Ok(BuyOutcome::Rejected(message)) => {
                warn!(id, %message, "purchase rejected");
                self.alert = Some(message);
            }
            Err(e) => {
                warn!(id, error = %e, "purchase failed");
                self.alert = Some(format!("Failed to buy share: {}", e));
            }
        }
    }

    pub fn share_label(&self, id: u64) -> String {
        format!("Shares Owned: {}", self.shares.get(&id).copied().unwrap_or(0))
    }

    /// Remove the selected card itself, even when another card shares its id.
    pub fn delete_selected(&mut self) {
        if let Some(&idx) = self.visible.get(self.selected) {
            self.catalog.remove_at(idx);
        }
    }

    pub fn open_trailer(&mut self) {
        let Some(movie) = self.selected_movie() else {
            return;
        };
        let url = trailer_search_url(&movie.title);
        self.status_msg = match open_url(&url) {
            Ok(()) => format!("Opening: {}", url),
            Err(e) => {
                warn!(error = %e, "could not launch browser");
                format!("Trailer: {} (no browser available)", url)
            }
        };
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    // ── Grid navigation ──

    pub fn selected_movie(&self) -> Option<&MovieRecord> {
        self.visible
            .get(self.selected)
            .and_then(|&idx| self.catalog.get(idx))
    }

    pub fn visible_movies(&self) -> impl Iterator<Item = &MovieRecord> {
        self.visible.iter().filter_map(|&idx| self.catalog.get(idx))
    }

    /// Update grid geometry based on terminal size.
    pub fn update_grid_size(&mut self, width: u16, height: u16) {
        self.grid_columns = (width / CARD_WIDTH).max(1) as usize;
        self.grid_rows = (height.saturating_sub(GRID_OVERHEAD) / CARD_HEIGHT).max(1) as usize;
        self.ensure_selected_visible();
    }

    pub fn move_right(&mut self) {
        if self.selected + 1 < self.visible.len() {
            self.selected += 1;
            self.ensure_selected_visible();
        }
    }

    pub fn move_left(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.ensure_selected_visible();
        }
    }

    pub fn move_down(&mut self) {
        let next = self.selected + self.grid_columns;
        if next < self.visible.len() {
            self.selected = next;
        } else if !self.visible.is_empty() {
            // Jump to the last card when it sits on a later row.
            let last = self.visible.len() - 1;
            if last / self.grid_columns > self.selected / self.grid_columns {
                self.selected = last;
            }
        }
        self.ensure_selected_visible();
    }

    pub fn move_up(&mut self) {
        if self.selected >= self.grid_columns {
            self.selected -= self.grid_columns;
            self.ensure_selected_visible();
        }
    }

    fn ensure_selected_visible(&mut self) {
        let row = self.selected / self.grid_columns;
        if row < self.row_offset {
            self.row_offset = row;
        } else if row >= self.row_offset + self.grid_rows {
            self.row_offset = row + 1 - self.grid_rows;
        }
    }
}

/// YouTube search for the movie's trailer.
pub fn trailer_search_url(title: &str) -> String {
    format!(
        "{}{}",
        TRAILER_SEARCH,
        urlencoding::encode(&format!("{} trailer", title))
    )
}

fn open_url(url: &str) -> std::io::Result<()> {
    #[cfg(target_os = "macos")]
    let mut cmd = Command::new("open");
    #[cfg(target_os = "windows")]
    let mut cmd = {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", ""]);
        c
    };
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let mut cmd = Command::new("xdg-open");

    cmd.arg(url)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
}
