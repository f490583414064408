mod app;
mod catalog;
mod clients;
mod config;
mod error;
mod events;
mod filter;
mod frames;
mod models;
mod sequence;
mod ui;

use app::{App, InputMode, Services, View};
use catalog::CatalogStore;
use clap::{Parser, Subcommand};
use clients::{BackendApi, BackendClient, MetadataApi, OmdbClient};
use config::{Config, ConfigArgs};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use events::EventReceiver;
use filter::AttributeFilter;
use std::fs::File;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::info;
use tracing_subscriber::EnvFilter;
use ui::add_form::AddFormAction;
use ui::filters::FilterBarAction;

/// Browse movies, check their details and trade their stock
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    config: ConfigArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive grid (default)
    Run,
    /// Print the catalog as plain-text cards
    List {
        /// Only titles containing this text
        #[arg(short, long)]
        search: Option<String>,
        /// Only movies released in this year
        #[arg(long)]
        year: Option<String>,
        /// Only movies with this genre
        #[arg(long)]
        genre: Option<String>,
        /// Only movies in this language
        #[arg(long)]
        language: Option<String>,
    },
}

/// Log to a file so output does not interfere with the terminal UI.
fn init_tracing(path: &Path) -> std::io::Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let file = File::options().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .init();
    Ok(())
}

fn build_services(config: &Config) -> Result<Services, error::ClientError> {
    let http = clients::http_client(config.timeout)?;
    let backend: Arc<dyn BackendApi> = Arc::new(BackendClient::new(http.clone(), config.api_url.clone()));
    let metadata: Arc<dyn MetadataApi> = Arc::new(OmdbClient::new(
        http,
        config.omdb_url.clone(),
        config.omdb_key.clone(),
    ));
    Ok(Services { backend, metadata })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = match Config::from_args(cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e.user_message());
            std::process::exit(2);
        }
    };
    init_tracing(&config.log_file)?;
    info!(api = %config.api_url, omdb = %config.omdb_url, "starting");

    let services = build_services(&config)?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::List {
            search,
            year,
            genre,
            language,
        } => {
            let attributes = AttributeFilter {
                year,
                genre,
                language,
            };
            print_catalog(&services, &config, search.as_deref(), &attributes).await;
        }
        Commands::Run => {
            let (mut app, mut rx) = App::new(services, config.api_url.clone());
            app.init().await;

            // Init terminal
            let mut terminal = ratatui::init();

            // Initial grid geometry
            let size = terminal.size()?;
            app.update_grid_size(size.width, size.height);

            // Main loop
            let result = run_app(&mut terminal, &mut app, &mut rx).await;

            // Restore terminal
            ratatui::restore();

            if let Err(e) = result {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

/// Non-interactive listing: load, enrich every movie, filter and print.
async fn print_catalog(
    services: &Services,
    config: &Config,
    search: Option<&str>,
    attributes: &AttributeFilter,
) {
    let mut catalog = CatalogStore::new();
    catalog.load(services.backend.fetch_movies().await);

    let pending: Vec<(u64, String)> = catalog
        .movies()
        .iter()
        .map(|m| (m.id, m.title.clone()))
        .collect();
    for (id, title) in pending {
        let metadata = services.metadata.lookup(&title).await;
        catalog.apply_metadata(id, &title, &metadata);
    }

    let movies = catalog.movies();
    let matching: Vec<usize> = filter::filter_by_text(movies, search.unwrap_or(""))
        .into_iter()
        .filter(|&idx| attributes.matches(&movies[idx]))
        .collect();

    if matching.is_empty() {
        eprintln!("No movies match.");
        return;
    }
    for idx in matching {
        let movie = &movies[idx];
        let poster = ui::card::resolve_poster(&config.api_url, movie.poster.as_deref());
        println!("{}\n", ui::card::card_text(movie, "Shares Owned: 0", &poster));
    }
}

async fn run_app(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
    rx: &mut EventReceiver,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| ui::render(app, frame))?;

        if app.should_quit {
            return Ok(());
        }

        // Poll often enough for the frame clock to stay smooth
        if crossterm::event::poll(std::time::Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Press {
                        handle_key(app, key);
                    }
                }
                Event::Resize(width, height) => {
                    app.update_grid_size(width, height);
                }
                _ => {}
            }
        }

        // Apply whatever the background tasks reported meanwhile
        while let Ok(event) = rx.try_recv() {
            app.handle_event(event);
        }
        app.sync_catalog();
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Ctrl+C always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    // An alert swallows the key that dismisses it
    if app.alert.is_some() {
        app.dismiss_alert();
        return;
    }

    if key.code == KeyCode::Char('?') && app.input_mode == InputMode::Normal && app.view == View::Grid {
        app.show_help = !app.show_help;
        return;
    }

    // If help is showing, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    match app.view {
        View::AddMovie => handle_add_form_key(app, key),
        View::Filters => handle_filter_bar_key(app, key),
        View::Grid if app.input_mode == InputMode::Editing => handle_search_input(app, key),
        View::Grid => handle_grid_key(app, key),
    }
}

fn handle_search_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Tab => app.accept_prediction(),
        KeyCode::Backspace => app.search_pop(),
        KeyCode::Char(c) => app.search_push(c),
        _ => {}
    }
}

fn handle_grid_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
        }
        KeyCode::Char('/') => {
            app.input_mode = InputMode::Editing;
        }
        KeyCode::Right | KeyCode::Char('l') => app.move_right(),
        KeyCode::Left | KeyCode::Char('h') => app.move_left(),
        KeyCode::Down | KeyCode::Char('j') => app.move_down(),
        KeyCode::Up | KeyCode::Char('k') => app.move_up(),
        KeyCode::Char('f') => app.open_filters(),
        KeyCode::Char('a') => {
            app.view = View::AddMovie;
        }
        KeyCode::Char('b') => app.buy_selected(),
        KeyCode::Char('t') => app.open_trailer(),
        KeyCode::Char('d') | KeyCode::Delete => app.delete_selected(),
        KeyCode::Char('r') => app.reload(),
        KeyCode::Esc => app.clear_query(),
        _ => {}
    }
}

fn handle_add_form_key(app: &mut App, key: KeyEvent) {
    match app.add_form.handle_key(key) {
        Some(AddFormAction::Submit) => app.submit_add_form(),
        Some(AddFormAction::Cancel) => {
            app.add_form.reset();
            app.view = View::Grid;
        }
        None => {}
    }
}

fn handle_filter_bar_key(app: &mut App, key: KeyEvent) {
    match app.filter_bar.handle_key(key, &app.filter_options) {
        Some(FilterBarAction::Apply(filter)) => app.apply_attribute_filter(filter),
        Some(FilterBarAction::Cancel) => {
            app.view = View::Grid;
        }
        None => {}
    }
}
