use anyhow::Result;
use clap::{Parser, ValueEnum};
use crossterm::{
    event::{poll, read, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tscw::app::App;
use tscw::config::{Config, Overrides, Settings};
use tscw::resource::{build_transport, FetchPolicy, ResourceFetcher, ResourceKind};
use tscw::scw::auth::Credentials;
use tscw::ui::splash::{render as render_splash, SplashState};
use tscw::{event, ui};

/// Terminal UI for Scaleway
#[derive(Parser, Debug)]
#[command(name = "tscw", version, about, long_about = None)]
struct Args {
    /// Organization to list resources of
    #[arg(short, long)]
    organization: Option<String>,

    /// Scaleway API root URL
    #[arg(long)]
    api_url: Option<String>,

    /// Serve built-in sample data instead of calling the API
    #[arg(long)]
    fake_data: bool,

    /// Resource view to open
    #[arg(long, value_enum)]
    view: Option<ResourceKind>,

    /// What to do when some regions or zones fail to list
    #[arg(long, value_enum)]
    policy: Option<FetchPolicy>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,

    /// Run in read-only mode (block deploy and power actions)
    #[arg(long)]
    readonly: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let tracing_level = level.to_tracing_level()?;

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Logging disabled: cannot open {:?}: {}", log_path, e);
            return None;
        },
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("tscw started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("tscw").join("tscw.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".tscw").join("tscw.log");
    }
    PathBuf::from("tscw.log")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level);

    // Fail before touching the terminal when nothing can be listed
    let config = Config::load();
    let overrides = Overrides {
        organization_id: args.organization.clone(),
        api_url: args.api_url.clone(),
        fake_data: args.fake_data,
        view: args.view,
        policy: args.policy,
        readonly: args.readonly,
    };
    let settings = Settings::resolve(
        &overrides,
        Credentials::from_env(),
        &config,
        Credentials::from_cli_profile(),
    );
    if let Err(err) = settings.validate() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = initialize_with_splash(&mut terminal, settings, config).await;

    match result {
        Ok(Some(mut app)) => {
            let run_result = run_app(&mut terminal, &mut app).await;
            cleanup_terminal(&mut terminal)?;

            if let Err(err) = run_result {
                eprintln!("Error: {err:?}");
            }
        },
        Ok(None) => {
            cleanup_terminal(&mut terminal)?;
        },
        Err(err) => {
            cleanup_terminal(&mut terminal)?;
            eprintln!("Initialization error: {err:?}");
        },
    }

    Ok(())
}

fn cleanup_terminal<B: Backend + std::io::Write>(terminal: &mut Terminal<B>) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

async fn initialize_with_splash<B: Backend>(
    terminal: &mut Terminal<B>,
    settings: Settings,
    config: Config,
) -> Result<Option<App>>
where
    B::Error: Send + Sync + 'static,
{
    let mut splash = SplashState::new();

    terminal.draw(|f| render_splash(f, &splash))?;

    if check_abort()? {
        return Ok(None);
    }

    // Step 1: Settings
    let organization = settings
        .credentials
        .organization_id
        .clone()
        .unwrap_or_else(|| "all organizations".to_string());
    tracing::info!(
        "Using {} ({}), policy {:?}",
        organization,
        if settings.fake_data { "sample data" } else { "live API" },
        settings.policy
    );
    splash.set_message(&format!("Loading Scaleway config [{}]", organization));
    terminal.draw(|f| render_splash(f, &splash))?;
    splash.complete_step();

    if check_abort()? {
        return Ok(None);
    }

    // Step 2: Data source
    let source = if settings.fake_data {
        "sample data".to_string()
    } else {
        settings
            .credentials
            .api_url
            .clone()
            .unwrap_or_default()
    };
    splash.set_message(&format!("Connecting to {}", source));
    terminal.draw(|f| render_splash(f, &splash))?;

    let transport = build_transport(&settings.credentials, settings.fake_data)?;
    let fetcher = ResourceFetcher::new(transport)
        .with_partitions(settings.partitions.clone())
        .with_policy(settings.policy)
        .with_organization(settings.credentials.organization_id.clone());
    splash.complete_step();

    if check_abort()? {
        return Ok(None);
    }

    // Step 3: First listing
    let display_name = &tscw::resource::get_resource(settings.view).display_name;
    splash.set_message(&format!("Fetching {}", display_name));
    terminal.draw(|f| render_splash(f, &splash))?;

    let mut app = App::new(fetcher, settings.view, config, settings.readonly);
    app.refresh_now().await;
    splash.complete_step();

    splash.complete_step();
    splash.set_message("Ready!");
    terminal.draw(|f| render_splash(f, &splash))?;

    tokio::time::sleep(Duration::from_millis(200)).await;

    Ok(Some(app))
}

fn check_abort() -> Result<bool> {
    if poll(Duration::from_millis(50))? {
        if let Event::Key(key) = read()? {
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    loop {
        terminal.draw(|f| ui::render(f, app))?;

        if event::handle_events(app).await? {
            return Ok(());
        }

        app.poll_fetch();
    }
}
