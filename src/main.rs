//! lab-console: the signed-in user's laboratory worklist in the terminal.
//!
//! # Usage
//!
//! ```bash
//! lab-console login --token <TOKEN>
//! lab-console worklist
//! lab-console worklist --search perez --type sample --sort date --desc
//! lab-console worklist --status RELEASED --json
//! lab-console worklist --open 42
//! lab-console sidebar --collapsed true
//! ```

mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use worklist_client::{WorklistClient, WorklistQuery, refresh};
use worklist_core::constants::{DEFAULT_API_BASE_URL, DEFAULT_SESSION_FILE};
use worklist_core::{
    LoadState, Locale, NonEmptyText, PersistedSession, RenderContext, SessionConfig,
    SessionStore, SortKey, SortOrder, SortSpec, WorklistView,
};

#[derive(Parser)]
#[command(name = "lab-console", version)]
#[command(about = "Laboratory worklist console")]
struct Cli {
    /// Session file (default: LAB_SESSION_FILE or .lab-session.yaml)
    #[arg(long, global = true)]
    session_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and show the worklist
    Worklist(WorklistArgs),
    /// Store an auth token in the session file
    Login {
        #[arg(long)]
        token: String,
    },
    /// Forget the stored auth token
    Logout,
    /// Show the resolved session
    Session,
    /// Persist the filter sidebar preference
    Sidebar {
        /// Hide the filter sidebar above the table
        #[arg(long, action = clap::ArgAction::Set)]
        collapsed: bool,
    },
}

#[derive(Args)]
struct WorklistArgs {
    /// Free-text search over order ID, patient name, patient code and order code
    #[arg(short, long)]
    search: Option<String>,

    /// Show only these kinds (assignment, review)
    #[arg(long = "kind", value_delimiter = ',')]
    kinds: Vec<String>,

    /// Show only these item types (lab_order, sample, report)
    #[arg(long = "type", value_delimiter = ',')]
    item_types: Vec<String>,

    /// Show only these statuses; replaces the default that hides completed items
    #[arg(long = "status", value_delimiter = ',')]
    statuses: Vec<String>,

    /// Show every status, including completed ones
    #[arg(long, conflicts_with = "statuses")]
    all_statuses: bool,

    /// Show only these patient IDs
    #[arg(long = "patient", value_delimiter = ',')]
    patients: Vec<String>,

    #[arg(long, value_enum)]
    sort: Option<SortArg>,

    /// Sort descending
    #[arg(long, requires = "sort")]
    desc: bool,

    /// Display language (es, en); overrides LAB_LOCALE
    #[arg(long)]
    locale: Option<Locale>,

    /// Output rows as JSON
    #[arg(long)]
    json: bool,

    /// Kind filter sent to the server
    #[arg(long)]
    fetch_kind: Option<String>,

    /// Item type filter sent to the server
    #[arg(long)]
    fetch_type: Option<String>,

    /// Status filter sent to the server
    #[arg(long)]
    fetch_status: Option<String>,

    #[arg(long)]
    page: Option<u32>,

    #[arg(long)]
    page_size: Option<u32>,

    /// Follow `has_more` and load every page
    #[arg(long, conflicts_with = "page")]
    all_pages: bool,

    /// Print the link of a visible item instead of the table
    #[arg(long, value_name = "ID")]
    open: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Date,
    Patient,
    Id,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Date => SortKey::AssignedAt,
            SortArg::Patient => SortKey::PatientName,
            SortArg::Id => SortKey::DisplayId,
        }
    }
}

/// Main entry point for lab-console
///
/// # Environment Variables
/// - `LAB_API_URL`: backend base URL (default: "http://localhost:8000")
/// - `LAB_API_TOKEN`: bearer token; wins over the token stored by `login`
/// - `LAB_LOCALE`: display language, `es` or `en` (default: "es")
/// - `LAB_SESSION_FILE`: session file path (default: ".lab-session.yaml")
#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let rust_log = std::env::var("RUST_LOG").ok();
    tracing_subscriber::registry()
        .with(log_filter(rust_log.as_deref(), cli.verbose)?)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let store = session_store(cli.session_file);

    match cli.command {
        Commands::Worklist(args) => {
            let config = resolve_config(&store)?;
            run_worklist(&config, args).await?;
        }
        Commands::Login { token } => {
            let token = NonEmptyText::new(&token).context("token cannot be empty")?;
            store.update(|session| session.token = Some(token))?;
            println!("Token saved to {}", store.path().display());
        }
        Commands::Logout => {
            let session = store.update(|session| session.token = None)?;
            if session == PersistedSession::default() {
                store.clear()?;
            }
            println!("Signed out");
        }
        Commands::Session => {
            let config = resolve_config(&store)?;
            let token = config
                .token()
                .map(|t| output::mask_token(t.as_str()))
                .unwrap_or_else(|| "(none)".to_string());
            println!("API:          {}", config.api_base_url());
            println!("Token:        {token}");
            println!("Locale:       {}", config.locale());
            println!("Sidebar:      {}", sidebar_state(config.sidebar_collapsed()));
            println!("Session file: {}", store.path().display());
        }
        Commands::Sidebar { collapsed } => {
            store.update(|session| session.sidebar_collapsed = collapsed)?;
            println!("Sidebar {}", sidebar_state(collapsed));
        }
    }

    Ok(())
}

/// `RUST_LOG` is used as given unless it is unset or `--verbose` is passed; then the
/// workspace crates log at info (or debug).
fn log_filter(rust_log: Option<&str>, verbose: bool) -> Result<EnvFilter> {
    let mut filter = match rust_log.filter(|directives| !directives.trim().is_empty()) {
        Some(directives) if !verbose => return Ok(EnvFilter::try_new(directives)?),
        Some(directives) => EnvFilter::try_new(directives)?,
        None => EnvFilter::default(),
    };
    let level = if verbose { "debug" } else { "info" };
    for target in ["lab_console", "worklist_client", "worklist_core"] {
        filter = filter.add_directive(format!("{target}={level}").parse()?);
    }
    Ok(filter)
}

fn sidebar_state(collapsed: bool) -> &'static str {
    if collapsed { "collapsed" } else { "expanded" }
}

fn session_store(path: Option<PathBuf>) -> SessionStore {
    let path = path
        .or_else(|| std::env::var_os("LAB_SESSION_FILE").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE));
    SessionStore::new(path)
}

/// Resolve the session from the environment and the session file.
fn resolve_config(store: &SessionStore) -> Result<SessionConfig> {
    let base_url = std::env::var("LAB_API_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.into());
    let token = NonEmptyText::from_optional(std::env::var("LAB_API_TOKEN").ok());
    let locale = match std::env::var("LAB_LOCALE") {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("invalid LAB_LOCALE '{raw}'"))?,
        Err(_) => Locale::default(),
    };

    let persisted = store
        .load()
        .with_context(|| format!("failed to load session file {}", store.path().display()))?;
    Ok(SessionConfig::new(&base_url, token, locale)?.with_persisted(&persisted))
}

async fn run_worklist(config: &SessionConfig, args: WorklistArgs) -> Result<()> {
    let locale = args.locale.unwrap_or(config.locale());
    let client = WorklistClient::new(config)?;
    let query = WorklistQuery {
        kind: args.fetch_kind,
        item_type: args.fetch_type,
        status: args.fetch_status,
        page: args.page,
        page_size: args.page_size,
    };

    let mut view = WorklistView::new(locale);
    if args.all_pages {
        let ticket = view.begin_fetch();
        let outcome = client.fetch_all(&query).await;
        view.complete_fetch(ticket, outcome);
    } else {
        refresh(&mut view, &client, &query).await;
    }

    if let LoadState::Failed { message } = view.state() {
        let lead = match locale {
            Locale::Es => "no se pudo cargar la lista de trabajo",
            Locale::En => "could not load the worklist",
        };
        anyhow::bail!("{lead}: {message}");
    }

    if let Some(search) = args.search {
        view.set_query(search);
    }
    if !args.kinds.is_empty() {
        view.select_kinds(args.kinds);
    }
    if !args.item_types.is_empty() {
        view.select_item_types(args.item_types);
    }
    if !args.patients.is_empty() {
        view.select_patients(args.patients);
    }
    if args.all_statuses {
        let every: Vec<String> = view
            .facets()
            .status_values()
            .into_iter()
            .map(str::to_string)
            .collect();
        view.select_statuses(every);
    } else if !args.statuses.is_empty() {
        view.select_statuses(args.statuses);
    }
    let order = if args.desc {
        SortOrder::Descending
    } else {
        SortOrder::Ascending
    };
    view.set_sort(args.sort.map(|key| SortSpec::new(key.into(), order)));

    if let Some(id) = args.open {
        let link = view
            .activate(&id)
            .with_context(|| format!("no visible worklist item with id '{id}'"))?;
        println!("{link}");
        return Ok(());
    }

    let ctx = RenderContext::new(Utc::now(), locale, *Local::now().offset());
    let rows = view.visible_rows(&ctx);
    let summary = view.summary();
    tracing::debug!(
        "{} items loaded, {} visible",
        summary.loaded,
        summary.visible
    );

    if args.json {
        println!(
            "{}",
            output::format_json(&rows, summary, view.page_meta(), locale)
        );
    } else {
        if !config.sidebar_collapsed() && !view.items().is_empty() {
            println!(
                "{}",
                output::format_sidebar(view.facets(), &view.status_selection(), locale)
            );
        }
        println!("{}", output::format_human(&rows, summary, locale));
    }

    Ok(())
}
