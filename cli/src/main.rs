use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use bookstore_core::{OutputFormat, Presenter, SearchOutcome, WriterPresenter};
use bookstore_db::SearchConfig;
use bookstore_sqlite::{BookSearch, ErrorKind, SearchError, SearchService};
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const PROMPT: &str = "Enter a search term for book titles: ";

/// Exit status for query, config and output failures.
const EXIT_FAILURE: i32 = 1;
/// Exit status when the database cannot be reached.
const EXIT_CONNECTION: i32 = 2;

#[derive(Debug, Parser)]
#[command(name = "book-search")]
#[command(about = "Free-text title search over a bookstore database")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
    #[command(flatten)]
    search: SearchArgs,
    /// Increase log verbosity (-v info, -vv debug). Logs go to stderr.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Search book titles (the default when no subcommand is given).
    Search(SearchArgs),
    /// Write a default configuration file.
    InitConfig(InitConfigArgs),
}

#[derive(Debug, Args)]
struct SearchArgs {
    /// Text to look for in titles. Prompted for on stdin when omitted.
    ///
    /// A term spelled like a subcommand (`search`, `init-config`, `help`)
    /// is taken as that subcommand; write `book-search search -- search`
    /// to look it up as a title.
    query: Option<String>,
    /// YAML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Database file path (overrides the config file).
    #[arg(long)]
    db: Option<PathBuf>,
    /// Table prefix (overrides the config file).
    #[arg(long)]
    prefix: Option<String>,
    /// Output format (overrides the config file).
    #[arg(long)]
    format: Option<OutputFormat>,
    /// Abort a search running longer than this many milliseconds; 0 disables.
    #[arg(long)]
    query_timeout_ms: Option<u64>,
}

#[derive(Debug, Args)]
struct InitConfigArgs {
    /// Where to write the configuration.
    path: PathBuf,
    /// Overwrite an existing file.
    #[arg(long)]
    force: bool,
}

/// A failed run: what to print and which status to exit with.
#[derive(Debug)]
struct Failure {
    code: i32,
    message: String,
}

impl Failure {
    fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<SearchError> for Failure {
    fn from(err: SearchError) -> Self {
        let code = match err.kind() {
            ErrorKind::Connection => EXIT_CONNECTION,
            ErrorKind::Query | ErrorKind::Config => EXIT_FAILURE,
        };
        Self::new(code, err.to_string())
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Some(Command::Search(args)) => run_search(args),
        Some(Command::InitConfig(args)) => run_init_config(args),
        None => run_search(cli.search),
    };

    if let Err(failure) = result {
        eprintln!("error: {}", failure.message);
        std::process::exit(failure.code);
    }
}

/// Installs the stderr log subscriber.
///
/// `-v` flags take precedence over `RUST_LOG`; without them `RUST_LOG` is
/// honored and the default is `warn`.
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

// ---------------------------------------------------------------------------
// search command
// ---------------------------------------------------------------------------

fn run_search(args: SearchArgs) -> Result<(), Failure> {
    let config = resolve_config(&args)?;

    let query = match args.query {
        Some(query) => query,
        None => read_query(io::stdin().lock(), io::stderr())
            .map_err(|e| Failure::new(EXIT_FAILURE, format!("failed to read query: {e}")))?,
    };

    let service = SearchService::open(&config.database)?;
    let mut presenter = WriterPresenter::new(io::stdout().lock(), config.output.format);
    let outcome = search_and_present(&service, &query, &mut presenter)?;
    info!(query = %query, rows = outcome.len(), "search complete");

    service.close()?;
    Ok(())
}

/// Loads the config file (if any) and applies command-line overrides.
fn resolve_config(args: &SearchArgs) -> Result<SearchConfig, Failure> {
    let mut config = match &args.config {
        Some(path) => SearchConfig::load(path).map_err(|e| {
            Failure::new(
                EXIT_FAILURE,
                format!("failed to load config '{}': {e}", path.display()),
            )
        })?,
        None => SearchConfig::default(),
    };

    if let Some(db) = &args.db {
        config.database.path = db.clone();
    }
    if let Some(prefix) = &args.prefix {
        config.database.table_prefix = prefix.clone();
    }
    if let Some(format) = args.format {
        config.output.format = format;
    }
    if let Some(ms) = args.query_timeout_ms {
        config.database.query_timeout_ms = Some(ms);
    }

    config
        .validate()
        .map_err(|e| Failure::new(EXIT_FAILURE, e.to_string()))?;
    debug!(?config, "resolved configuration");
    Ok(config)
}

/// Prompts once and reads a single line. EOF yields an empty query.
fn read_query(mut input: impl BufRead, mut prompt: impl Write) -> io::Result<String> {
    prompt.write_all(PROMPT.as_bytes())?;
    prompt.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let trimmed = line.strip_suffix('\n').unwrap_or(&line);
    let trimmed = trimmed.strip_suffix('\r').unwrap_or(trimmed);
    Ok(trimmed.to_string())
}

/// Runs one search and hands the finished outcome to the presenter.
fn search_and_present(
    search: &impl BookSearch,
    query: &str,
    presenter: &mut impl Presenter,
) -> Result<SearchOutcome, Failure> {
    let outcome = search.search(query)?;
    presenter
        .present(query, &outcome)
        .map_err(|e| Failure::new(EXIT_FAILURE, format!("failed to write results: {e}")))?;
    Ok(outcome)
}

// ---------------------------------------------------------------------------
// init-config command
// ---------------------------------------------------------------------------

fn run_init_config(args: InitConfigArgs) -> Result<(), Failure> {
    if args.path.exists() && !args.force {
        return Err(Failure::new(
            EXIT_FAILURE,
            format!(
                "'{}' already exists (use --force to overwrite)",
                args.path.display()
            ),
        ));
    }
    SearchConfig::default().save(&args.path).map_err(|e| {
        Failure::new(
            EXIT_FAILURE,
            format!("failed to write config '{}': {e}", args.path.display()),
        )
    })?;
    println!("Wrote default configuration to '{}'.", args.path.display());
    Ok(())
}
