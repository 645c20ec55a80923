mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod services;
mod workflow;

use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing::{Level, debug, warn};
use tracing_subscriber::EnvFilter;

use crate::cmd::attach::AttachArgs;
use crate::cmd::comment::CommentArgs;
use crate::cmd::config::{self as config_cmd, ConfigArgs};
use crate::cmd::create::CreateArgs;
use crate::cmd::log::LogArgs;
use crate::cmd::search::SearchArgs;
use crate::cmd::show::ShowArgs;
use crate::config::{AppConfig, ConfigOverrides};
use crate::context::AppContext;
use crate::error::AppResult;
use crate::infra::jira::JiraClient;

#[derive(Parser)]
#[command(
    name = "jirac",
    author,
    version,
    about = "Command-line client for Jira issues, comments and time logs"
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalArgs {
    /// Jira server host name or base URL.
    #[arg(long, global = true)]
    server: Option<String>,
    /// User for basic authentication.
    #[arg(long, global = true)]
    user: Option<String>,
    /// Password or API token for basic authentication.
    #[arg(long, global = true)]
    password: Option<String>,
    /// Project name or key to work in.
    #[arg(short = 'P', long, global = true)]
    project: Option<String>,
    /// Skip TLS certificate validation.
    #[arg(long, global = true)]
    no_check_ssl: bool,
    /// Log requests and decoding details.
    #[arg(short, long, global = true)]
    verbose: bool,
}

impl From<GlobalArgs> for ConfigOverrides {
    fn from(args: GlobalArgs) -> Self {
        Self {
            server: args.server,
            user: args.user,
            password: args.password,
            project: args.project,
            no_check_ssl: args.no_check_ssl,
            verbose: args.verbose,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create a task or subtask in the current project.
    Create(CreateArgs),
    /// Report time logged per day, or log time on an issue.
    Log(LogArgs),
    /// Search issues of the current project.
    Search(SearchArgs),
    /// Show a single issue with its files and comments.
    Show(ShowArgs),
    /// Add or delete comments.
    Comment(CommentArgs),
    /// Upload or remove attachments.
    Attach(AttachArgs),
    /// Manage CLI configuration.
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    dispatch(cli.global.into(), cli.command).await
}

fn init_tracing(verbose: bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(rust_log.as_deref(), verbose))
        .with_writer(std::io::stderr)
        .init();
}

/// `RUST_LOG` wins over both the default `warn` level and `-v`.
fn env_filter(rust_log: Option<&str>, verbose: bool) -> EnvFilter {
    match rust_log.map(str::trim).filter(|directives| !directives.is_empty()) {
        Some(directives) => EnvFilter::new(directives),
        None => {
            let level = if verbose { Level::DEBUG } else { Level::WARN };
            EnvFilter::default().add_directive(level.into())
        }
    }
}

fn build_context(overrides: ConfigOverrides) -> AppResult<AppContext> {
    let config = AppConfig::load(overrides)?;
    if config.verbose {
        debug!(
            server = ?config.base_url(),
            user = ?config.user,
            project = ?config.project,
            no_check_ssl = config.no_check_ssl,
            "resolved configuration"
        );
    }

    if config.server.is_none() {
        warn!("Jira server not configured; run `jirac config init` or pass --server.");
    }
    if config.user.is_none() || config.password.is_none() {
        warn!("Jira credentials not configured; requests will fail.");
    }
    if config.project.is_none() {
        warn!("No project configured; create and log reports need -P/--project.");
    }

    let issue_tracker = Arc::new(JiraClient::new(&config)?);
    Ok(AppContext::new(config, issue_tracker))
}

/// Every command except `config` needs a configured client.
async fn dispatch(overrides: ConfigOverrides, command: Commands) -> AppResult<()> {
    match command {
        Commands::Config(args) => config_cmd::run(args.command),
        Commands::Create(args) => cmd::create::run(&build_context(overrides)?, args).await,
        Commands::Log(args) => cmd::log::run(&build_context(overrides)?, args).await,
        Commands::Search(args) => cmd::search::run(&build_context(overrides)?, args).await,
        Commands::Show(args) => cmd::show::run(&build_context(overrides)?, args).await,
        Commands::Comment(args) => cmd::comment::run(&build_context(overrides)?, args).await,
        Commands::Attach(args) => cmd::attach::run(&build_context(overrides)?, args).await,
    }
}
