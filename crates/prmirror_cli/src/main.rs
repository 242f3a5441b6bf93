//! prmirror CLI - mirror pull-request activity into a local database.

mod commands;
mod config;
mod progress;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "prmirror")]
#[command(version)]
#[command(about = "An incremental pull-request activity mirror")]
#[command(
    long_about = "prmirror ingests pull requests, comments, review comments, commits, and \
lifecycle events from GitHub into a local relational database. Runs are \
incremental: each scan resumes from the last synchronized update instant \
and re-running against unchanged remote state writes nothing."
)]
#[command(after_long_help = r#"EXAMPLES
    Mirror every repository of an organization:
        $ prmirror sync octo-org

    Mirror a single repository:
        $ prmirror sync octo-org --repo widgets

    Resume from an explicit cursor, freshest activity first:
        $ prmirror sync octo-org --repo widgets --since 2025-03-01T00:00:00Z --newest

    Run migrations against a specific database:
        $ prmirror migrate up --database-url sqlite:///tmp/prmirror.db?mode=rwc

EXIT STATUS
    0   success
    2   configuration error (unknown owner/repository, invalid flags)
    3   remote abort (authentication failure or rate limit; resume later
        with the same command - the cursor only advances on flushed batches)
    1   any other failure

CONFIGURATION
    prmirror reads configuration from:
      1. ~/.config/prmirror/config.toml (or $XDG_CONFIG_HOME/prmirror/config.toml)
      2. ./prmirror.toml
      3. Environment variables (PRMIRROR_* prefix), .env file in the
         current directory

ENVIRONMENT VARIABLES
    PRMIRROR_DATABASE_URL   Database connection string
                            (default: sqlite://~/.local/state/prmirror/prmirror.db)
    PRMIRROR_GITHUB_TOKEN   GitHub personal access token
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mirror pull-request activity for an owner or a single repository
    Sync {
        /// Account (user or organization) owning the repositories
        owner: String,

        /// Single repository to scan; default is every repository of the owner
        #[arg(short, long)]
        repo: Option<String>,

        /// GitHub personal access token (default from config or
        /// PRMIRROR_GITHUB_TOKEN)
        #[arg(short, long)]
        token: Option<String>,

        /// Cursor override as an RFC 3339 instant, e.g. 2025-03-01T00:00:00Z
        #[arg(long)]
        since: Option<String>,

        /// Scan in descending update order, freshest activity first
        #[arg(long)]
        newest: bool,

        /// Pull requests per checkpoint batch
        #[arg(short = 'b', long)]
        batch_size: Option<usize>,

        /// Database URL override
        #[arg(long)]
        database_url: Option<String>,
    },
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,

        /// Database URL override
        #[arg(long)]
        database_url: Option<String>,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum MigrateAction {
    /// Apply all pending migrations
    Up,
    /// Rollback the last migration
    Down,
    /// Show migration status
    Status,
    /// Fresh install - drop all tables and reapply migrations
    Fresh,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("prmirror=info,prmirror_cli=info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let config = config::Config::load();
    let cli = Cli::parse();

    if let Err(err) = run(cli, &config).await {
        tracing::error!(error = %err, "prmirror failed");
        std::process::exit(commands::exit_code(&err));
    }
}

async fn run(cli: Cli, config: &config::Config) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Sync {
            owner,
            repo,
            token,
            since,
            newest,
            batch_size,
            database_url,
        } => {
            commands::sync::handle_sync(
                commands::sync::SyncArgs {
                    owner,
                    repo,
                    token,
                    since,
                    newest,
                    batch_size,
                    database_url,
                },
                config,
            )
            .await
        }
        Commands::Migrate {
            action,
            database_url,
        } => commands::migrate::handle_migrate(action, database_url, config).await,
        Commands::Completions { shell } => commands::meta::handle_completions(shell),
    }
}
