//! # normanpd CLI
//!
//! Processes Norman PD daily incident PDFs into the `incidents` table and
//! serves the web interface.
//!
//! ## Usage
//!
//! ```bash
//! normanpd --config ./config/normanpd.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `normanpd init` | Create the SQLite database and the incidents table |
//! | `normanpd ingest <FILES>...` | Process local PDFs, replacing stored incidents |
//! | `normanpd fetch <URLS>...` | Download and process PDFs, replacing stored incidents |
//! | `normanpd parse <FILE>` | Print the records a PDF yields without storing them |
//! | `normanpd list` | Print stored incidents |
//! | `normanpd stats` | Incident counts per nature |
//! | `normanpd render <KIND>` | Write a chart (`clustering`, `bargraph`, `custom`) |
//! | `normanpd serve` | Start the HTTP server |

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use normanpd::viz::VizKind;
use normanpd::{config, ingest, list, migrate, server, stats, viz};

/// normanpd: Norman PD incident report extraction.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. When the file does not exist built-in defaults are used.
#[derive(Parser)]
#[command(
    name = "normanpd",
    about = "Extract incident records from Norman PD daily incident PDFs",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/normanpd.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Creates the SQLite database file and the `incidents` table.
    /// Running it multiple times is safe.
    Init,

    /// Process local PDF files.
    ///
    /// Files are processed in the order given. The stored incidents are
    /// replaced by the records of this batch.
    Ingest {
        /// PDF files to process.
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Download and process PDFs by URL.
    ///
    /// The first URL that fails aborts the command and leaves the stored
    /// incidents untouched.
    Fetch {
        /// Report URLs.
        #[arg(required = true)]
        urls: Vec<String>,
    },

    /// Print the records a PDF would produce, without storing them.
    Parse {
        /// PDF file to parse.
        file: PathBuf,
    },

    /// Print stored incidents.
    List {
        /// Maximum number of records to print.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show incident counts per nature.
    Stats,

    /// Render a chart of the stored incidents as an HTML fragment.
    Render {
        /// Chart kind.
        kind: ChartArg,

        /// Output file; prints to stdout when omitted.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Start the HTTP server.
    ///
    /// Binds to `[server].bind` and serves the upload, URL processing and
    /// visualization endpoints.
    Serve,
}

#[derive(Clone, Copy, ValueEnum)]
enum ChartArg {
    Clustering,
    Bargraph,
    Custom,
}

impl From<ChartArg> for VizKind {
    fn from(arg: ChartArg) -> Self {
        match arg {
            ChartArg::Clustering => VizKind::Clustering,
            ChartArg::Bargraph => VizKind::BarGraph,
            ChartArg::Custom => VizKind::Custom,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config_or_default(&cli.config)?;

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Ingest { files } => {
            ingest::run_ingest(&cfg, &files).await?;
        }
        Commands::Fetch { urls } => {
            ingest::run_fetch(&cfg, &urls).await?;
        }
        Commands::Parse { file } => {
            ingest::run_parse(&cfg, &file).await?;
        }
        Commands::List { limit } => {
            list::run_list(&cfg, limit).await?;
        }
        Commands::Stats => {
            stats::run_stats(&cfg).await?;
        }
        Commands::Render { kind, out } => {
            viz::run_render(&cfg, kind.into(), out.as_deref()).await?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}
