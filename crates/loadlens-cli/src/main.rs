use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use loadlens_cli::{OutputFormat, commands};
use loadlens_core::analysis::DEFAULT_TOP_FLOWS;
use std::path::PathBuf;

/// Exit status for a run that fails its score thresholds
const EXIT_SCORE_FAILED: i32 = 2;

#[derive(Parser)]
#[command(name = "loadlens")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "A CLI viewer for load-test JSON results files",
    long_about = "loadlens reads a load-testing tool's JSON results file and derives the metrics \
                  a dashboard shows: summary cards, per-interval time series, breakdown tables, \
                  and an Apdex score with a pass/fail verdict."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(
        short,
        long,
        global = true,
        value_enum,
        default_value = "pretty",
        env = "LOADLENS_FORMAT"
    )]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Display summary cards (requests, VUs, latency, score)
    Summary {
        /// Path to the results file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Display per-interval time series
    Series {
        /// Path to the results file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Highlight a row and show its details
        #[arg(long, value_name = "INDEX")]
        highlight: Option<usize>,

        /// Only show the first N rows
        #[arg(long, value_name = "N")]
        limit: Option<usize>,
    },

    /// Display endpoint, status code, flow, error and latency breakdowns
    Breakdown {
        /// Path to the results file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Number of flows to keep in the flow breakdown
        #[arg(long, default_value_t = DEFAULT_TOP_FLOWS)]
        top: usize,

        /// Path prefix to group as `<prefix>[id]` (repeatable, default /chat/)
        #[arg(long, value_name = "PREFIX")]
        collapse: Vec<String>,
    },

    /// Display the Apdex rating and pass/fail verdict
    Score {
        /// Path to the results file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Exit with status 2 when the run fails
        #[arg(long)]
        exit_code: bool,
    },

    /// Display every view at once
    Report {
        /// Path to the results file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Number of flows to keep in the flow breakdown
        #[arg(long, default_value_t = DEFAULT_TOP_FLOWS)]
        top: usize,

        /// Path prefix to group as `<prefix>[id]` (repeatable, default /chat/)
        #[arg(long, value_name = "PREFIX")]
        collapse: Vec<String>,
    },

    /// Generate shell completion scripts
    #[command(after_long_help = COMPLETION_HELP)]
    Completion {
        /// Shell to generate completions for
        #[arg(long, value_enum)]
        shell: Shell,
    },
}

const COMPLETION_HELP: &str = "\
SUPPORTED SHELLS:
    bash, zsh, fish, powershell, elvish

INSTALLATION:
    bash:  loadlens completion --shell bash >> ~/.bashrc
    zsh:   loadlens completion --shell zsh > ~/.zfunc/_loadlens
           (add `fpath=(~/.zfunc $fpath)` to ~/.zshrc)
    fish:  loadlens completion --shell fish > ~/.config/fish/completions/loadlens.fish";

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);
    tracing::debug!("Output format: {}", cli.format.as_str());

    // Execute the command
    match cli.command {
        Commands::Summary { file } => commands::summary::execute(&file, cli.format),
        Commands::Series {
            file,
            highlight,
            limit,
        } => commands::series::execute(&file, highlight, limit, cli.format),
        Commands::Breakdown {
            file,
            top,
            collapse,
        } => commands::breakdown::execute(&file, top, collapse, cli.format),
        Commands::Score { file, exit_code } => {
            let passed = commands::score::execute(&file, cli.format)?;
            if exit_code && !passed {
                std::process::exit(EXIT_SCORE_FAILED);
            }
            Ok(())
        }
        Commands::Report {
            file,
            top,
            collapse,
        } => commands::report::execute(&file, top, collapse, cli.format),
        Commands::Completion { shell } => {
            commands::completion::execute(shell, &mut Cli::command())
        }
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("loadlens=debug,loadlens_cli=debug,loadlens_core=debug")
    } else {
        EnvFilter::new("loadlens=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}
