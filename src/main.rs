use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use my_prs::github::FetchError;
use my_prs::snapshot::FileSnapshotStore;

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_NETWORK: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Parser, Debug)]
#[command(name = "my-prs")]
#[command(about = "xbar plugin: your open pull requests and what changed since the last poll", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging (to stderr)
    #[arg(short, long)]
    verbose: bool,

    /// Path to config file (defaults to ~/.xbar-github.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to the snapshot kept between runs (defaults to the user cache dir)
    #[arg(short, long)]
    snapshot: Option<PathBuf>,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("my_prs=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for rustls 0.23+)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let cli = Cli::parse();
    init_logging(cli.verbose);
    let start_time = Instant::now();

    let config = match my_prs::config::load_config(cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };
    debug!(username = %config.username, "loaded config");

    let client = match my_prs::github::create_client(&config.token) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to create GitHub client: {:#}", e);
            std::process::exit(EXIT_NETWORK);
        }
    };

    let store = cli
        .snapshot
        .map(FileSnapshotStore::new)
        .unwrap_or_default();
    debug!(path = %store.path().display(), "using snapshot store");

    match my_prs::run::run(&client, &config, &store).await {
        Ok(report) => println!("{}", report),
        Err(e) if FetchError::is_timeout(&e) => {
            debug!(error = %e, "search timed out");
            println!(
                "{}",
                my_prs::output::format_error("timed out", my_prs::output::should_use_colors())
            );
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(EXIT_NETWORK);
        }
    }

    debug!(elapsed = ?start_time.elapsed(), "done");
    std::process::exit(EXIT_SUCCESS);
}
