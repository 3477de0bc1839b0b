//! sky-stream - Poll the timeline and print new posts as they arrive

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use libskyline::{
    Config, ConfigError, ConsolePresenter, Result, SkylineError, SyncEngine, TimelineSource,
    XrpcClient,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "sky-stream")]
#[command(version)]
#[command(about = "Poll the Bluesky timeline and print new posts")]
#[command(long_about = "\
sky-stream - Poll the Bluesky timeline and print new posts

DESCRIPTION:
    sky-stream fetches the most recent timeline page on a fixed interval
    and prints only the posts that have not been shown yet. Reshares of
    the same post are printed once per run, however often they reappear.

    Posts go to stdout in `name: text (url)` form; logs go to stderr.

USAGE:
    # Poll every 10 seconds (the default)
    sky-stream

    # Poll every two minutes, requesting 25 posts per page
    sky-stream --interval 2m --limit 25

SIGNALS:
    SIGTERM, SIGINT - Graceful shutdown

CONFIGURATION:
    Configuration file: ~/.config/skyline/config.toml (SKYLINE_CONFIG
    overrides the path). Credentials come from SKYLINE_IDENTIFIER and
    SKYLINE_APP_PASSWORD or from the [credentials] section.

    [stream]
    interval_secs = 10  # seconds between polls
    limit = 10          # page size per poll

EXIT CODES:
    0 - Clean shutdown
    1 - Runtime or configuration error
    2 - Authentication error
    3 - Invalid input
")]
struct Cli {
    /// How often to poll the timeline (e.g. "10s", "2m")
    #[arg(long, value_name = "DURATION")]
    interval: Option<humantime::Duration>,

    /// Page size requested per poll
    #[arg(long, value_name = "COUNT")]
    limit: Option<u32>,

    /// Enable verbose logging to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Run a single poll cycle and exit (for testing)
    #[arg(long, hide = true)]
    once: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    libskyline::logging::init(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Reject a zero interval before any network or config work happens
    let flag_interval = cli.interval.map(Duration::from);
    if flag_interval.is_some_and(|d| d.is_zero()) {
        return Err(ConfigError::InvalidValue {
            field: "interval".to_string(),
            reason: "poll interval must be positive".to_string(),
        }
        .into());
    }

    let config = Config::load()?;
    let credentials = config.credentials()?;

    let interval =
        flag_interval.unwrap_or_else(|| Duration::from_secs(config.stream.interval_secs));
    let limit = cli.limit.unwrap_or(config.stream.limit);

    let mut client = XrpcClient::new(&config.service.url);
    client.login(&credentials).await?;
    info!("session established, streaming timeline");

    let shutdown = Arc::new(AtomicBool::new(false));
    setup_signal_handlers(shutdown.clone())?;

    let source = TimelineSource::new(client, limit);
    let mut engine = SyncEngine::new(source, ConsolePresenter::from_env());

    if cli.once {
        engine.run_once().await?;
    } else {
        info!("poll interval: {:?}", interval);
        engine.run(interval, shutdown).await?;
    }

    info!("sky-stream stopped");
    Ok(())
}

/// Set up signal handlers for graceful shutdown
fn setup_signal_handlers(shutdown: Arc<AtomicBool>) -> Result<()> {
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals = Signals::new([SIGINT, SIGTERM])
        .map_err(|e| SkylineError::InvalidInput(format!("Signal setup failed: {}", e)))?;

    let shutdown_clone = shutdown.clone();
    std::thread::spawn(move || {
        for sig in signals.forever() {
            match sig {
                SIGTERM | SIGINT => {
                    info!("Received shutdown signal, stopping gracefully...");
                    shutdown_clone.store(true, Ordering::Relaxed);
                    break;
                }
                _ => {}
            }
        }
    });

    Ok(())
}
