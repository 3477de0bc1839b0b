//! sky-search - Search Bluesky posts by keyword

use clap::Parser;
use libskyline::{Config, ConsolePresenter, Presenter, Result, SkylineError, XrpcClient};
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "sky-search")]
#[command(version)]
#[command(about = "Search Bluesky posts by keyword", long_about = None)]
struct Cli {
    /// Search term
    query: String,

    /// Maximum number of results
    #[arg(short, long, value_name = "COUNT", default_value_t = 25)]
    limit: u32,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
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
    if cli.query.trim().is_empty() {
        return Err(SkylineError::InvalidInput(
            "search term cannot be empty".to_string(),
        ));
    }

    let config = Config::load()?;
    let credentials = config.credentials()?;

    let mut client = XrpcClient::new(&config.service.url);
    client.login(&credentials).await?;

    let results = client.search_posts(&cli.query, cli.limit).await?;
    debug!(count = results.len(), "search returned");

    let mut presenter = ConsolePresenter::from_env();
    for post in &results {
        presenter.display(post);
    }

    Ok(())
}
