//! sky-feed - Print the latest posts from the timeline

use clap::Parser;
use libskyline::{Config, ConsolePresenter, Presenter, Result, XrpcClient};
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "sky-feed")]
#[command(version)]
#[command(about = "Print the latest posts from your Bluesky timeline", long_about = None)]
struct Cli {
    /// Number of posts to fetch
    #[arg(short, long, value_name = "COUNT", default_value_t = 10)]
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
    let config = Config::load()?;
    let credentials = config.credentials()?;

    let mut client = XrpcClient::new(&config.service.url);
    client.login(&credentials).await?;

    let page = client.get_timeline(cli.limit).await?;
    debug!(count = page.len(), "fetched timeline page");

    let mut presenter = ConsolePresenter::from_env().numbered();
    for post in &page {
        presenter.display(post);
    }

    Ok(())
}
