//! sky-post - Post to Bluesky from the command line

use std::io::Read;

use clap::Parser;
use libskyline::render::at_uri_to_url;
use libskyline::{Config, Result, SkylineError, XrpcClient};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "sky-post")]
#[command(version)]
#[command(about = "Post to Bluesky from the command line", long_about = None)]
struct Cli {
    /// Content to post (reads from stdin if not provided)
    content: Option<String>,

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
    let content = match cli.content {
        Some(content) => content,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| SkylineError::InvalidInput(format!("failed to read stdin: {}", e)))?;
            buffer
        }
    };

    let content = content.trim().to_string();
    if content.is_empty() {
        return Err(SkylineError::InvalidInput(
            "post content cannot be empty".to_string(),
        ));
    }

    let config = Config::load()?;
    let credentials = config.credentials()?;

    let mut client = XrpcClient::new(&config.service.url);
    client.login(&credentials).await?;

    let uri = client.create_post(&content).await?;
    info!(uri = %uri, "post created");
    println!("{}", at_uri_to_url(&uri));

    Ok(())
}
