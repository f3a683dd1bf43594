mod cli;

use gh_rest_mcp::http::GitHubClient;
use gh_rest_mcp::server::Server;
use gh_rest_mcp::Config;
use log::{info, warn};

#[tokio::main(flavor = "current_thread")] // one client, calls handled in order
async fn main() -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches();
    let opts = cli::CliOptions::from_matches(&matches);

    cli::init_logging(opts.log_level.as_deref());

    if opts.version {
        println!("gh-rest-mcp {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let mut builder = Config::builder();
    if let Some(url) = opts.api_url {
        builder = builder.api_url(url);
    }
    if let Some(rps) = opts.requests_per_second {
        builder = builder.requests_per_second(rps);
    }
    let client = builder
        .build()
        .map_err(gh_rest_mcp::Error::from)
        .and_then(GitHubClient::new);
    match &client {
        Ok(c) => info!(
            "GitHub API at {} ({} req/s)",
            c.config().api_url,
            c.config().requests_per_second
        ),
        Err(e) => warn!("GitHub client unavailable: {}", e),
    }

    Server::new(client).run_stdio().await
}
