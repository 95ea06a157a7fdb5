mod cli;

use anyhow::Context;
use clap::Parser;
use cli::Cli;
use colored::*;
use portfolio_server::aggregator::{fetch_snapshot, AggregatorConfig};
use portfolio_server::content::PortfolioContent;
use portfolio_server::github::GitHubClient;
use portfolio_server::models::Snapshot;
use portfolio_server::server::{start_server, AppState};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    if cli.github_token.is_none() {
        warn!("GITHUB_TOKEN is not set; every GitHub call will fail and pages render empty");
    }

    let client = GitHubClient::with_base_url(cli.github_token.clone(), &cli.api_url)
        .context("Failed to build GitHub client")?;

    let content = match &cli.content {
        Some(path) => PortfolioContent::load(path)
            .with_context(|| format!("Failed to load content file {}", path.display()))?,
        None => PortfolioContent::default(),
    };

    let aggregator = AggregatorConfig::new(cli.repos_per_page);

    if cli.print {
        let snapshot = fetch_snapshot(&client, &aggregator).await;
        print_summary(&snapshot);
        return Ok(());
    }

    println!("{}", "Portfolio Server".bold().green());
    println!("{}\n", "=".repeat(50).dimmed());

    let app_state = AppState {
        client: Arc::new(client),
        aggregator,
        content: Arc::new(content),
        page_size: cli.page_size.max(1),
        start_time: Instant::now(),
    };

    let addr = SocketAddr::new(cli.bind, cli.port);
    println!("📡 Serving portfolio on http://{}", addr);
    println!("\nPress Ctrl+C to stop the server\n");

    tokio::select! {
        result = start_server(app_state, addr) => {
            result.context("HTTP server failed")?;
        }
        _ = tokio::signal::ctrl_c() => {
            println!("\n🛑 Shutting down server...");
        }
    }

    Ok(())
}

fn print_summary(snapshot: &Snapshot) {
    let Some(identity) = &snapshot.identity else {
        println!("{}", "No GitHub identity available (check GITHUB_TOKEN)".red());
        return;
    };

    println!(
        "{} ({})",
        identity.name.as_deref().unwrap_or(identity.login.as_str()).bold().green(),
        identity.login.dimmed()
    );
    println!("{}", "=".repeat(50).dimmed());
    println!("Repositories:  {}", snapshot.repositories.len());
    println!("Followers:     {}", identity.followers);
    println!("Following:     {}", identity.following);
    println!("Total commits: {}", snapshot.total_commits);

    let shares = snapshot.language_totals.shares();
    if !shares.is_empty() {
        println!("\n{}", "Languages".bold());
        for share in shares {
            println!("  {:<16} {:>6.1}%  {} bytes", share.language, share.percentage, share.bytes);
        }
    }
}
