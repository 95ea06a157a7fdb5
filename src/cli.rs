use clap::Parser;
use std::net::IpAddr;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "portfolio-server")]
#[command(about = "Portfolio Server - Renders a developer portfolio from live GitHub data")]
#[command(version)]
pub struct Cli {
    /// GitHub token used for every API call
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// GitHub REST API root
    #[arg(long, env = "GITHUB_API_URL", default_value = portfolio_server::github::API_BASE_URL)]
    pub api_url: String,

    /// Address to bind the HTTP server to
    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1")]
    pub bind: IpAddr,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// TOML file with headline, about text, skills and links
    #[arg(long, env = "PORTFOLIO_CONTENT")]
    pub content: Option<PathBuf>,

    /// Repositories shown per page of the project grid
    #[arg(long, env = "PAGE_SIZE", default_value_t = portfolio_server::view::DEFAULT_PAGE_SIZE)]
    pub page_size: usize,

    /// Repositories requested from GitHub (single page, at most 100)
    #[arg(long, env = "REPOS_PER_PAGE", default_value_t = portfolio_server::github::MAX_PER_PAGE,
          value_parser = clap::value_parser!(u32).range(1..=100))]
    pub repos_per_page: u32,

    /// Fetch one snapshot, print a summary and exit
    #[arg(long)]
    pub print: bool,
}
