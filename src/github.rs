use crate::error::{PortfolioError, Result};
use crate::models::RateLimitState;
use crate::types::{CommitActivityWeek, GitHubRepo, GitHubUser, LanguageBytes};
use chrono::{DateTime, Utc};
use reqwest::header::ACCEPT;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

pub const API_BASE_URL: &str = "https://api.github.com";
/// The REST API never returns more than this many items per page.
pub const MAX_PER_PAGE: u32 = 100;
const LOW_RATE_LIMIT: u32 = 10;

pub struct GitHubClient {
    client: Client,
    token: Option<String>,
    base_url: Url,
}

impl GitHubClient {
    pub fn new(token: Option<String>) -> Result<Self> {
        Self::with_base_url(token, API_BASE_URL)
    }

    /// Build a client against a different API root (GitHub Enterprise, or a
    /// local stand-in during tests).
    pub fn with_base_url(token: Option<String>, base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("portfolio-server/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()?;

        let mut base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(PortfolioError::ApiError(format!(
                "API base URL cannot carry paths: {}",
                base_url
            )));
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let token = token.filter(|t| !t.trim().is_empty());

        Ok(GitHubClient {
            client,
            token,
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| PortfolioError::ApiError(format!("Invalid API base URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Issue a single GET. There is no retry and no waiting on rate limits:
    /// every non-success status is returned to the caller as an error.
    async fn make_request(&self, url: Url) -> Result<Response> {
        let mut request = self
            .client
            .get(url.clone())
            .header(ACCEPT, "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let rate_limit = self.get_rate_limit_state(&response);

        if rate_limit.remaining < LOW_RATE_LIMIT {
            warn!(
                remaining = rate_limit.remaining,
                reset = %rate_limit.reset_time,
                "GitHub rate limit low"
            );
        }

        match response.status() {
            StatusCode::ACCEPTED => Err(PortfolioError::StatsNotReady(format!(
                "Statistics still being computed: {}",
                url.path()
            ))),
            status if status.is_success() => {
                debug!(path = url.path(), %status, "GitHub request succeeded");
                Ok(response)
            }
            StatusCode::UNAUTHORIZED => Err(PortfolioError::Unauthorized(format!(
                "Bad or missing credentials for {}",
                url.path()
            ))),
            StatusCode::NOT_FOUND => Err(PortfolioError::NotFound(format!(
                "Resource not found: {}",
                url.path()
            ))),
            StatusCode::FORBIDDEN if rate_limit.is_limited => {
                Err(PortfolioError::RateLimitExceeded(format!(
                    "API rate limit exceeded. Reset at: {}",
                    rate_limit.reset_time
                )))
            }
            status => {
                let error_text = response.text().await.unwrap_or_default();
                Err(PortfolioError::ApiError(format!(
                    "API request failed with status {}: {}",
                    status, error_text
                )))
            }
        }
    }

    /// Rate limit state reported by a response. Missing headers are read as
    /// "not limited".
    pub fn get_rate_limit_state(&self, response: &Response) -> RateLimitState {
        let headers = response.headers();

        let limit = headers
            .get("X-RateLimit-Limit")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(5000);

        let remaining = headers
            .get("X-RateLimit-Remaining")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(limit);

        let reset = headers
            .get("X-RateLimit-Reset")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.parse::<i64>().ok())
            .and_then(|timestamp| DateTime::from_timestamp(timestamp, 0))
            .unwrap_or_else(|| Utc::now() + chrono::Duration::hours(1));

        RateLimitState {
            remaining,
            limit,
            reset_time: reset,
            is_limited: remaining == 0,
        }
    }

    /// `GET /user`
    pub async fn get_authenticated_user(&self) -> Result<GitHubUser> {
        let url = self.endpoint(&["user"])?;
        let response = self.make_request(url).await?;
        let user: GitHubUser = response.json().await?;
        Ok(user)
    }

    /// `GET /user/repos?per_page=N&sort=updated`. Only the first page is
    /// fetched.
    pub async fn list_repositories(&self, per_page: u32) -> Result<Vec<GitHubRepo>> {
        let per_page = per_page.clamp(1, MAX_PER_PAGE);
        let mut url = self.endpoint(&["user", "repos"])?;
        url.query_pairs_mut()
            .append_pair("per_page", &per_page.to_string())
            .append_pair("sort", "updated");

        let response = self.make_request(url).await?;
        let repos: Vec<GitHubRepo> = response.json().await?;
        Ok(repos)
    }

    /// `GET /repos/{owner}/{repo}/languages`
    pub async fn get_languages(&self, owner: &str, repo: &str) -> Result<LanguageBytes> {
        let url = self.endpoint(&["repos", owner, repo, "languages"])?;
        let response = self.make_request(url).await?;
        let languages: LanguageBytes = response.json().await?;
        Ok(languages)
    }

    /// `GET /repos/{owner}/{repo}/stats/commit_activity`
    ///
    /// A `202 Accepted` means GitHub is still computing the series and
    /// surfaces as [`PortfolioError::StatsNotReady`]. An empty repository
    /// answers `204 No Content`, which is an empty series.
    pub async fn get_commit_activity(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Vec<CommitActivityWeek>> {
        let url = self.endpoint(&["repos", owner, repo, "stats", "commit_activity"])?;
        let response = self.make_request(url).await?;
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(Vec::new());
        }
        let weeks: Vec<CommitActivityWeek> = response.json().await?;
        Ok(weeks)
    }
}
