//! Builds a [`Snapshot`] from the GitHub API.
//!
//! The identity call gates everything else. The repository list and the
//! per-repository sub-resources degrade to neutral values on failure, so a
//! single bad repository never poisons the totals.

use crate::error::PortfolioError;
use crate::github::{GitHubClient, MAX_PER_PAGE};
use crate::models::{LanguageTotals, Snapshot};
use crate::types::{CommitActivityWeek, GitHubRepo, LanguageBytes};
use chrono::Utc;
use futures::future::join_all;
use tracing::{error, info, warn};

#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// Size of the single repository page requested from `/user/repos`.
    pub repos_per_page: u32,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            repos_per_page: MAX_PER_PAGE,
        }
    }
}

impl AggregatorConfig {
    pub fn new(repos_per_page: u32) -> Self {
        Self {
            repos_per_page: repos_per_page.clamp(1, MAX_PER_PAGE),
        }
    }
}

/// Fetch identity, repositories and per-repository statistics, then fold
/// them into one snapshot. Never fails: an unreachable identity yields
/// [`Snapshot::empty`].
pub async fn fetch_snapshot(client: &GitHubClient, config: &AggregatorConfig) -> Snapshot {
    let identity = match client.get_authenticated_user().await {
        Ok(user) => user,
        Err(e) => {
            error!(error = %e, "Failed to fetch GitHub identity, returning empty snapshot");
            return Snapshot::empty();
        }
    };

    let repositories = match client.list_repositories(config.repos_per_page).await {
        Ok(repos) => repos,
        Err(e) => {
            warn!(login = %identity.login, error = %e, "Failed to list repositories, continuing without them");
            Vec::new()
        }
    };

    let login = identity.login.as_str();
    let (languages, commit_counts) = tokio::join!(
        join_all(
            repositories
                .iter()
                .map(|repo| fetch_languages(client, login, repo))
        ),
        join_all(
            repositories
                .iter()
                .map(|repo| fetch_commit_count(client, login, repo))
        ),
    );

    let language_totals = fold_language_totals(&languages);
    let total_commits = fold_commit_total(commit_counts);

    info!(
        login = %identity.login,
        repositories = repositories.len(),
        languages = language_totals.len(),
        total_commits,
        "Snapshot assembled"
    );

    Snapshot {
        identity: Some(identity),
        repositories,
        language_totals,
        total_commits,
        fetched_at: Utc::now(),
    }
}

/// Owner used in `/repos/{owner}/{repo}` paths. Repositories listed under
/// `/user/repos` may belong to organisations, so the listed owner wins over
/// the authenticated login.
pub fn repo_owner<'a>(repo: &'a GitHubRepo, login: &'a str) -> &'a str {
    repo.owner
        .as_ref()
        .map(|owner| owner.login.as_str())
        .unwrap_or(login)
}

async fn fetch_languages(client: &GitHubClient, login: &str, repo: &GitHubRepo) -> LanguageBytes {
    let owner = repo_owner(repo, login);
    match client.get_languages(owner, &repo.name).await {
        Ok(languages) => languages,
        Err(e) => {
            warn!(owner, repo = %repo.name, error = %e, "Failed to fetch languages, counting zero");
            LanguageBytes::new()
        }
    }
}

async fn fetch_commit_count(client: &GitHubClient, login: &str, repo: &GitHubRepo) -> u64 {
    let owner = repo_owner(repo, login);
    match client.get_commit_activity(owner, &repo.name).await {
        Ok(weeks) => weekly_total(&weeks),
        // Not retried: the repository contributes zero for this render.
        Err(PortfolioError::StatsNotReady(_)) => {
            info!(owner, repo = %repo.name, "Commit statistics still computing, counting zero");
            0
        }
        Err(e) => {
            warn!(owner, repo = %repo.name, error = %e, "Failed to fetch commit activity, counting zero");
            0
        }
    }
}

/// Sum of the weekly totals of one commit-activity series.
pub fn weekly_total(weeks: &[CommitActivityWeek]) -> u64 {
    weeks.iter().fold(0u64, |acc, week| acc.saturating_add(week.total))
}

/// Merge per-repository language maps into cumulative byte counts.
pub fn fold_language_totals<'a, I>(maps: I) -> LanguageTotals
where
    I: IntoIterator<Item = &'a LanguageBytes>,
{
    maps.into_iter()
        .fold(LanguageTotals::new(), |mut totals, languages| {
            totals.add(languages);
            totals
        })
}

/// Sum per-repository commit counts.
pub fn fold_commit_total<I>(counts: I) -> u64
where
    I: IntoIterator<Item = u64>,
{
    counts.into_iter().fold(0u64, u64::saturating_add)
}
