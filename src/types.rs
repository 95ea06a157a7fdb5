use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// GitHub API response structures

/// The authenticated account (`GET /user`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GitHubUser {
    pub login: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    pub html_url: String,
    #[serde(default)]
    pub public_repos: u32,
    #[serde(default)]
    pub followers: u32,
    #[serde(default)]
    pub following: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RepoOwner {
    pub login: String,
}

/// One entry of `GET /user/repos`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GitHubRepo {
    pub id: u64,
    pub name: String,
    pub full_name: Option<String>,
    pub owner: Option<RepoOwner>,
    pub html_url: String,
    pub description: Option<String>,
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: u32,
    #[serde(default)]
    pub forks_count: u32,
    #[serde(default)]
    pub open_issues_count: u32,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub topics: Vec<String>,
    pub default_branch: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Bytes of code per language for a single repository.
pub type LanguageBytes = HashMap<String, u64>;

/// One week of `GET /repos/{owner}/{repo}/stats/commit_activity`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommitActivityWeek {
    pub total: u64,
    pub week: i64,
    #[serde(default)]
    pub days: Vec<u64>,
}
