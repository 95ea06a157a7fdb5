use crate::types::{GitHubRepo, GitHubUser};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything one page render needs, fetched in a single pass.
///
/// A snapshot is built once and never mutated afterwards; views derive
/// filtered copies from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub identity: Option<GitHubUser>,
    pub repositories: Vec<GitHubRepo>,
    pub language_totals: LanguageTotals,
    pub total_commits: u64,
    pub fetched_at: DateTime<Utc>,
}

impl Snapshot {
    /// The degraded snapshot returned when the identity cannot be fetched.
    pub fn empty() -> Self {
        Self {
            identity: None,
            repositories: Vec::new(),
            language_totals: LanguageTotals::default(),
            total_commits: 0,
            fetched_at: Utc::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.identity.is_none() && self.repositories.is_empty()
    }
}

/// Cumulative bytes of code per language across repositories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageTotals(BTreeMap<String, u64>);

/// A language's slice of the total, for the skills breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageShare {
    pub language: String,
    pub bytes: u64,
    pub percentage: f64,
}

impl LanguageTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one repository's language map in, summing colliding keys.
    pub fn add<'a, I>(&mut self, languages: I)
    where
        I: IntoIterator<Item = (&'a String, &'a u64)>,
    {
        for (language, bytes) in languages {
            let entry = self.0.entry(language.clone()).or_insert(0);
            *entry = entry.saturating_add(*bytes);
        }
    }

    pub fn get(&self, language: &str) -> Option<u64> {
        self.0.get(language).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total_bytes(&self) -> u64 {
        self.0.values().fold(0u64, |acc, b| acc.saturating_add(*b))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &u64)> {
        self.0.iter()
    }

    /// Languages ordered by byte count (largest first, ties by name) with
    /// their percentage of the total.
    pub fn shares(&self) -> Vec<LanguageShare> {
        let total = self.total_bytes();
        if total == 0 {
            return Vec::new();
        }

        let mut shares: Vec<LanguageShare> = self
            .0
            .iter()
            .map(|(language, bytes)| LanguageShare {
                language: language.clone(),
                bytes: *bytes,
                percentage: (*bytes as f64 / total as f64) * 100.0,
            })
            .collect();
        shares.sort_by(|a, b| b.bytes.cmp(&a.bytes).then_with(|| a.language.cmp(&b.language)));
        shares
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for LanguageTotals {
    fn from_iter<T: IntoIterator<Item = (S, u64)>>(iter: T) -> Self {
        let mut totals = BTreeMap::new();
        for (language, bytes) in iter {
            let entry: &mut u64 = totals.entry(language.into()).or_insert(0);
            *entry = entry.saturating_add(bytes);
        }
        LanguageTotals(totals)
    }
}

/// Rate limit state reported by the last API response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitState {
    pub remaining: u32,
    pub limit: u32,
    pub reset_time: chrono::DateTime<chrono::Utc>,
    pub is_limited: bool,
}

impl Default for RateLimitState {
    fn default() -> Self {
        Self {
            remaining: 5000,
            limit: 5000,
            reset_time: chrono::Utc::now() + chrono::Duration::hours(1),
            is_limited: false,
        }
    }
}
