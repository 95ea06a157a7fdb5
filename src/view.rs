//! Filtering, sorting and pagination of a snapshot's repositories.
//!
//! [`ViewState`] is replaced wholesale on every interaction. Changing the
//! search text, language filter or sort key always lands back on page 1.

use crate::types::GitHubRepo;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_PAGE_SIZE: usize = 9;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Most recently updated first.
    #[default]
    Updated,
    /// Most starred first.
    Stars,
    /// Alphabetical.
    Name,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Updated => "updated",
            SortKey::Stars => "stars",
            SortKey::Name => "name",
        }
    }

    pub fn all() -> [SortKey; 3] {
        [SortKey::Updated, SortKey::Stars, SortKey::Name]
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "updated" => Ok(SortKey::Updated),
            "stars" => Ok(SortKey::Stars),
            "name" => Ok(SortKey::Name),
            other => Err(format!("unknown sort key: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LanguageFilter {
    #[default]
    All,
    Only(String),
}

impl LanguageFilter {
    /// `"All"` and the empty string both mean no filter.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value == "All" {
            LanguageFilter::All
        } else {
            LanguageFilter::Only(value.to_string())
        }
    }

    pub fn matches(&self, language: Option<&str>) -> bool {
        match self {
            LanguageFilter::All => true,
            LanguageFilter::Only(wanted) => language == Some(wanted.as_str()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            LanguageFilter::All => "All",
            LanguageFilter::Only(language) => language,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub page: usize,
    pub search: String,
    pub language: LanguageFilter,
    pub sort: SortKey,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            page: 1,
            search: String::new(),
            language: LanguageFilter::All,
            sort: SortKey::Updated,
        }
    }
}

impl ViewState {
    pub fn with_search(&self, search: impl Into<String>) -> Self {
        Self {
            page: 1,
            search: search.into(),
            ..self.clone()
        }
    }

    pub fn with_language(&self, language: LanguageFilter) -> Self {
        Self {
            page: 1,
            language,
            ..self.clone()
        }
    }

    pub fn with_sort(&self, sort: SortKey) -> Self {
        Self {
            page: 1,
            sort,
            ..self.clone()
        }
    }

    /// Move to `page`, or stay put when it lies outside `1..=total_pages`.
    pub fn go_to_page(&self, page: usize, total_pages: usize) -> Self {
        if page >= 1 && page <= total_pages {
            Self {
                page,
                ..self.clone()
            }
        } else {
            self.clone()
        }
    }

    pub fn next_page(&self, total_pages: usize) -> Self {
        self.go_to_page(self.page.saturating_add(1), total_pages)
    }

    pub fn prev_page(&self, total_pages: usize) -> Self {
        self.go_to_page(self.page.saturating_sub(1), total_pages)
    }

    pub fn matches(&self, repo: &GitHubRepo) -> bool {
        let needle = self.search.trim().to_lowercase();
        (needle.is_empty() || repo.name.to_lowercase().contains(&needle))
            && self.language.matches(repo.language.as_deref())
    }
}

/// Repositories matching `state`, in `state.sort` order. The input is
/// left untouched.
pub fn filter_and_sort<'a>(repos: &'a [GitHubRepo], state: &ViewState) -> Vec<&'a GitHubRepo> {
    let mut matched: Vec<&GitHubRepo> = repos.iter().filter(|repo| state.matches(repo)).collect();

    match state.sort {
        SortKey::Updated => matched.sort_by(|a, b| b.updated_at.cmp(&a.updated_at)),
        SortKey::Stars => matched.sort_by(|a, b| b.stargazers_count.cmp(&a.stargazers_count)),
        SortKey::Name => matched.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name))
        }),
    }

    matched
}

/// `ceil(count / page_size)`; zero matches means zero pages.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    count.div_ceil(page_size)
}

/// Distinct primary languages, sorted, for the filter control.
pub fn available_languages(repos: &[GitHubRepo]) -> Vec<String> {
    repos
        .iter()
        .filter_map(|repo| repo.language.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// One rendered page of the project grid.
#[derive(Debug, Clone, Serialize)]
pub struct PageView<'a> {
    pub items: Vec<&'a GitHubRepo>,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_matches: usize,
    pub languages: Vec<String>,
    pub state: ViewState,
}

impl PageView<'_> {
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Filter, sort and slice `repos` for `state`. A page outside the
/// available range is pulled back to page 1.
pub fn derive_page<'a>(repos: &'a [GitHubRepo], state: &ViewState, page_size: usize) -> PageView<'a> {
    let page_size = page_size.max(1);
    let matched = filter_and_sort(repos, state);
    let total_matches = matched.len();
    let total_pages = total_pages(total_matches, page_size);

    let state = if state.page >= 1 && state.page <= total_pages {
        state.clone()
    } else {
        ViewState {
            page: 1,
            ..state.clone()
        }
    };

    let start = (state.page - 1) * page_size;
    let items: Vec<&GitHubRepo> = matched.into_iter().skip(start).take(page_size).collect();

    PageView {
        items,
        page: state.page,
        page_size,
        total_pages,
        total_matches,
        languages: available_languages(repos),
        state,
    }
}
