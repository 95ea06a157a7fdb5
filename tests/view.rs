use chrono::{DateTime, Duration, TimeZone, Utc};
use portfolio_server::types::GitHubRepo;
use portfolio_server::view::{
    available_languages, derive_page, filter_and_sort, total_pages, LanguageFilter, SortKey, ViewState,
};

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

fn repo(id: u64, name: &str, language: Option<&str>, stars: u32, updated_days: i64) -> GitHubRepo {
    GitHubRepo {
        id,
        name: name.to_string(),
        full_name: Some(format!("octo/{}", name)),
        owner: None,
        html_url: format!("https://github.com/octo/{}", name),
        description: None,
        language: language.map(str::to_string),
        stargazers_count: stars,
        forks_count: 0,
        open_issues_count: 0,
        size: 0,
        topics: Vec::new(),
        default_branch: Some("main".to_string()),
        created_at: base_time(),
        updated_at: base_time() + Duration::days(updated_days),
    }
}

fn sample() -> Vec<GitHubRepo> {
    vec![
        repo(1, "rust-cli", Some("Rust"), 10, 3),
        repo(2, "Go-Server", Some("Go"), 50, 1),
        repo(3, "dotfiles", None, 1, 7),
        repo(4, "rusty-web", Some("TypeScript"), 5, 5),
        repo(5, "another-rust", Some("Rust"), 30, 2),
    ]
}

fn names(repos: &[&GitHubRepo]) -> Vec<String> {
    repos.iter().map(|r| r.name.clone()).collect()
}

#[test]
fn test_default_sort_is_most_recently_updated() {
    let repos = sample();
    let sorted = filter_and_sort(&repos, &ViewState::default());

    assert_eq!(
        names(&sorted),
        vec!["dotfiles", "rusty-web", "rust-cli", "another-rust", "Go-Server"]
    );
}

#[test]
fn test_sort_by_stars_descending() {
    let repos = sample();
    let state = ViewState::default().with_sort(SortKey::Stars);

    let sorted = filter_and_sort(&repos, &state);

    assert_eq!(
        names(&sorted),
        vec!["Go-Server", "another-rust", "rust-cli", "rusty-web", "dotfiles"]
    );
}

#[test]
fn test_sort_by_name_ignores_case() {
    let repos = sample();
    let state = ViewState::default().with_sort(SortKey::Name);

    let sorted = filter_and_sort(&repos, &state);

    assert_eq!(
        names(&sorted),
        vec!["another-rust", "dotfiles", "Go-Server", "rust-cli", "rusty-web"]
    );
}

#[test]
fn test_search_is_case_insensitive_substring() {
    let repos = sample();
    let state = ViewState::default().with_search("RUST");

    let matched = filter_and_sort(&repos, &state);

    assert_eq!(names(&matched), vec!["rusty-web", "rust-cli", "another-rust"]);
}

#[test]
fn test_language_filter_combines_with_search() {
    let repos = sample();
    let state = ViewState::default()
        .with_search("rust")
        .with_language(LanguageFilter::Only("Rust".to_string()));

    let matched = filter_and_sort(&repos, &state);

    assert_eq!(names(&matched), vec!["rust-cli", "another-rust"]);
}

#[test]
fn test_language_filter_never_matches_missing_language() {
    let repos = sample();
    let state = ViewState::default().with_language(LanguageFilter::Only("Go".to_string()));

    let matched = filter_and_sort(&repos, &state);

    assert_eq!(names(&matched), vec!["Go-Server"]);
}

#[test]
fn test_language_filter_parse() {
    assert_eq!(LanguageFilter::parse("All"), LanguageFilter::All);
    assert_eq!(LanguageFilter::parse("  "), LanguageFilter::All);
    assert_eq!(LanguageFilter::parse("Rust"), LanguageFilter::Only("Rust".to_string()));
    assert_eq!(LanguageFilter::parse("Rust").label(), "Rust");
    assert_eq!(LanguageFilter::All.label(), "All");
}

#[test]
fn test_sort_key_parse() {
    assert_eq!("stars".parse::<SortKey>(), Ok(SortKey::Stars));
    assert_eq!("Name".parse::<SortKey>(), Ok(SortKey::Name));
    assert_eq!("".parse::<SortKey>(), Ok(SortKey::Updated));
    assert!("forks".parse::<SortKey>().is_err());
    assert_eq!(SortKey::default(), SortKey::Updated);
}

#[test]
fn test_filter_and_sort_is_idempotent() {
    let repos = sample();
    let before = repos.clone();
    let state = ViewState::default().with_search("r").with_sort(SortKey::Stars);

    let first = names(&filter_and_sort(&repos, &state));
    let second = names(&filter_and_sort(&repos, &state));

    assert_eq!(first, second);
    assert_eq!(repos, before);
}

#[test]
fn test_total_pages() {
    assert_eq!(total_pages(0, 9), 0);
    assert_eq!(total_pages(1, 9), 1);
    assert_eq!(total_pages(9, 9), 1);
    assert_eq!(total_pages(10, 9), 2);
    assert_eq!(total_pages(12, 9), 2);
    assert_eq!(total_pages(5, 0), 0);
}

#[test]
fn test_twelve_repositories_over_two_pages() {
    let repos: Vec<GitHubRepo> = (0..12)
        .map(|i| repo(i, &format!("repo-{:02}", i), Some("Rust"), 0, i as i64))
        .collect();

    let first = derive_page(&repos, &ViewState::default(), 9);
    assert_eq!(first.total_pages, 2);
    assert_eq!(first.total_matches, 12);
    assert_eq!(first.items.len(), 9);
    assert!(!first.has_prev());
    assert!(first.has_next());

    let state = ViewState::default().go_to_page(2, first.total_pages);
    let second = derive_page(&repos, &state, 9);

    assert_eq!(second.page, 2);
    assert_eq!(names(&second.items), vec!["repo-02", "repo-01", "repo-00"]);
    assert!(second.has_prev());
    assert!(!second.has_next());
}

#[test]
fn test_empty_result_has_no_pages() {
    let repos = sample();
    let state = ViewState::default().with_search("no-such-repo");

    let page = derive_page(&repos, &state, 9);

    assert_eq!(page.total_pages, 0);
    assert_eq!(page.total_matches, 0);
    assert_eq!(page.page, 1);
    assert!(page.items.is_empty());
    assert!(!page.has_next());
    assert!(!page.has_prev());
}

#[test]
fn test_out_of_range_page_is_a_no_op() {
    let state = ViewState::default().go_to_page(2, 3);
    assert_eq!(state.page, 2);

    assert_eq!(state.go_to_page(0, 3), state);
    assert_eq!(state.go_to_page(4, 3), state);
    assert_eq!(ViewState::default().go_to_page(1, 0).page, 1);
}

#[test]
fn test_next_and_prev_are_clamped() {
    let state = ViewState::default();
    assert_eq!(state.prev_page(2).page, 1);

    let state = state.next_page(2);
    assert_eq!(state.page, 2);
    assert_eq!(state.next_page(2).page, 2);
    assert_eq!(state.prev_page(2).page, 1);
}

#[test]
fn test_changing_filters_resets_page() {
    let state = ViewState::default().go_to_page(3, 5);
    assert_eq!(state.page, 3);

    assert_eq!(state.with_search("x").page, 1);
    assert_eq!(state.with_language(LanguageFilter::Only("Go".to_string())).page, 1);
    assert_eq!(state.with_sort(SortKey::Name).page, 1);

    // The earlier state is untouched
    assert_eq!(state.page, 3);
}

#[test]
fn test_stale_page_is_pulled_back() {
    let repos = sample();
    let state = ViewState {
        page: 7,
        ..ViewState::default()
    };

    let page = derive_page(&repos, &state, 2);

    assert_eq!(page.page, 1);
    assert_eq!(page.items.len(), 2);
}

#[test]
fn test_available_languages_sorted_and_distinct() {
    let repos = sample();
    assert_eq!(available_languages(&repos), vec!["Go", "Rust", "TypeScript"]);
}
