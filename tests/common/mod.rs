#![allow(dead_code)]

use axum::{
    extract::{Path, RawQuery, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use portfolio_server::github::GitHubClient;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const TEST_TOKEN: &str = "test-token";

/// What the mock answers for one endpoint.
#[derive(Debug, Clone)]
pub enum Reply {
    Json(Value),
    Status(u16),
    /// 200 with a body that is not valid JSON.
    Garbage,
}

impl Reply {
    fn into_response(self) -> Response {
        match self {
            Reply::Json(value) => (StatusCode::OK, Json(value)).into_response(),
            Reply::Status(code) => StatusCode::from_u16(code)
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
                .into_response(),
            Reply::Garbage => (StatusCode::OK, "{not json").into_response(),
        }
    }
}

/// Canned GitHub API. Sub-resources are keyed by `owner/repo`; anything
/// unconfigured answers 404.
#[derive(Debug, Clone)]
pub struct MockGitHub {
    pub user: Reply,
    pub repos: Reply,
    pub languages: HashMap<String, Reply>,
    pub commit_activity: HashMap<String, Reply>,
    pub rate_limited: bool,
}

impl Default for MockGitHub {
    fn default() -> Self {
        Self {
            user: Reply::Json(user_json("octo")),
            repos: Reply::Json(json!([])),
            languages: HashMap::new(),
            commit_activity: HashMap::new(),
            rate_limited: false,
        }
    }
}

impl MockGitHub {
    pub fn with_repos(mut self, repos: Vec<Value>) -> Self {
        self.repos = Reply::Json(Value::Array(repos));
        self
    }

    pub fn languages(mut self, full_name: &str, reply: Reply) -> Self {
        self.languages.insert(full_name.to_string(), reply);
        self
    }

    pub fn commits(mut self, full_name: &str, reply: Reply) -> Self {
        self.commit_activity.insert(full_name.to_string(), reply);
        self
    }
}

#[derive(Clone)]
struct MockState {
    config: Arc<MockGitHub>,
    requests: Arc<Mutex<Vec<String>>>,
}

pub struct MockServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockServer {
    /// Every request seen so far, as `path?query`.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn client(&self) -> GitHubClient {
        GitHubClient::with_base_url(Some(TEST_TOKEN.to_string()), &self.base_url)
            .expect("Failed to create client")
    }

    pub fn client_without_token(&self) -> GitHubClient {
        GitHubClient::with_base_url(None, &self.base_url).expect("Failed to create client")
    }
}

fn record(state: &MockState, path: String, query: Option<String>) {
    let entry = match query {
        Some(q) => format!("{}?{}", path, q),
        None => path,
    };
    state.requests.lock().unwrap().push(entry);
}

fn check_auth(state: &MockState, headers: &HeaderMap) -> Option<Response> {
    let expected = format!("Bearer {}", TEST_TOKEN);
    let authorized = headers
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .map(|h| h == expected)
        .unwrap_or(false);

    if !authorized {
        return Some(StatusCode::UNAUTHORIZED.into_response());
    }
    if state.config.rate_limited {
        return Some(
            (
                StatusCode::FORBIDDEN,
                [("X-RateLimit-Remaining", "0"), ("X-RateLimit-Limit", "5000"), ("X-RateLimit-Reset", "1700000000")],
            )
                .into_response(),
        );
    }
    None
}

async fn user(State(state): State<MockState>, headers: HeaderMap) -> Response {
    record(&state, "/user".to_string(), None);
    if let Some(rejection) = check_auth(&state, &headers) {
        return rejection;
    }
    state.config.user.clone().into_response()
}

async fn repos(State(state): State<MockState>, headers: HeaderMap, RawQuery(query): RawQuery) -> Response {
    record(&state, "/user/repos".to_string(), query);
    if let Some(rejection) = check_auth(&state, &headers) {
        return rejection;
    }
    state.config.repos.clone().into_response()
}

async fn languages(
    State(state): State<MockState>,
    headers: HeaderMap,
    Path((owner, repo)): Path<(String, String)>,
) -> Response {
    record(&state, format!("/repos/{}/{}/languages", owner, repo), None);
    if let Some(rejection) = check_auth(&state, &headers) {
        return rejection;
    }
    state
        .config
        .languages
        .get(&format!("{}/{}", owner, repo))
        .cloned()
        .unwrap_or(Reply::Status(404))
        .into_response()
}

async fn commit_activity(
    State(state): State<MockState>,
    headers: HeaderMap,
    Path((owner, repo)): Path<(String, String)>,
) -> Response {
    record(&state, format!("/repos/{}/{}/stats/commit_activity", owner, repo), None);
    if let Some(rejection) = check_auth(&state, &headers) {
        return rejection;
    }
    state
        .config
        .commit_activity
        .get(&format!("{}/{}", owner, repo))
        .cloned()
        .unwrap_or(Reply::Status(404))
        .into_response()
}

pub async fn spawn_mock(config: MockGitHub) -> MockServer {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        config: Arc::new(config),
        requests: requests.clone(),
    };

    let app = Router::new()
        .route("/user", get(user))
        .route("/user/repos", get(repos))
        .route("/repos/:owner/:repo/languages", get(languages))
        .route("/repos/:owner/:repo/stats/commit_activity", get(commit_activity))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock GitHub");
    let addr = listener.local_addr().expect("Mock GitHub has no address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    MockServer {
        base_url: format!("http://{}", addr),
        requests,
    }
}

pub fn user_json(login: &str) -> Value {
    json!({
        "login": login,
        "id": 1,
        "name": "The Octocat",
        "bio": "Builds things",
        "location": "San Francisco",
        "email": "octo@example.com",
        "avatar_url": "https://avatars.example.com/u/1",
        "html_url": format!("https://github.com/{}", login),
        "public_repos": 12,
        "followers": 40,
        "following": 3,
        "created_at": "2015-01-01T00:00:00Z"
    })
}

pub fn repo_json(id: u64, owner: &str, name: &str, language: Option<&str>, stars: u32, updated_at: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "full_name": format!("{}/{}", owner, name),
        "owner": { "login": owner, "id": 1 },
        "html_url": format!("https://github.com/{}/{}", owner, name),
        "description": format!("{} description", name),
        "language": language,
        "stargazers_count": stars,
        "forks_count": 1,
        "open_issues_count": 0,
        "size": 10,
        "topics": ["demo"],
        "default_branch": "main",
        "created_at": "2020-01-01T00:00:00Z",
        "updated_at": updated_at
    })
}

pub fn weeks_json(totals: &[u64]) -> Value {
    Value::Array(
        totals
            .iter()
            .enumerate()
            .map(|(i, total)| json!({ "total": total, "week": 1_700_000_000 + (i as i64) * 604_800, "days": [0, 0, 0, 0, 0, 0, *total] }))
            .collect(),
    )
}
