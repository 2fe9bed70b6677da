use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use ticketbridge_core::issue::{CreatedIssue, NewIssue};

use super::{IssueTracker, TrackerError};

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";

#[derive(Debug)]
pub struct GitHubTracker {
    /// REST API base (e.g. "https://api.github.com").
    api_base: String,
    owner: String,
    repo: String,
    /// Personal access token, sent as a bearer token.
    token: String,
    client: reqwest::Client,
}

impl GitHubTracker {
    pub fn new(
        api_base: &str,
        token: String,
        owner: &str,
        repo: &str,
    ) -> Result<Self, TrackerError> {
        let api_base = api_base.trim().trim_end_matches('/').to_string();
        url::Url::parse(&api_base)
            .map_err(|e| TrackerError::Other(format!("invalid API base: {e}")))?;
        if token.trim().is_empty() {
            return Err(TrackerError::Other("GitHub requires an API token".into()));
        }
        if owner.trim().is_empty() || repo.trim().is_empty() {
            return Err(TrackerError::Other(
                "repository owner and name must be non-empty".into(),
            ));
        }

        let client = reqwest::Client::builder()
            .user_agent("ticketbridge")
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| TrackerError::Other(format!("HTTP client init: {e}")))?;

        Ok(Self {
            api_base,
            owner: owner.trim().to_string(),
            repo: repo.trim().to_string(),
            token,
            client,
        })
    }

    /// "owner/repo".
    pub fn repo_slug(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    fn repo_url(&self, path: &str) -> String {
        format!("{}/repos/{}/{}{}", self.api_base, self.owner, self.repo, path)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, self.repo_url(path))
            .bearer_auth(&self.token)
            .header("X-GitHub-Api-Version", API_VERSION)
    }
}

#[async_trait]
impl IssueTracker for GitHubTracker {
    fn name(&self) -> &str {
        "github"
    }

    async fn create_issue(&self, issue: &NewIssue) -> Result<CreatedIssue, TrackerError> {
        #[derive(Serialize)]
        struct CreateIssue<'a> {
            title: &'a str,
            body: &'a str,
            #[serde(skip_serializing_if = "<[String]>::is_empty")]
            labels: &'a [String],
            #[serde(skip_serializing_if = "<[String]>::is_empty")]
            assignees: &'a [String],
        }

        #[derive(Deserialize)]
        struct IssueResponse {
            number: i64,
            html_url: String,
        }

        let resp = self
            .request(reqwest::Method::POST, "/issues")
            .header("Accept", "application/vnd.github+json")
            .json(&CreateIssue {
                title: &issue.title,
                body: &issue.body,
                labels: &issue.labels,
                assignees: &issue.assignees,
            })
            .send()
            .await
            .map_err(|e| TrackerError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(TrackerError::Rejected(format!("status {status}: {text}")));
        }

        let created: IssueResponse = resp
            .json()
            .await
            .map_err(|e| TrackerError::InvalidResponse(format!("parse issue response: {e}")))?;

        info!(
            "github: created issue #{} in {}",
            created.number,
            self.repo_slug()
        );
        Ok(CreatedIssue {
            number: created.number,
            url: created.html_url,
        })
    }

    async fn get_resource(&self, path: &str) -> Result<Vec<u8>, TrackerError> {
        let resp = self
            .request(
                reqwest::Method::GET,
                &format!("/contents/{}", path.trim_start_matches('/')),
            )
            .header("Accept", "application/vnd.github.raw")
            .send()
            .await
            .map_err(|e| TrackerError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(TrackerError::Rejected(format!(
                "GET contents/{path} failed (status {status})"
            )));
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| TrackerError::Transport(e.to_string()))?;
        debug!("github: fetched {path} ({} bytes)", bytes.len());
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::{Arc, Mutex};

    use axum::extract::{Path, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use tokio::net::TcpListener;

    #[derive(Clone, Default)]
    struct Recorded {
        bodies: Arc<Mutex<Vec<Value>>>,
    }

    fn authorized(headers: &HeaderMap) -> bool {
        headers.get("authorization").and_then(|v| v.to_str().ok()) == Some("Bearer gh-token")
    }

    async fn spawn_stub(recorded: Recorded) -> String {
        let app = Router::new()
            .route(
                "/repos/{owner}/{repo}/issues",
                post(
                    |State(rec): State<Recorded>,
                     Path((owner, repo)): Path<(String, String)>,
                     headers: HeaderMap,
                     Json(body): Json<Value>| async move {
                        if !authorized(&headers) {
                            return Err((StatusCode::UNAUTHORIZED, "Bad credentials".to_string()));
                        }
                        if body["title"] == "invalid" {
                            return Err((
                                StatusCode::UNPROCESSABLE_ENTITY,
                                "Validation Failed".to_string(),
                            ));
                        }
                        rec.bodies.lock().unwrap().push(body);
                        Ok((
                            StatusCode::CREATED,
                            Json(json!({
                                "number": 17,
                                "html_url": format!("https://github.com/{owner}/{repo}/issues/17"),
                            })),
                        ))
                    },
                ),
            )
            .route(
                "/repos/{owner}/{repo}/contents/{file}",
                get(
                    |Path((_owner, _repo, file)): Path<(String, String, String)>,
                     headers: HeaderMap| async move {
                        if !authorized(&headers) || file != "README.md" {
                            return Err(StatusCode::NOT_FOUND);
                        }
                        Ok("# readme")
                    },
                ),
            )
            .with_state(recorded);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn issue(title: &str) -> NewIssue {
        NewIssue {
            title: title.into(),
            body: "body text".into(),
            labels: vec!["user-reported".into(), "bug".into()],
            assignees: vec![],
        }
    }

    #[test]
    fn new_requires_token_and_repo() {
        assert!(GitHubTracker::new(DEFAULT_API_BASE, "".into(), "o", "r").is_err());
        assert!(GitHubTracker::new(DEFAULT_API_BASE, "t".into(), "", "r").is_err());
        assert!(GitHubTracker::new("::", "t".into(), "o", "r").is_err());

        let tracker = GitHubTracker::new("https://api.github.com/", "t".into(), "o", "r").unwrap();
        assert_eq!(tracker.repo_slug(), "o/r");
        assert_eq!(
            tracker.repo_url("/issues"),
            "https://api.github.com/repos/o/r/issues"
        );
    }

    #[tokio::test]
    async fn create_issue_posts_fields() {
        let recorded = Recorded::default();
        let base = spawn_stub(recorded.clone()).await;
        let tracker = GitHubTracker::new(&base, "gh-token".into(), "acme", "app").unwrap();

        let created = tracker.create_issue(&issue("Crash on load")).await.unwrap();
        assert_eq!(created.number, 17);
        assert_eq!(created.url, "https://github.com/acme/app/issues/17");

        let bodies = recorded.bodies.lock().unwrap();
        assert_eq!(bodies.len(), 1);
        assert_eq!(bodies[0]["title"], "Crash on load");
        assert_eq!(bodies[0]["labels"], json!(["user-reported", "bug"]));
        // Empty assignee lists are omitted.
        assert!(bodies[0].get("assignees").is_none());
    }

    #[tokio::test]
    async fn rejected_issue_carries_status_and_body() {
        let base = spawn_stub(Recorded::default()).await;
        let tracker = GitHubTracker::new(&base, "gh-token".into(), "acme", "app").unwrap();

        let err = tracker.create_issue(&issue("invalid")).await.unwrap_err();
        match err {
            TrackerError::Rejected(msg) => {
                assert!(msg.contains("422"), "{msg}");
                assert!(msg.contains("Validation Failed"), "{msg}");
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn bad_token_is_rejected() {
        let base = spawn_stub(Recorded::default()).await;
        let tracker = GitHubTracker::new(&base, "nope".into(), "acme", "app").unwrap();

        let err = tracker.create_issue(&issue("Crash")).await.unwrap_err();
        assert!(matches!(err, TrackerError::Rejected(_)));
    }

    #[tokio::test]
    async fn get_resource_returns_raw_bytes() {
        let base = spawn_stub(Recorded::default()).await;
        let tracker = GitHubTracker::new(&base, "gh-token".into(), "acme", "app").unwrap();

        let bytes = tracker.get_resource("README.md").await.unwrap();
        assert_eq!(bytes, b"# readme");

        assert!(tracker.get_resource("MISSING.md").await.is_err());
    }

    #[tokio::test]
    async fn unreachable_tracker_is_transport_error() {
        // Bind then drop to get a port nothing listens on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let tracker =
            GitHubTracker::new(&format!("http://{addr}"), "gh-token".into(), "acme", "app")
                .unwrap();
        let err = tracker.create_issue(&issue("Crash")).await.unwrap_err();
        assert!(matches!(err, TrackerError::Transport(_)), "got {err:?}");
    }
}
