use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::config::Config;
use crate::error::{ForgeError, Result};
use crate::pagination::PaginationWindow;
use crate::target::RepositoryTarget;
use crate::types::forge::{Comment, EditOptions, Issue, ListOptions, PullRequest};

use super::ForgeClient;

/// HTTP client for the Forgejo/Gitea REST API v1.
#[derive(Debug, Clone)]
pub struct GiteaClient {
    http: reqwest::Client,
    base_api: Url,
}

impl GiteaClient {
    /// Create a new client from configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("token {}", config.token))
            .map_err(|e| ForgeError::Config(format!("Invalid token header: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ForgeError::Config(format!("Failed to build HTTP client: {e}")))?;

        let base_api = Url::parse(&format!("{}/api/v1", config.base_url))
            .map_err(|e| ForgeError::Config(format!("Invalid base URL: {e}")))?;

        Ok(Self { http, base_api })
    }

    /// Build the API URL for `/repos/{owner}/{repo}/{rest..}`, escaping each segment.
    fn repo_url(&self, target: &RepositoryTarget, rest: &[&str]) -> Result<Url> {
        let mut url = self.base_api.clone();
        url.path_segments_mut()
            .map_err(|_| ForgeError::Config(format!("Invalid base URL: {}", self.base_api)))?
            .pop_if_empty()
            .extend(["repos", target.owner.as_str(), target.repo.as_str()])
            .extend(rest);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, url: Url, query: &[(&str, String)]) -> Result<T> {
        tracing::debug!(%url, "GET");
        let resp = self.http.get(url).query(query).send().await?;
        handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(&self, url: Url, body: &B) -> Result<T> {
        tracing::debug!(%url, "POST");
        let resp = self.http.post(url).json(body).send().await?;
        handle_response(resp).await
    }

    async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T> {
        tracing::debug!(%url, "PATCH");
        let resp = self.http.patch(url).json(body).send().await?;
        handle_response(resp).await
    }
}

/// Check the status and deserialize the JSON body. Failures keep the upstream body verbatim.
async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ForgeError::Api { status, body });
    }
    Ok(resp.json::<T>().await?)
}

fn list_query(options: &ListOptions) -> Vec<(&'static str, String)> {
    let mut query = vec![("state", options.state.clone())];
    query.extend(options.window.page_request().to_query());
    query
}

#[async_trait]
impl ForgeClient for GiteaClient {
    async fn list_issues(
        &self,
        target: &RepositoryTarget,
        options: &ListOptions,
    ) -> Result<Vec<Issue>> {
        let mut query = list_query(options);
        query.push(("type", "issues".to_string()));
        let page = self.get(self.repo_url(target, &["issues"])?, &query).await?;
        Ok(options.window.slice(page))
    }

    async fn edit_issue(
        &self,
        target: &RepositoryTarget,
        number: i64,
        edit: &EditOptions,
    ) -> Result<Issue> {
        let number = number.to_string();
        self.patch(self.repo_url(target, &["issues", number.as_str()])?, edit)
            .await
    }

    async fn list_pull_requests(
        &self,
        target: &RepositoryTarget,
        options: &ListOptions,
    ) -> Result<Vec<PullRequest>> {
        let page = self
            .get(self.repo_url(target, &["pulls"])?, &list_query(options))
            .await?;
        Ok(options.window.slice(page))
    }

    async fn edit_pull_request(
        &self,
        target: &RepositoryTarget,
        number: i64,
        edit: &EditOptions,
    ) -> Result<PullRequest> {
        let number = number.to_string();
        self.patch(self.repo_url(target, &["pulls", number.as_str()])?, edit)
            .await
    }

    async fn list_comments(
        &self,
        target: &RepositoryTarget,
        number: i64,
        window: PaginationWindow,
    ) -> Result<Vec<Comment>> {
        // The comments endpoint has no page/limit parameters; window locally.
        let number = number.to_string();
        let comments: Vec<Comment> = self
            .get(self.repo_url(target, &["issues", number.as_str(), "comments"])?, &[])
            .await?;
        let offset = usize::try_from(window.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(window.limit).unwrap_or(0);
        Ok(comments.into_iter().skip(offset).take(limit).collect())
    }

    async fn create_comment(
        &self,
        target: &RepositoryTarget,
        number: i64,
        body: &str,
    ) -> Result<Comment> {
        let number = number.to_string();
        self.post(
            self.repo_url(target, &["issues", number.as_str(), "comments"])?,
            &serde_json::json!({ "body": body }),
        )
        .await
    }

    async fn edit_comment(
        &self,
        target: &RepositoryTarget,
        comment_id: i64,
        body: &str,
    ) -> Result<Comment> {
        let comment_id = comment_id.to_string();
        self.patch(
            self.repo_url(target, &["issues", "comments", comment_id.as_str()])?,
            &serde_json::json!({ "body": body }),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_for(server: &MockServer) -> GiteaClient {
        let config = Config::new(&server.uri(), "secret-token").unwrap();
        GiteaClient::new(&config).unwrap()
    }

    fn target() -> RepositoryTarget {
        RepositoryTarget::new("testuser", "testrepo").unwrap()
    }

    fn comment_json(id: i64, body: &str) -> serde_json::Value {
        json!({
            "id": id,
            "body": body,
            "user": {"id": 1, "login": "testuser"},
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z",
        })
    }

    #[tokio::test]
    async fn create_comment_posts_body_with_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/repos/testuser/testrepo/issues/5/comments"))
            .and(header("authorization", "token secret-token"))
            .and(body_json(json!({"body": "hello"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(comment_json(10, "hello")))
            .expect(1)
            .mount(&server)
            .await;

        let comment = client_for(&server)
            .create_comment(&target(), 5, "hello")
            .await
            .unwrap();
        assert_eq!(comment.id, 10);
        assert_eq!(comment.body, "hello");
    }

    #[tokio::test]
    async fn list_issues_sends_page_and_limit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/repos/testuser/testrepo/issues"))
            .and(query_param("state", "closed"))
            .and(query_param("type", "issues"))
            .and(query_param("page", "3"))
            .and(query_param("limit", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"number": 1, "title": "Bug", "state": "closed"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let options = ListOptions {
            window: PaginationWindow {
                limit: 10,
                offset: 20,
            },
            state: "closed".to_string(),
        };
        let issues = client_for(&server)
            .list_issues(&target(), &options)
            .await
            .unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].title, "Bug");
    }

    #[tokio::test]
    async fn list_issues_with_misaligned_offset_returns_exact_window() {
        let server = MockServer::start().await;
        let page: Vec<_> = (1..=15)
            .map(|n| json!({"number": n, "title": format!("issue {n}"), "state": "open"}))
            .collect();
        Mock::given(method("GET"))
            .and(path("/api/v1/repos/testuser/testrepo/issues"))
            .and(query_param("page", "1"))
            .and(query_param("limit", "15"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page))
            .expect(1)
            .mount(&server)
            .await;

        let options = ListOptions {
            window: PaginationWindow { limit: 10, offset: 5 },
            state: "open".to_string(),
        };
        let issues = client_for(&server)
            .list_issues(&target(), &options)
            .await
            .unwrap();
        let numbers: Vec<_> = issues.iter().map(|i| i.number).collect();
        assert_eq!(numbers, (6..=15).collect::<Vec<i64>>());
    }

    #[tokio::test]
    async fn list_pull_requests_with_huge_offset() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/repos/testuser/testrepo/pulls"))
            .and(query_param("page", "9223372036854775808"))
            .and(query_param("limit", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let options = ListOptions {
            window: PaginationWindow {
                limit: 1,
                offset: i64::MAX,
            },
            state: "all".to_string(),
        };
        let prs = client_for(&server)
            .list_pull_requests(&target(), &options)
            .await
            .unwrap();
        assert!(prs.is_empty());
    }

    #[tokio::test]
    async fn list_comments_applies_window_locally() {
        let server = MockServer::start().await;
        let all: Vec<_> = (1..=5).map(|i| comment_json(i, &format!("c{i}"))).collect();
        Mock::given(method("GET"))
            .and(path("/api/v1/repos/testuser/testrepo/issues/2/comments"))
            .respond_with(ResponseTemplate::new(200).set_body_json(all))
            .mount(&server)
            .await;

        let comments = client_for(&server)
            .list_comments(&target(), 2, PaginationWindow { limit: 2, offset: 1 })
            .await
            .unwrap();
        let ids: Vec<_> = comments.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[tokio::test]
    async fn edit_comment_uses_comment_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/api/v1/repos/testuser/testrepo/issues/comments/99"))
            .and(body_json(json!({"body": "updated"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(comment_json(99, "updated")))
            .expect(1)
            .mount(&server)
            .await;

        let comment = client_for(&server)
            .edit_comment(&target(), 99, "updated")
            .await
            .unwrap();
        assert_eq!(comment.body, "updated");
    }

    #[tokio::test]
    async fn edit_pull_request_sends_only_set_fields() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/api/v1/repos/testuser/testrepo/pulls/8"))
            .and(body_json(json!({"state": "closed"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "number": 8, "title": "Feature", "state": "closed"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let edit = EditOptions {
            state: Some("closed".to_string()),
            ..Default::default()
        };
        let pr = client_for(&server)
            .edit_pull_request(&target(), 8, &edit)
            .await
            .unwrap();
        assert_eq!(pr.state, "closed");
    }

    #[tokio::test]
    async fn error_status_keeps_body_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/api/v1/repos/testuser/testrepo/issues/404"))
            .respond_with(
                ResponseTemplate::new(404).set_body_string(r#"{"message":"not found"}"#),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .edit_issue(&target(), 404, &EditOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), r#"HTTP 404 Not Found: {"message":"not found"}"#);
    }

    #[test]
    fn repo_url_escapes_segments() {
        let config = Config::new("https://forge.example.com/", "t").unwrap();
        let client = GiteaClient::new(&config).unwrap();
        let target = RepositoryTarget::new("some org", "repo#1").unwrap();
        let url = client.repo_url(&target, &["issues"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://forge.example.com/api/v1/repos/some%20org/repo%231/issues"
        );
    }
}
