use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;

use crate::client::ForgeClient;
use crate::response::{self, PullRequestView, ToolResult};
use crate::target::RepositoryTarget;
use crate::types::common::{PaginationParams, RepoParams};
use crate::types::forge::ListOptions;

use super::{upstream_failure, EditRequest};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct PrListParams {
    #[serde(flatten)]
    pub repo: RepoParams,
    #[serde(flatten)]
    pub page: PaginationParams,
    /// Filter by state: open, closed, or all. Defaults to open.
    pub state: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct PrEditParams {
    #[serde(flatten)]
    pub repo: RepoParams,
    /// Pull request number (>= 1).
    pub pull_request_number: i64,
    /// New title (1-255 characters).
    pub title: Option<String>,
    /// New body in markdown (1-65535 characters).
    pub body: Option<String>,
    /// New state: open or closed.
    pub state: Option<String>,
}

pub async fn pr_list(
    client: &dyn ForgeClient,
    target: &RepositoryTarget,
    options: ListOptions,
) -> ToolResult {
    match client.list_pull_requests(target, &options).await {
        Ok(prs) => {
            let views: Vec<PullRequestView> = prs.iter().map(PullRequestView::from).collect();
            ToolResult::success(
                response::format_pr_list(&prs),
                json!({ "pull_requests": views, "total": views.len() }),
            )
        }
        Err(e) => upstream_failure("list pull requests", e),
    }
}

pub async fn pr_edit(
    client: &dyn ForgeClient,
    target: &RepositoryTarget,
    req: EditRequest,
) -> ToolResult {
    match client.edit_pull_request(target, req.number, &req.edit).await {
        Ok(pr) => ToolResult::success(
            response::format_pr_edited(&pr),
            json!({ "pull_request": PullRequestView::from(&pr) }),
        ),
        Err(e) => upstream_failure("edit pull request", e),
    }
}
