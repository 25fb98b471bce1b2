use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;

use crate::client::ForgeClient;
use crate::response::{self, IssueView, ToolResult};
use crate::target::RepositoryTarget;
use crate::types::common::{PaginationParams, RepoParams};
use crate::types::forge::ListOptions;

use super::{upstream_failure, EditRequest};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct IssueListParams {
    #[serde(flatten)]
    pub repo: RepoParams,
    #[serde(flatten)]
    pub page: PaginationParams,
    /// Filter by state: open, closed, or all. Defaults to open.
    pub state: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct IssueEditParams {
    #[serde(flatten)]
    pub repo: RepoParams,
    /// Issue number (>= 1).
    pub issue_number: i64,
    /// New title (1-255 characters).
    pub title: Option<String>,
    /// New body in markdown (1-65535 characters).
    pub body: Option<String>,
    /// New state: open or closed.
    pub state: Option<String>,
}

pub async fn issue_list(
    client: &dyn ForgeClient,
    target: &RepositoryTarget,
    options: ListOptions,
) -> ToolResult {
    match client.list_issues(target, &options).await {
        Ok(issues) => {
            let views: Vec<IssueView> = issues.iter().map(IssueView::from).collect();
            ToolResult::success(
                response::format_issue_list(&issues),
                json!({ "issues": views, "total": views.len() }),
            )
        }
        Err(e) => upstream_failure("list issues", e),
    }
}

pub async fn issue_edit(
    client: &dyn ForgeClient,
    target: &RepositoryTarget,
    req: EditRequest,
) -> ToolResult {
    match client.edit_issue(target, req.number, &req.edit).await {
        Ok(issue) => ToolResult::success(
            response::format_issue_edited(&issue),
            json!({ "issue": IssueView::from(&issue) }),
        ),
        Err(e) => upstream_failure("edit issue", e),
    }
}
