use crate::client::ForgeClient;
use crate::response::ToolResult;
use crate::tools::{comments, issues, pulls, ToolCall, ToolName};
use crate::validate::{self, JsonObject, ValidatedRequest};

/// Run a validated request against the Forge API. Exactly one upstream call is made.
pub async fn dispatch(client: &dyn ForgeClient, request: ValidatedRequest) -> ToolResult {
    let ValidatedRequest { target, call } = request;
    match call {
        ToolCall::IssueList(options) => issues::issue_list(client, &target, options).await,
        ToolCall::IssueEdit(req) => issues::issue_edit(client, &target, req).await,
        ToolCall::PrList(options) => pulls::pr_list(client, &target, options).await,
        ToolCall::PrEdit(req) => pulls::pr_edit(client, &target, req).await,
        ToolCall::IssueCommentList(req) | ToolCall::PrCommentList(req) => {
            comments::comment_list(client, &target, req).await
        }
        ToolCall::IssueCommentCreate(req) | ToolCall::PrCommentCreate(req) => {
            comments::comment_create(client, &target, req).await
        }
        ToolCall::IssueCommentEdit(req) | ToolCall::PrCommentEdit(req) => {
            comments::comment_edit(client, &target, req).await
        }
    }
}

/// Validate raw arguments for `tool` and, if they pass, dispatch the call.
///
/// Validation and resolution failures never reach the network.
pub async fn handle(client: &dyn ForgeClient, tool: ToolName, args: &JsonObject) -> ToolResult {
    match validate::validate(tool, args) {
        Ok(request) => {
            tracing::debug!(%tool, target = %request.target, "dispatching tool call");
            dispatch(client, request).await
        }
        Err(err) => {
            tracing::debug!(%tool, error = %err, "rejected tool call");
            ToolResult::error(err.to_string())
        }
    }
}
