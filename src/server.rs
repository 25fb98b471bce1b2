use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::{tool, tool_handler, tool_router, ServerHandler};

use crate::client::{ForgeClient, GiteaClient};
use crate::config::Config;
use crate::dispatch;
use crate::error::ForgeError;
use crate::response::ToolResult;
use crate::tools::ToolName;
use crate::types::common::RawArgs;
use crate::validate::JsonObject;

// Tool parameter types (input schemas only; arguments are validated from raw JSON)
use crate::tools::comments::{
    IssueCommentCreateParams, IssueCommentEditParams, IssueCommentListParams,
    PrCommentCreateParams, PrCommentEditParams, PrCommentListParams,
};
use crate::tools::issues::{IssueEditParams, IssueListParams};
use crate::tools::pulls::{PrEditParams, PrListParams};

/// MCP server exposing Forgejo/Gitea issue and pull request tools.
///
/// Holds no per-request state; clones share the same API client.
#[derive(Debug, Clone)]
pub struct ForgejoMcp {
    client: Arc<dyn ForgeClient>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl ForgejoMcp {
    pub fn new(config: Config) -> Result<Self, ForgeError> {
        let client = GiteaClient::new(&config)?;
        Ok(Self::with_client(Arc::new(client)))
    }

    /// Build a server around any [`ForgeClient`] implementation.
    pub fn with_client(client: Arc<dyn ForgeClient>) -> Self {
        Self {
            client,
            tool_router: Self::tool_router(),
        }
    }

    /// Validate and run one tool call.
    pub async fn call(&self, tool: ToolName, args: JsonObject) -> ToolResult {
        dispatch::handle(self.client.as_ref(), tool, &args).await
    }

    /// Like [`ForgejoMcp::call`], looking the tool up by its protocol name.
    pub async fn call_by_name(&self, name: &str, args: JsonObject) -> Result<ToolResult, ForgeError> {
        let tool: ToolName = name.parse()?;
        Ok(self.call(tool, args).await)
    }

    async fn run(&self, tool: ToolName, args: JsonObject) -> Result<CallToolResult, ErrorData> {
        Ok(self.call(tool, args).await.into())
    }

    // ── Issues ──────────────────────────────────────────────────────

    #[tool(description = "Use this when you need to list issues in a repository. Identify the repository with `repository` (owner/repo) or `directory` (absolute path to a local checkout). Supports limit/offset pagination and filtering by state (open/closed/all).")]
    async fn issue_list(&self, Parameters(p): Parameters<RawArgs<IssueListParams>>) -> Result<CallToolResult, ErrorData> {
        self.run(ToolName::IssueList, p.into_inner()).await
    }

    #[tool(description = "Use this when you need to update an existing issue: change its title, body, or state (open/closed). Requires the issue number and at least one field to change.")]
    async fn issue_edit(&self, Parameters(p): Parameters<RawArgs<IssueEditParams>>) -> Result<CallToolResult, ErrorData> {
        self.run(ToolName::IssueEdit, p.into_inner()).await
    }

    // ── Issue Comments ──────────────────────────────────────────────

    #[tool(description = "Use this when you need to list comments on an issue. Returns comment IDs, authors, dates, and bodies. Supports limit/offset pagination.")]
    async fn issue_comment_list(&self, Parameters(p): Parameters<RawArgs<IssueCommentListParams>>) -> Result<CallToolResult, ErrorData> {
        self.run(ToolName::IssueCommentList, p.into_inner()).await
    }

    #[tool(description = "Use this when you need to add a comment to an existing issue. Provide the issue number and a non-blank comment.")]
    async fn issue_comment_create(&self, Parameters(p): Parameters<RawArgs<IssueCommentCreateParams>>) -> Result<CallToolResult, ErrorData> {
        self.run(ToolName::IssueCommentCreate, p.into_inner()).await
    }

    #[tool(description = "Use this when you need to replace the content of an existing issue comment. Provide the issue number, comment ID, and the new content.")]
    async fn issue_comment_edit(&self, Parameters(p): Parameters<RawArgs<IssueCommentEditParams>>) -> Result<CallToolResult, ErrorData> {
        self.run(ToolName::IssueCommentEdit, p.into_inner()).await
    }

    // ── Pull Requests ───────────────────────────────────────────────

    #[tool(description = "Use this when you need to list pull requests in a repository. Supports limit/offset pagination and filtering by state (open/closed/all).")]
    async fn pr_list(&self, Parameters(p): Parameters<RawArgs<PrListParams>>) -> Result<CallToolResult, ErrorData> {
        self.run(ToolName::PrList, p.into_inner()).await
    }

    #[tool(description = "Use this when you need to update a pull request: change its title, body, or state (open/closed). Requires the pull request number and at least one field to change.")]
    async fn pr_edit(&self, Parameters(p): Parameters<RawArgs<PrEditParams>>) -> Result<CallToolResult, ErrorData> {
        self.run(ToolName::PrEdit, p.into_inner()).await
    }

    // ── Pull Request Comments ───────────────────────────────────────

    #[tool(description = "Use this when you need to list comments on a pull request. Returns comment IDs, authors, dates, and bodies. Supports limit/offset pagination.")]
    async fn pr_comment_list(&self, Parameters(p): Parameters<RawArgs<PrCommentListParams>>) -> Result<CallToolResult, ErrorData> {
        self.run(ToolName::PrCommentList, p.into_inner()).await
    }

    #[tool(description = "Use this when you need to add a comment to a pull request. Provide the pull request number and a non-blank comment.")]
    async fn pr_comment_create(&self, Parameters(p): Parameters<RawArgs<PrCommentCreateParams>>) -> Result<CallToolResult, ErrorData> {
        self.run(ToolName::PrCommentCreate, p.into_inner()).await
    }

    #[tool(description = "Use this when you need to replace the content of an existing pull request comment. Provide the pull request number, comment ID, and the new content.")]
    async fn pr_comment_edit(&self, Parameters(p): Parameters<RawArgs<PrCommentEditParams>>) -> Result<CallToolResult, ErrorData> {
        self.run(ToolName::PrCommentEdit, p.into_inner()).await
    }
}

#[tool_handler]
impl ServerHandler for ForgejoMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "forgejo-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                description: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Forgejo/Gitea MCP server for listing and editing issues and pull requests and \
                 their comments. Identify the repository with `repository` (owner/repo) or \
                 `directory` (absolute path to a local checkout; takes precedence)."
                    .to_string(),
            ),
        }
    }
}
