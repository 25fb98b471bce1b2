//! Comment tools. Pull request comments share the issue comment endpoints.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;

use crate::client::ForgeClient;
use crate::pagination::PaginationWindow;
use crate::response::{self, CommentView, ToolResult};
use crate::target::{RepositoryTarget, TargetSource};
use crate::types::common::{PaginationParams, RepoParams};
use crate::validate::Validator;

use super::upstream_failure;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct IssueCommentListParams {
    #[serde(flatten)]
    pub repo: RepoParams,
    /// Issue number (>= 1).
    pub issue_number: i64,
    #[serde(flatten)]
    pub page: PaginationParams,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct IssueCommentCreateParams {
    #[serde(flatten)]
    pub repo: RepoParams,
    /// Issue number (>= 1).
    pub issue_number: i64,
    /// Comment body in markdown. Must not be blank.
    pub comment: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct IssueCommentEditParams {
    #[serde(flatten)]
    pub repo: RepoParams,
    /// Issue number the comment belongs to (>= 1).
    pub issue_number: i64,
    /// ID of the comment to edit (>= 1).
    pub comment_id: i64,
    /// Replacement comment body in markdown. Must not be blank.
    pub new_content: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct PrCommentListParams {
    #[serde(flatten)]
    pub repo: RepoParams,
    /// Pull request number (>= 1).
    pub pull_request_number: i64,
    #[serde(flatten)]
    pub page: PaginationParams,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct PrCommentCreateParams {
    #[serde(flatten)]
    pub repo: RepoParams,
    /// Pull request number (>= 1).
    pub pull_request_number: i64,
    /// Comment body in markdown. Must not be blank.
    pub comment: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct PrCommentEditParams {
    #[serde(flatten)]
    pub repo: RepoParams,
    /// Pull request number the comment belongs to (>= 1).
    pub pull_request_number: i64,
    /// ID of the comment to edit (>= 1).
    pub comment_id: i64,
    /// Replacement comment body in markdown. Must not be blank.
    pub new_content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentList {
    pub number: i64,
    pub window: PaginationWindow,
}

impl CommentList {
    // directory, repository, <number>, limit, offset
    pub(crate) fn parse(
        v: &mut Validator<'_>,
        number_field: &'static str,
    ) -> Option<(TargetSource, Self)> {
        let source = v.target();
        let number = v.positive_id(number_field);
        let window = v.pagination();
        let (Some(source), Some(number), Some(window)) = (source, number, window) else {
            return None;
        };
        Some((source, Self { number, window }))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentCreate {
    pub number: i64,
    pub body: String,
}

impl CommentCreate {
    // directory, repository, <number>, comment
    pub(crate) fn parse(
        v: &mut Validator<'_>,
        number_field: &'static str,
    ) -> Option<(TargetSource, Self)> {
        let source = v.target();
        let number = v.positive_id(number_field);
        let body = v.non_blank("comment");
        let (Some(source), Some(number), Some(body)) = (source, number, body) else {
            return None;
        };
        Some((source, Self { number, body }))
    }
}

/// Replacement body for one comment.
///
/// The Forge API addresses comments by ID alone, so `number` is validated and
/// logged but not sent upstream and not checked against the comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentEdit {
    pub number: i64,
    pub comment_id: i64,
    pub body: String,
}

impl CommentEdit {
    // directory, repository, <number>, comment_id, new_content
    pub(crate) fn parse(
        v: &mut Validator<'_>,
        number_field: &'static str,
    ) -> Option<(TargetSource, Self)> {
        let source = v.target();
        let number = v.positive_id(number_field);
        let comment_id = v.positive_id("comment_id");
        let body = v.non_blank("new_content");
        let (Some(source), Some(number), Some(comment_id), Some(body)) =
            (source, number, comment_id, body)
        else {
            return None;
        };
        Some((
            source,
            Self {
                number,
                comment_id,
                body,
            },
        ))
    }
}

pub async fn comment_list(
    client: &dyn ForgeClient,
    target: &RepositoryTarget,
    req: CommentList,
) -> ToolResult {
    match client.list_comments(target, req.number, req.window).await {
        Ok(comments) => {
            let views: Vec<CommentView> = comments.iter().map(CommentView::from).collect();
            ToolResult::success(
                response::format_comment_list(&comments),
                json!({ "comments": views, "total": views.len() }),
            )
        }
        Err(e) => upstream_failure("list comments", e),
    }
}

pub async fn comment_create(
    client: &dyn ForgeClient,
    target: &RepositoryTarget,
    req: CommentCreate,
) -> ToolResult {
    match client.create_comment(target, req.number, &req.body).await {
        Ok(comment) => ToolResult::success(
            response::format_comment_created(&comment),
            json!({ "comment": CommentView::from(&comment) }),
        ),
        Err(e) => upstream_failure("create comment", e),
    }
}

pub async fn comment_edit(
    client: &dyn ForgeClient,
    target: &RepositoryTarget,
    req: CommentEdit,
) -> ToolResult {
    tracing::debug!(number = req.number, comment_id = req.comment_id, "editing comment");
    match client.edit_comment(target, req.comment_id, &req.body).await {
        Ok(comment) => ToolResult::success(
            response::format_comment_edited(&comment),
            json!({ "comment": CommentView::from(&comment) }),
        ),
        Err(e) => upstream_failure("edit comment", e),
    }
}
