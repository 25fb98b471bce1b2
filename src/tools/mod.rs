//! The closed set of tools, their field schemas and handlers.

use std::fmt;
use std::str::FromStr;

use crate::error::ForgeError;
use crate::response::ToolResult;
use crate::target::TargetSource;
use crate::types::forge::{EditOptions, ListOptions};
use crate::validate::{JsonObject, ValidationErrors, Validator};

pub mod comments;
pub mod issues;
pub mod pulls;

use comments::{CommentCreate, CommentEdit, CommentList};

/// Every tool this server exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    IssueList,
    IssueEdit,
    IssueCommentList,
    IssueCommentCreate,
    IssueCommentEdit,
    PrList,
    PrEdit,
    PrCommentList,
    PrCommentCreate,
    PrCommentEdit,
}

impl ToolName {
    pub const ALL: [ToolName; 10] = [
        ToolName::IssueList,
        ToolName::IssueEdit,
        ToolName::IssueCommentList,
        ToolName::IssueCommentCreate,
        ToolName::IssueCommentEdit,
        ToolName::PrList,
        ToolName::PrEdit,
        ToolName::PrCommentList,
        ToolName::PrCommentCreate,
        ToolName::PrCommentEdit,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ToolName::IssueList => "issue_list",
            ToolName::IssueEdit => "issue_edit",
            ToolName::IssueCommentList => "issue_comment_list",
            ToolName::IssueCommentCreate => "issue_comment_create",
            ToolName::IssueCommentEdit => "issue_comment_edit",
            ToolName::PrList => "pr_list",
            ToolName::PrEdit => "pr_edit",
            ToolName::PrCommentList => "pr_comment_list",
            ToolName::PrCommentCreate => "pr_comment_create",
            ToolName::PrCommentEdit => "pr_comment_edit",
        }
    }

    /// Run this tool's field schema over raw arguments.
    ///
    /// Fields are checked in declaration order (`directory` and `repository` first),
    /// which fixes the order of reported errors.
    pub fn parse_args(self, args: &JsonObject) -> Result<(TargetSource, ToolCall), ValidationErrors> {
        let mut v = Validator::new(args);
        let parsed = match self {
            ToolName::IssueList => list(&mut v).map(|(s, o)| (s, ToolCall::IssueList(o))),
            ToolName::PrList => list(&mut v).map(|(s, o)| (s, ToolCall::PrList(o))),
            ToolName::IssueEdit => {
                edit(&mut v, "issue_number").map(|(s, e)| (s, ToolCall::IssueEdit(e)))
            }
            ToolName::PrEdit => {
                edit(&mut v, "pull_request_number").map(|(s, e)| (s, ToolCall::PrEdit(e)))
            }
            ToolName::IssueCommentList => CommentList::parse(&mut v, "issue_number")
                .map(|(s, c)| (s, ToolCall::IssueCommentList(c))),
            ToolName::PrCommentList => CommentList::parse(&mut v, "pull_request_number")
                .map(|(s, c)| (s, ToolCall::PrCommentList(c))),
            ToolName::IssueCommentCreate => CommentCreate::parse(&mut v, "issue_number")
                .map(|(s, c)| (s, ToolCall::IssueCommentCreate(c))),
            ToolName::PrCommentCreate => CommentCreate::parse(&mut v, "pull_request_number")
                .map(|(s, c)| (s, ToolCall::PrCommentCreate(c))),
            ToolName::IssueCommentEdit => CommentEdit::parse(&mut v, "issue_number")
                .map(|(s, c)| (s, ToolCall::IssueCommentEdit(c))),
            ToolName::PrCommentEdit => CommentEdit::parse(&mut v, "pull_request_number")
                .map(|(s, c)| (s, ToolCall::PrCommentEdit(c))),
        };
        parsed.ok_or_else(|| v.into_errors())
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ToolName {
    type Err = ForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolName::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| ForgeError::UnknownTool(s.to_string()))
    }
}

/// A validated call, carrying the typed inputs for its handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCall {
    IssueList(ListOptions),
    IssueEdit(EditRequest),
    IssueCommentList(CommentList),
    IssueCommentCreate(CommentCreate),
    IssueCommentEdit(CommentEdit),
    PrList(ListOptions),
    PrEdit(EditRequest),
    PrCommentList(CommentList),
    PrCommentCreate(CommentCreate),
    PrCommentEdit(CommentEdit),
}

/// Edit of an issue or pull request identified by `number`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRequest {
    pub number: i64,
    pub edit: EditOptions,
}

/// Wrap an upstream failure as an error result, passing the upstream message through.
pub(crate) fn upstream_failure(action: &str, err: ForgeError) -> ToolResult {
    tracing::warn!(action, error = %err, "forge API call failed");
    ToolResult::error(format!("Failed to {action}: {err}"))
}

const LIST_STATES: &[&str] = &["open", "closed", "all"];
const EDIT_STATES: &[&str] = &["open", "closed"];
const MAX_TITLE: usize = 255;
const MAX_BODY: usize = 65535;

// directory, repository, limit, offset, state
fn list(v: &mut Validator<'_>) -> Option<(TargetSource, ListOptions)> {
    let source = v.target();
    let window = v.pagination();
    let state = v.optional_choice("state", LIST_STATES);
    let (Some(source), Some(window), Some(state)) = (source, window, state) else {
        return None;
    };
    let state = state.unwrap_or_else(|| "open".to_string());
    Some((source, ListOptions { window, state }))
}

// directory, repository, <number>, title, body, state
fn edit(v: &mut Validator<'_>, number_field: &'static str) -> Option<(TargetSource, EditRequest)> {
    let source = v.target();
    let number = v.positive_id(number_field);
    let title = v.optional_text("title", 1, MAX_TITLE);
    let body = v.optional_text("body", 1, MAX_BODY);
    let state = v.optional_choice("state", EDIT_STATES);
    let any = v.require_any(&["title", "body", "state"]);
    let (Some(source), Some(number), Some(title), Some(body), Some(state), Some(())) =
        (source, number, title, body, state, any)
    else {
        return None;
    };
    Some((
        source,
        EditRequest {
            number,
            edit: EditOptions { title, body, state },
        },
    ))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::pagination::PaginationWindow;

    fn object(value: serde_json::Value) -> JsonObject {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn names_round_trip_through_from_str() {
        for tool in ToolName::ALL {
            assert_eq!(tool.name().parse::<ToolName>().unwrap(), tool);
        }
    }

    #[test]
    fn unknown_tool_is_rejected() {
        let err = "issue_delete".parse::<ToolName>().unwrap_err();
        assert_eq!(err.to_string(), "unknown tool: issue_delete");
    }

    #[test]
    fn list_defaults() {
        let (source, call) = ToolName::PrList
            .parse_args(&object(json!({"repository": "o/r"})))
            .unwrap();
        assert!(matches!(source, TargetSource::Repository(_)));
        assert_eq!(
            call,
            ToolCall::PrList(ListOptions {
                window: PaginationWindow::default(),
                state: "open".to_string(),
            })
        );
    }

    #[test]
    fn edit_collects_given_fields() {
        let (_, call) = ToolName::IssueEdit
            .parse_args(&object(json!({
                "repository": "o/r",
                "issue_number": 12,
                "state": "closed",
            })))
            .unwrap();
        assert_eq!(
            call,
            ToolCall::IssueEdit(EditRequest {
                number: 12,
                edit: EditOptions {
                    title: None,
                    body: None,
                    state: Some("closed".to_string()),
                },
            })
        );
    }

    #[test]
    fn unknown_arguments_are_ignored() {
        assert!(ToolName::IssueList
            .parse_args(&object(json!({"repository": "o/r", "owner": "x", "page": 3})))
            .is_ok());
    }
}
