use rmcp::model::{CallToolResult, Content};
use serde::Serialize;
use serde_json::Value;

use crate::types::forge::{BranchRef, Comment, Issue, PullRequest, User};

/// The outcome of one tool call: summary text, optional typed payload, error flag.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResult {
    pub text: String,
    pub structured: Option<Value>,
    pub is_error: bool,
}

impl ToolResult {
    pub fn success(text: impl Into<String>, structured: Value) -> Self {
        Self {
            text: text.into(),
            structured: Some(structured),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            structured: None,
            is_error: true,
        }
    }
}

impl From<ToolResult> for CallToolResult {
    fn from(result: ToolResult) -> Self {
        let content = vec![Content::text(result.text)];
        let mut call = if result.is_error {
            CallToolResult::error(content)
        } else {
            CallToolResult::success(content)
        };
        call.structured_content = result.structured;
        call
    }
}

fn login(user: &Option<User>) -> String {
    user.as_ref().map(|u| u.login.clone()).unwrap_or_default()
}

/// Structured view of a comment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentView {
    pub id: i64,
    pub body: String,
    pub user: String,
    pub created: String,
    pub updated: String,
}

impl From<&Comment> for CommentView {
    fn from(c: &Comment) -> Self {
        Self {
            id: c.id,
            body: c.body.clone(),
            user: login(&c.user),
            created: c.created_at.clone(),
            updated: c.updated_at.clone(),
        }
    }
}

/// Structured view of an issue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssueView {
    pub number: i64,
    pub title: String,
    pub body: String,
    pub state: String,
    pub user: String,
    pub comments: i64,
    pub url: String,
    pub created: String,
    pub updated: String,
}

impl From<&Issue> for IssueView {
    fn from(i: &Issue) -> Self {
        Self {
            number: i.number,
            title: i.title.clone(),
            body: i.body.clone(),
            state: i.state.clone(),
            user: login(&i.user),
            comments: i.comments,
            url: i.html_url.clone(),
            created: i.created_at.clone(),
            updated: i.updated_at.clone(),
        }
    }
}

/// Structured view of a pull request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PullRequestView {
    pub number: i64,
    pub title: String,
    pub body: String,
    pub state: String,
    pub user: String,
    pub merged: bool,
    pub head: String,
    pub base: String,
    pub url: String,
    pub created: String,
    pub updated: String,
}

impl From<&PullRequest> for PullRequestView {
    fn from(pr: &PullRequest) -> Self {
        let branch = |r: &Option<BranchRef>| {
            r.as_ref().map(|b| b.ref_name.clone()).unwrap_or_default()
        };
        Self {
            number: pr.number,
            title: pr.title.clone(),
            body: pr.body.clone(),
            state: pr.state.clone(),
            user: login(&pr.user),
            merged: pr.merged,
            head: branch(&pr.head),
            base: branch(&pr.base),
            url: pr.html_url.clone(),
            created: pr.created_at.clone(),
            updated: pr.updated_at.clone(),
        }
    }
}

fn count(n: usize, singular: &str, plural: &str) -> String {
    if n == 1 {
        format!("Found 1 {singular}")
    } else {
        format!("Found {n} {plural}")
    }
}

/// Summary line for a created comment.
pub fn format_comment_created(comment: &Comment) -> String {
    format!(
        "Comment created successfully. ID: {}, Created: {}\nComment body: {}",
        comment.id, comment.created_at, comment.body
    )
}

/// Summary line for an edited comment.
pub fn format_comment_edited(comment: &Comment) -> String {
    format!(
        "Comment edited successfully. ID: {}, Updated: {}\nComment body: {}",
        comment.id, comment.updated_at, comment.body
    )
}

/// Format a list of comments.
pub fn format_comment_list(comments: &[Comment]) -> String {
    if comments.is_empty() {
        return "No comments found.".to_string();
    }
    let entries = comments
        .iter()
        .map(|c| {
            format!(
                "**Comment #{}** by {} ({}):\n{}",
                c.id,
                c.user.as_ref().map_or("unknown", |u| u.login.as_str()),
                c.created_at,
                c.body
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n---\n\n");
    format!("{}\n\n{entries}", count(comments.len(), "comment", "comments"))
}

/// Format a list of issues.
pub fn format_issue_list(issues: &[Issue]) -> String {
    if issues.is_empty() {
        return "No issues found.".to_string();
    }
    let lines = issues
        .iter()
        .map(|i| {
            format!(
                "- #{} {} ({}) by {}, updated {}",
                i.number,
                i.title,
                i.state,
                i.user.as_ref().map_or("unknown", |u| u.login.as_str()),
                i.updated_at
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    format!("{}\n{lines}", count(issues.len(), "issue", "issues"))
}

/// Format a list of pull requests.
pub fn format_pr_list(prs: &[PullRequest]) -> String {
    if prs.is_empty() {
        return "No pull requests found.".to_string();
    }
    let lines = prs
        .iter()
        .map(|pr| {
            let branches = match (&pr.head, &pr.base) {
                (Some(head), Some(base)) => format!(" [{} -> {}]", head.ref_name, base.ref_name),
                _ => String::new(),
            };
            format!("- PR #{} {} ({}){branches}", pr.number, pr.title, pr.state)
        })
        .collect::<Vec<_>>()
        .join("\n");
    format!("{}\n{lines}", count(prs.len(), "pull request", "pull requests"))
}

/// Summary for an edited issue.
pub fn format_issue_edited(issue: &Issue) -> String {
    let mut text = format!(
        "Issue edited successfully. Number: {}, Title: {}, State: {}, Updated: {}",
        issue.number, issue.title, issue.state, issue.updated_at
    );
    if !issue.body.is_empty() {
        text.push_str(&format!("\nBody: {}", issue.body));
    }
    text
}

/// Summary for an edited pull request.
pub fn format_pr_edited(pr: &PullRequest) -> String {
    let mut text = format!(
        "Pull request edited successfully. Number: {}, Title: {}, State: {}, Updated: {}",
        pr.number, pr.title, pr.state, pr.updated_at
    );
    if !pr.body.is_empty() {
        text.push_str(&format!("\nBody: {}", pr.body));
    }
    text
}
