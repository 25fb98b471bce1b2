use std::fmt::Debug;

use async_trait::async_trait;

use crate::error::Result;
use crate::pagination::PaginationWindow;
use crate::target::RepositoryTarget;
use crate::types::forge::{Comment, EditOptions, Issue, ListOptions, PullRequest};

/// Operations the tools need from a Forgejo/Gitea-compatible API.
///
/// Pull request comments live on the issue comment endpoints, so the comment
/// methods take either an issue or a pull request number.
#[async_trait]
pub trait ForgeClient: Send + Sync + Debug {
    async fn list_issues(&self, target: &RepositoryTarget, options: &ListOptions)
        -> Result<Vec<Issue>>;

    async fn edit_issue(
        &self,
        target: &RepositoryTarget,
        number: i64,
        edit: &EditOptions,
    ) -> Result<Issue>;

    async fn list_pull_requests(
        &self,
        target: &RepositoryTarget,
        options: &ListOptions,
    ) -> Result<Vec<PullRequest>>;

    async fn edit_pull_request(
        &self,
        target: &RepositoryTarget,
        number: i64,
        edit: &EditOptions,
    ) -> Result<PullRequest>;

    async fn list_comments(
        &self,
        target: &RepositoryTarget,
        number: i64,
        window: PaginationWindow,
    ) -> Result<Vec<Comment>>;

    async fn create_comment(
        &self,
        target: &RepositoryTarget,
        number: i64,
        body: &str,
    ) -> Result<Comment>;

    async fn edit_comment(
        &self,
        target: &RepositoryTarget,
        comment_id: i64,
        body: &str,
    ) -> Result<Comment>;
}
