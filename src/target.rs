use std::fmt;
use std::path::Path;

use crate::repo_resolver::{self, ResolutionError};
use crate::validate::FieldError;

/// The `owner/repo` pair a tool call acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryTarget {
    pub owner: String,
    pub repo: String,
}

impl RepositoryTarget {
    /// Build a target; both parts must be non-empty and free of `/`.
    pub fn new(owner: &str, repo: &str) -> Option<Self> {
        let valid = |s: &str| !s.is_empty() && !s.contains('/');
        (valid(owner) && valid(repo)).then(|| Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }

    /// Parse a strict `owner/repo` string (exactly one `/`, both sides non-empty).
    pub fn parse(full_name: &str) -> Option<Self> {
        let (owner, repo) = full_name.split_once('/')?;
        Self::new(owner, repo)
    }
}

impl fmt::Display for RepositoryTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Where the target should come from, after blank inputs are discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSource {
    Directory(String),
    Repository(RepositoryTarget),
}

/// Failure of [`resolve_target`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetError {
    /// Input-level problems, reported as field errors.
    Invalid(Vec<FieldError>),
    /// The directory is valid input but its git metadata could not be used.
    Resolution(ResolutionError),
}

const EITHER_REQUIRED: &str = "at least one of directory or repository must be provided";

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Apply the directory/repository precedence policy without reading git metadata.
///
/// A non-blank `directory` always wins and `repository` is then ignored entirely.
/// The directory is checked for existence here so that an unusable path is a field
/// error rather than a resolution failure.
pub fn check_target(
    directory: Option<&str>,
    repository: Option<&str>,
) -> Result<TargetSource, Vec<FieldError>> {
    if let Some(dir) = present(directory) {
        if !Path::new(dir).is_absolute() {
            return Err(vec![FieldError::new(
                "directory",
                "directory must be an absolute path",
            )]);
        }
        if repo_resolver::check_directory(dir).is_err() {
            return Err(vec![FieldError::new("directory", "invalid directory")]);
        }
        return Ok(TargetSource::Directory(dir.to_string()));
    }

    match present(repository) {
        Some(full_name) => RepositoryTarget::parse(full_name)
            .map(TargetSource::Repository)
            .ok_or_else(|| {
                vec![FieldError::new(
                    "repository",
                    "repository must be in format 'owner/repo'",
                )]
            }),
        None => Err(vec![
            FieldError::new("directory", EITHER_REQUIRED),
            FieldError::new("repository", EITHER_REQUIRED),
        ]),
    }
}

impl TargetSource {
    /// Finish resolution, reading git metadata for directory sources.
    pub fn resolve(self) -> Result<RepositoryTarget, ResolutionError> {
        match self {
            TargetSource::Repository(target) => Ok(target),
            TargetSource::Directory(dir) => repo_resolver::resolve_directory(&dir),
        }
    }
}

/// Resolve a tool call's repository target from its `directory` and `repository` inputs.
pub fn resolve_target(
    directory: Option<&str>,
    repository: Option<&str>,
) -> Result<RepositoryTarget, TargetError> {
    check_target(directory, repository)
        .map_err(TargetError::Invalid)?
        .resolve()
        .map_err(|e| match e {
            // The directory vanished between the check and the read.
            ResolutionError::InvalidDirectory { .. } => {
                TargetError::Invalid(vec![FieldError::new("directory", "invalid directory")])
            }
            other => TargetError::Resolution(other),
        })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn checkout(url: &str) -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join(".git")).unwrap();
        fs::write(
            tmp.path().join(".git/config"),
            format!("[remote \"origin\"]\n\turl = {url}\n"),
        )
        .unwrap();
        tmp
    }

    fn fields(err: TargetError) -> Vec<String> {
        match err {
            TargetError::Invalid(errors) => errors.iter().map(ToString::to_string).collect(),
            TargetError::Resolution(e) => panic!("unexpected resolution error: {e}"),
        }
    }

    #[test]
    fn both_absent_reports_both_fields() {
        for (dir, repo) in [(None, None), (Some(""), Some("")), (Some("  "), Some("\t"))] {
            let err = resolve_target(dir, repo).unwrap_err();
            assert_eq!(
                fields(err),
                vec![
                    "directory: at least one of directory or repository must be provided",
                    "repository: at least one of directory or repository must be provided",
                ]
            );
        }
    }

    #[test]
    fn repository_shape_is_enforced() {
        for bad in ["owner", "owner/", "/repo", "a/b/c", "/", "owner//repo"] {
            let err = resolve_target(None, Some(bad)).unwrap_err();
            assert_eq!(
                fields(err),
                vec!["repository: repository must be in format 'owner/repo'"],
                "{bad}"
            );
        }
    }

    #[test]
    fn well_formed_repository_is_accepted() {
        for (input, owner, repo) in [
            ("owner/repo", "owner", "repo"),
            ("a/b", "a", "b"),
            ("my-org/my.repo", "my-org", "my.repo"),
            (" owner/repo ", "owner", "repo"),
        ] {
            let target = resolve_target(None, Some(input)).unwrap();
            assert_eq!((target.owner.as_str(), target.repo.as_str()), (owner, repo));
        }
    }

    #[test]
    fn relative_directory_is_rejected() {
        let err = resolve_target(Some("relative/path"), None).unwrap_err();
        assert_eq!(
            fields(err),
            vec!["directory: directory must be an absolute path"]
        );
    }

    #[test]
    fn missing_directory_is_invalid_even_with_repository() {
        let err = resolve_target(Some("/non/existent/directory"), Some("owner/repo")).unwrap_err();
        assert_eq!(fields(err), vec!["directory: invalid directory"]);
    }

    #[test]
    fn directory_takes_precedence_over_repository() {
        let repo_a = checkout("https://example.com/owner-a/repo-a.git");
        let target = resolve_target(repo_a.path().to_str(), Some("owner-b/repo-b")).unwrap();
        assert_eq!(target.to_string(), "owner-a/repo-a");
    }

    #[test]
    fn malformed_repository_is_ignored_when_directory_given() {
        let repo_a = checkout("git@example.com:owner-a/repo-a.git");
        let target = resolve_target(repo_a.path().to_str(), Some("not-a-repo")).unwrap();
        assert_eq!(target.to_string(), "owner-a/repo-a");
    }

    #[test]
    fn git_failures_are_resolution_errors() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().to_str().unwrap();
        let err = resolve_target(Some(path), Some("owner/repo")).unwrap_err();
        assert_eq!(
            err,
            TargetError::Resolution(ResolutionError::NotAGitRepository(path.to_string()))
        );
    }
}
