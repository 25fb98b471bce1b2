use std::fs;
use std::path::{Path, PathBuf};

use crate::target::RepositoryTarget;

/// Why a local directory could not be turned into a repository target.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
    #[error("repository validate failed for {path}: {reason}")]
    InvalidDirectory { path: String, reason: &'static str },

    #[error("not a git repository: {0}")]
    NotAGitRepository(String),

    #[error("no remote 'origin' configured for {0}")]
    NoRemoteConfigured(String),

    #[error("unable to parse remote URL '{url}' for {path}")]
    UnparseableRemoteUrl { url: String, path: String },
}

/// A remote URL read from git metadata together with the identity it names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteDescriptor {
    pub url: String,
    pub target: RepositoryTarget,
}

impl RemoteDescriptor {
    /// Parse an HTTPS/SSH/git remote URL or an scp-style `user@host:owner/repo` string.
    pub fn parse(url: &str) -> Option<Self> {
        let url = url.trim();
        let path = remote_path(url)?;
        let path = path.trim_end_matches('/');
        let path = path.strip_suffix(".git").unwrap_or(path);

        let mut segments = path.rsplit('/');
        let repo = segments.next()?;
        let owner = segments.next()?;
        let target = RepositoryTarget::new(owner, repo)?;

        Some(Self {
            url: url.to_string(),
            target,
        })
    }
}

/// Extract the path portion of a remote URL, or `None` when the form is not recognized.
fn remote_path(url: &str) -> Option<String> {
    if url.contains("://") {
        let parsed = url::Url::parse(url).ok()?;
        return match parsed.scheme() {
            "http" | "https" | "ssh" | "git" | "git+ssh" | "ssh+git" if parsed.has_host() => {
                Some(parsed.path().trim_start_matches('/').to_string())
            }
            _ => None,
        };
    }

    // scp-like syntax: [user@]host:owner/repo.git
    let (host, path) = url.split_once(':')?;
    let host = host.rsplit_once('@').map_or(host, |(_, h)| h);
    if host.is_empty() || host.contains('/') || path.starts_with('/') {
        return None;
    }
    Some(path.to_string())
}

/// Check that `directory` exists and is a directory.
pub fn check_directory(directory: &str) -> Result<(), ResolutionError> {
    let invalid = |reason| ResolutionError::InvalidDirectory {
        path: directory.to_string(),
        reason,
    };
    match fs::metadata(directory) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(invalid("not a directory")),
        Err(_) => Err(invalid("directory does not exist")),
    }
}

/// Resolve owner/repo from the `origin` remote of the git checkout at `directory`.
///
/// Only `directory` itself is inspected; parent directories are never searched.
pub fn resolve_directory(directory: &str) -> Result<RepositoryTarget, ResolutionError> {
    check_directory(directory)?;

    let config_path = git_config_path(Path::new(directory))
        .ok_or_else(|| ResolutionError::NotAGitRepository(directory.to_string()))?;
    let content = fs::read_to_string(&config_path)
        .map_err(|_| ResolutionError::NotAGitRepository(directory.to_string()))?;

    let url = origin_url(&content)
        .ok_or_else(|| ResolutionError::NoRemoteConfigured(directory.to_string()))?;

    RemoteDescriptor::parse(&url)
        .map(|remote| {
            tracing::debug!(directory, url = %remote.url, target = %remote.target, "resolved directory");
            remote.target
        })
        .ok_or_else(|| ResolutionError::UnparseableRemoteUrl {
            url,
            path: directory.to_string(),
        })
}

/// Locate the git config for a checkout, following a `.git` file's `gitdir:` pointer.
fn git_config_path(directory: &Path) -> Option<PathBuf> {
    let dot_git = directory.join(".git");
    let meta = fs::metadata(&dot_git).ok()?;

    let git_dir = if meta.is_dir() {
        dot_git
    } else {
        let content = fs::read_to_string(&dot_git).ok()?;
        let target = content
            .lines()
            .find_map(|line| line.trim().strip_prefix("gitdir:"))?
            .trim();
        let target = Path::new(target);
        let linked = if target.is_absolute() {
            target.to_path_buf()
        } else {
            directory.join(target)
        };
        // Worktrees keep their config in the common dir.
        match fs::read_to_string(linked.join("commondir")) {
            Ok(common) => linked.join(common.trim()),
            Err(_) => linked,
        }
    };

    let config = git_dir.join("config");
    config.is_file().then_some(config)
}

/// Find `url = ...` inside the `[remote "origin"]` section of a git config.
fn origin_url(content: &str) -> Option<String> {
    let mut in_origin = false;
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with('[') {
            in_origin = is_origin_header(trimmed);
            continue;
        }
        if !in_origin || trimmed.starts_with('#') || trimmed.starts_with(';') {
            continue;
        }
        if let Some((key, value)) = trimmed.split_once('=') {
            if key.trim().eq_ignore_ascii_case("url") {
                let value = value.trim().trim_matches('"');
                if !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
    }
    None
}

fn is_origin_header(header: &str) -> bool {
    let inner = header.trim_start_matches('[').trim_end_matches(']').trim();
    match inner.split_once(char::is_whitespace) {
        Some((section, name)) => {
            section.eq_ignore_ascii_case("remote") && name.trim() == "\"origin\""
        }
        None => inner.eq_ignore_ascii_case("remote.origin"),
    }
}
