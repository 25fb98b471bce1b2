use crate::error::{ForgeError, Result};

const URL_VARS: [&str; 3] = ["FORGEJO_URL", "GITEA_URL", "FORGEJO_REMOTE_URL"];
const TOKEN_VARS: [&str; 3] = ["FORGEJO_TOKEN", "GITEA_TOKEN", "FORGEJO_AUTH_TOKEN"];

/// Server configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    /// Base URL of the Forgejo/Gitea instance (e.g. `https://git.example.com`), no trailing `/`.
    pub base_url: String,
    /// API token sent as `Authorization: token <token>`.
    pub token: String,
    pub user_agent: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl Config {
    /// Build a configuration, normalizing the base URL and token.
    pub fn new(base_url: &str, token: &str) -> Result<Self> {
        let base_url = normalize_base_url(base_url)?;
        let token = token.trim();
        if token.is_empty() {
            return Err(ForgeError::Config("API token must not be empty".to_string()));
        }
        Ok(Self {
            base_url,
            token: token.to_string(),
            user_agent: default_user_agent(),
        })
    }

    /// Load configuration from environment variables (and `.env`, if present).
    ///
    /// The base URL is read from the first of `FORGEJO_URL`, `GITEA_URL` or
    /// `FORGEJO_REMOTE_URL` that is set; the token from `FORGEJO_TOKEN`, `GITEA_TOKEN`
    /// or `FORGEJO_AUTH_TOKEN`. `FORGEJO_USER_AGENT` overrides the user agent.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv(); // ignore missing .env
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let first = |keys: &[&str]| {
            keys.iter()
                .filter_map(|k| lookup(*k))
                .find(|v| !v.trim().is_empty())
        };

        let base_url = first(&URL_VARS).ok_or_else(|| {
            ForgeError::Config(format!(
                "no Forgejo/Gitea URL found; set {}",
                URL_VARS.join(" or ")
            ))
        })?;
        let token = first(&TOKEN_VARS).ok_or_else(|| {
            ForgeError::Config(format!("no API token found; set {}", TOKEN_VARS.join(" or ")))
        })?;

        let mut config = Self::new(&base_url, &token)?;
        if let Some(agent) = first(&["FORGEJO_USER_AGENT"]) {
            config.user_agent = agent.trim().to_string();
        }
        Ok(config)
    }
}

fn default_user_agent() -> String {
    format!("forgejo-mcp/{}", env!("CARGO_PKG_VERSION"))
}

fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = url::Url::parse(trimmed)
        .map_err(|e| ForgeError::Config(format!("invalid base URL '{raw}': {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") || !parsed.has_host() {
        return Err(ForgeError::Config(format!(
            "invalid base URL '{raw}': expected an http(s) URL"
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn new_trims_trailing_slash_and_token() {
        let config = Config::new(" https://git.example.com/ ", "  abc  ").unwrap();
        assert_eq!(config.base_url, "https://git.example.com");
        assert_eq!(config.token, "abc");
    }

    #[test]
    fn rejects_bad_urls_and_empty_token() {
        assert!(Config::new("git.example.com", "abc").is_err());
        assert!(Config::new("ftp://git.example.com", "abc").is_err());
        assert!(Config::new("https://git.example.com", "   ").is_err());
    }

    #[test]
    fn env_aliases_in_priority_order() {
        let config = Config::from_lookup(lookup(&[
            ("GITEA_URL", "https://gitea.example.com"),
            ("FORGEJO_REMOTE_URL", "https://ignored.example.com"),
            ("FORGEJO_AUTH_TOKEN", "tok"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "https://gitea.example.com");
        assert_eq!(config.token, "tok");
        assert!(config.user_agent.starts_with("forgejo-mcp/"));
    }

    #[test]
    fn missing_values_are_reported() {
        let err = Config::from_lookup(lookup(&[("FORGEJO_TOKEN", "tok")])).unwrap_err();
        assert!(err.to_string().contains("FORGEJO_URL"));

        let err =
            Config::from_lookup(lookup(&[("FORGEJO_URL", "https://x.example.com")])).unwrap_err();
        assert!(err.to_string().contains("FORGEJO_TOKEN"));
    }

    #[test]
    fn user_agent_override() {
        let config = Config::from_lookup(lookup(&[
            ("FORGEJO_URL", "https://x.example.com"),
            ("FORGEJO_TOKEN", "tok"),
            ("FORGEJO_USER_AGENT", "my-agent/1.0"),
        ]))
        .unwrap();
        assert_eq!(config.user_agent, "my-agent/1.0");
    }

    #[test]
    fn debug_redacts_token() {
        let config = Config::new("https://x.example.com", "supersecret").unwrap();
        assert!(!format!("{config:?}").contains("supersecret"));
    }
}
