use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use url::Url;

pub const DEFAULT_API_URL: &str = "https://closet-recruiting-api.azurewebsites.net/api/data";

/// File-level settings; every field is optional so a partial `closet.toml` works.
#[derive(Debug, Deserialize, Clone, Default)]
pub(crate) struct ConfigFile {
    #[serde(default)]
    pub(crate) api_url: Option<String>,
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
    #[serde(default)]
    pub(crate) user_agent: Option<String>,
    #[serde(default)]
    pub(crate) session_path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: Url,
    pub timeout: Duration,
    pub user_agent: String,
    /// Explicit token file; `None` uses the platform data directory.
    pub session_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: Url::parse(DEFAULT_API_URL).expect("default endpoint is a valid URL"),
            timeout: Duration::from_secs(30),
            user_agent: concat!("closet/", env!("CARGO_PKG_VERSION")).to_string(),
            session_path: None,
        }
    }
}

impl Config {
    /// Defaults, then the config file (explicit path or `closet.toml` in the
    /// user's config dir, if present), then `CLOSET_*` environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => Some(read_file(p)?),
            None => match default_config_path() {
                Some(p) if p.exists() => Some(read_file(&p)?),
                _ => None,
            },
        };
        let mut cfg = Self::default();
        if let Some(f) = file {
            cfg.apply_file(f)?;
        }
        cfg.apply_env(|k| std::env::var(k).ok())?;
        Ok(cfg)
    }

    pub fn with_api_url(mut self, url: &str) -> Result<Self> {
        self.api_url = parse_endpoint(url)?;
        Ok(self)
    }

    fn apply_file(&mut self, f: ConfigFile) -> Result<()> {
        if let Some(u) = f.api_url {
            self.api_url = parse_endpoint(&u)?;
        }
        if let Some(t) = f.timeout_secs {
            self.timeout = Duration::from_secs(t);
        }
        if let Some(ua) = f.user_agent {
            self.user_agent = ua;
        }
        if f.session_path.is_some() {
            self.session_path = f.session_path;
        }
        Ok(())
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(u) = var("CLOSET_API_URL").filter(|s| !s.trim().is_empty()) {
            self.api_url = parse_endpoint(&u)?;
        }
        if let Some(t) = var("CLOSET_TIMEOUT_SECS").and_then(|s| s.parse().ok()) {
            self.timeout = Duration::from_secs(t);
        }
        if let Some(p) = var("CLOSET_SESSION_PATH").filter(|s| !s.trim().is_empty()) {
            self.session_path = Some(PathBuf::from(p));
        }
        Ok(())
    }
}

fn read_file(path: &Path) -> Result<ConfigFile> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config: {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("parsing config: {}", path.display()))
}

fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("dev", "closet", "closet").map(|p| p.config_dir().join("closet.toml"))
}

fn parse_endpoint(s: &str) -> Result<Url> {
    let url = Url::parse(s.trim()).with_context(|| format!("invalid endpoint URL: {s}"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => anyhow::bail!("unsupported endpoint scheme `{}` in {}", other, s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn file_values_override_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("closet.toml");
        let body = "api_url = \"http://localhost:8080/api/data\"\ntimeout_secs = 5\n";
        std::fs::write(&path, body).unwrap();
        let cfg = Config::load(Some(&path)).unwrap();
        assert_eq!(cfg.api_url.as_str(), "http://localhost:8080/api/data");
        assert_eq!(cfg.timeout, Duration::from_secs(5));
        assert!(cfg.user_agent.starts_with("closet/"));
    }

    #[test]
    fn env_wins_over_file() {
        let mut cfg = Config::default();
        cfg.apply_file(ConfigFile { timeout_secs: Some(9), ..Default::default() }).unwrap();
        let env: HashMap<&str, &str> = [
            ("CLOSET_API_URL", "https://staging.example/api"),
            ("CLOSET_TIMEOUT_SECS", "nope"),
            ("CLOSET_SESSION_PATH", "/tmp/tok"),
        ]
        .into_iter()
        .collect();
        cfg.apply_env(|k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(cfg.api_url.as_str(), "https://staging.example/api");
        // Unparsable numbers are ignored.
        assert_eq!(cfg.timeout, Duration::from_secs(9));
        assert_eq!(cfg.session_path, Some(PathBuf::from("/tmp/tok")));
    }

    #[test]
    fn rejects_non_http_endpoints() {
        assert!(Config::default().with_api_url("ftp://example.com/data").is_err());
        assert!(Config::default().with_api_url("not a url").is_err());
    }

    #[test]
    fn bad_toml_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("closet.toml");
        std::fs::write(&path, "timeout_secs = \"soon\"").unwrap();
        assert!(Config::load(Some(&path)).is_err());
    }
}
