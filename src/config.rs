use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Vite dev server, which serves the fixtures from `public/`.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5173/";

pub const ENV_BASE_URL: &str = "MINIHUB_BASE_URL";
pub const ENV_DATABASE_URL: &str = "MINIHUB_DATABASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "MINIHUB_TIMEOUT_SECS";

/// On-disk form of the config; every field is optional.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    base_url: Option<String>,
    #[serde(default)]
    database_url: Option<String>,
    #[serde(default)]
    request_timeout_secs: Option<u64>,
    #[serde(default)]
    run_migrations: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HubConfig {
    /// Root the fixture paths are resolved against. Always ends in '/'.
    pub base_url: Url,
    /// `None` uses the SQLite file in the user's data directory.
    pub database_url: Option<String>,
    /// `None` leaves request duration unbounded.
    pub request_timeout: Option<Duration>,
    pub run_migrations: bool,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base url is valid"),
            database_url: None,
            request_timeout: None,
            run_migrations: true,
        }
    }
}

impl HubConfig {
    /// Defaults, then the config file, then `MINIHUB_*` environment variables.
    ///
    /// Without an explicit `path` the per-user `config.toml` is read if it exists.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut cfg = Self::default();
        match path {
            Some(p) => {
                let text = fs::read_to_string(p).with_context(|| format!("reading config {}", p.display()))?;
                cfg.apply_toml(&text).with_context(|| format!("in config {}", p.display()))?;
            }
            None => {
                if let Some(p) = default_config_path().filter(|p| p.exists()) {
                    let text = fs::read_to_string(&p).with_context(|| format!("reading config {}", p.display()))?;
                    cfg.apply_toml(&text).with_context(|| format!("in config {}", p.display()))?;
                }
            }
        }
        cfg.apply_env(|k| std::env::var(k).ok())?;
        Ok(cfg)
    }

    pub fn apply_toml(&mut self, text: &str) -> Result<()> {
        let file: FileConfig = toml::from_str(text).context("parsing config toml")?;
        if let Some(u) = file.base_url { self.base_url = parse_base_url(&u)?; }
        if let Some(d) = file.database_url { self.database_url = Some(d).filter(|d| !d.trim().is_empty()); }
        if let Some(t) = file.request_timeout_secs { self.request_timeout = timeout_from_secs(t); }
        if let Some(m) = file.run_migrations { self.run_migrations = m; }
        Ok(())
    }

    /// Override from environment-style lookups; unset or empty values are skipped.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where F: Fn(&str) -> Option<String> {
        let get = |k: &str| lookup(k).filter(|v| !v.trim().is_empty());
        if let Some(u) = get(ENV_BASE_URL) {
            self.base_url = parse_base_url(&u).with_context(|| format!("in {ENV_BASE_URL}"))?;
        }
        if let Some(d) = get(ENV_DATABASE_URL) { self.database_url = Some(d); }
        if let Some(t) = get(ENV_TIMEOUT_SECS) {
            let secs: u64 = t.trim().parse().with_context(|| format!("{ENV_TIMEOUT_SECS} must be a whole number of seconds, got '{t}'"))?;
            self.request_timeout = timeout_from_secs(secs);
        }
        Ok(())
    }
}

/// Parse a base URL, adding the trailing slash that relative joins rely on.
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim()).with_context(|| format!("invalid base url: {raw}"))?;
    if url.cannot_be_a_base() {
        return Err(anyhow!("base url cannot have paths joined onto it: {raw}"));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn timeout_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("dev", "minihub", "minihub").map(|p| p.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults() {
        let cfg = HubConfig::default();
        assert_eq!(cfg.base_url.as_str(), DEFAULT_BASE_URL);
        assert!(cfg.database_url.is_none());
        assert!(cfg.request_timeout.is_none());
        assert!(cfg.run_migrations);
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        assert_eq!(parse_base_url("http://example.com/app").unwrap().as_str(), "http://example.com/app/");
        assert_eq!(parse_base_url("http://example.com").unwrap().as_str(), "http://example.com/");
        assert!(parse_base_url("mailto:someone@example.com").is_err());
        assert!(parse_base_url("not a url").is_err());
    }

    #[test]
    fn toml_then_env_layering() {
        let mut cfg = HubConfig::default();
        cfg.apply_toml("base_url = \"http://files.local/static\"\nrequest_timeout_secs = 10\nrun_migrations = false\n").unwrap();
        assert_eq!(cfg.base_url.as_str(), "http://files.local/static/");
        assert_eq!(cfg.request_timeout, Some(Duration::from_secs(10)));
        assert!(!cfg.run_migrations);

        let env: HashMap<&str, &str> = [(ENV_BASE_URL, "http://cdn.local"), (ENV_TIMEOUT_SECS, "0"), (ENV_DATABASE_URL, "")].into();
        cfg.apply_env(|k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(cfg.base_url.as_str(), "http://cdn.local/");
        assert_eq!(cfg.request_timeout, None);
        assert!(cfg.database_url.is_none());
    }

    #[test]
    fn bad_values_are_errors() {
        let mut cfg = HubConfig::default();
        assert!(cfg.apply_toml("bogus_key = 1").is_err());
        assert!(cfg.apply_toml("request_timeout_secs = \"ten\"").is_err());
        assert!(cfg.apply_env(|k| (k == ENV_TIMEOUT_SECS).then(|| "soon".to_string())).is_err());
    }

    #[test]
    fn load_reads_explicit_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("minihub.toml");
        fs::write(&path, "database_url = \"sqlite::memory:\"\n").unwrap();
        let cfg = HubConfig::load(Some(&path)).unwrap();
        // environment may still override, so only check what the file set when unset
        if std::env::var(ENV_DATABASE_URL).is_err() {
            assert_eq!(cfg.database_url.as_deref(), Some("sqlite::memory:"));
        }
    }

    #[test]
    fn load_fails_on_missing_explicit_file() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(HubConfig::load(Some(&tmp.path().join("absent.toml"))).is_err());
    }
}
