//! Centralized configuration (environment variables + defaults).
//!
//! Read once at startup. Nothing here panics: a backend whose settings are
//! incomplete is simply left unconfigured.

use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_SAVE_DELAY_SECS: u64 = 30;
pub const DEFAULT_CACHE_DIR: &str = ".cozy-cache";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Credentials and coordinates of the content repository.
#[derive(Debug, Clone)]
pub struct GitHubConfig {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub token: String,
    pub api_url: String,
}

/// Base URL and anon key of the row store.
#[derive(Debug, Clone)]
pub struct RowStoreConfig {
    pub url: String,
    pub anon_key: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub github: Option<GitHubConfig>,
    pub row_store: Option<RowStoreConfig>,
    pub save_delay: Duration,
    pub cache_dir: PathBuf,
    pub bind_addr: String,
    pub log_json: bool,
    /// Bearer token for the admin write API. Unset means admin routes are locked.
    pub admin_token: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            github: github_config(),
            row_store: row_store_config(),
            save_delay: save_delay(),
            cache_dir: cache_dir(),
            bind_addr: bind_addr(),
            log_json: log_json(),
            admin_token: admin_token(),
        }
    }

    /// No remote backends, default delay. Handy for tests.
    pub fn local_only(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            github: None,
            row_store: None,
            save_delay: Duration::from_secs(DEFAULT_SAVE_DELAY_SECS),
            cache_dir: cache_dir.into(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            log_json: false,
            admin_token: None,
        }
    }
}

/// Non-empty, trimmed value of an environment variable.
fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// GitHub backend settings. Only configured when `GITHUB_TOKEN` is set.
pub fn github_config() -> Option<GitHubConfig> {
    let token = env_var("GITHUB_TOKEN")?;
    let (owner, repo) = match (env_var("GITHUB_OWNER"), env_var("GITHUB_REPO")) {
        (Some(owner), Some(repo)) => (owner, repo),
        _ => {
            warn!("GITHUB_TOKEN is set but GITHUB_OWNER/GITHUB_REPO are missing; GitHub backend disabled");
            return None;
        }
    };
    Some(GitHubConfig {
        owner,
        repo,
        branch: env_var("GITHUB_BRANCH").unwrap_or_else(|| DEFAULT_BRANCH.to_string()),
        token,
        api_url: env_var("GITHUB_API_URL").unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_string()),
    })
}

/// Row store settings. Both `SUPABASE_URL` and `SUPABASE_ANON_KEY` are required.
pub fn row_store_config() -> Option<RowStoreConfig> {
    Some(RowStoreConfig {
        url: env_var("SUPABASE_URL")?,
        anon_key: env_var("SUPABASE_ANON_KEY")?,
    })
}

/// Debounce window before a saved collection is written remotely.
pub fn save_delay() -> Duration {
    parse_delay(env_var("SAVE_DELAY_SECS").as_deref())
}

pub fn cache_dir() -> PathBuf {
    env_var("CACHE_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_DIR))
}

pub fn bind_addr() -> String {
    env_var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
}

pub fn admin_token() -> Option<String> {
    env_var("ADMIN_TOKEN")
}

pub fn log_json() -> bool {
    env_var("LOG_JSON")
        .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

fn parse_delay(raw: Option<&str>) -> Duration {
    match raw {
        None => Duration::from_secs(DEFAULT_SAVE_DELAY_SECS),
        Some(v) => match v.parse::<u64>() {
            Ok(secs) => Duration::from_secs(secs),
            Err(_) => {
                warn!(value = v, "SAVE_DELAY_SECS is not a whole number of seconds; using default");
                Duration::from_secs(DEFAULT_SAVE_DELAY_SECS)
            }
        },
    }
}
