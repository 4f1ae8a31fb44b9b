use crate::errors::{ScanError, ScanOutcome};

pub const DEFAULT_USER_AGENT: &str = "feedscan/0.1 (+https://github.com/)";
pub const DEFAULT_ACCEPT: &str =
    "text/html,application/xml,application/rss+xml,application/atom+xml,text/xml,*/*;q=0.1";
pub const DEFAULT_TIMEOUT_SECS: f64 = 15.0;
pub const DEFAULT_OUT_DIR: &str = "data";

/// Settings for the HTTP client shared by every request of a scan.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpConfig {
    pub timeout_s: f64,
    pub user_agent: String,
    pub accept: String,
    pub follow_redirects: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_s: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept: DEFAULT_ACCEPT.to_string(),
            follow_redirects: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub user_agent: String,
    pub accept: String,
    pub follow_redirects: bool,
    pub out_dir: String,
}

impl Config {
    /// Get the directory where the executable is located
    fn exe_dir() -> Option<std::path::PathBuf> {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    pub fn from_env() -> ScanOutcome<Self> {
        // Try to load .env from executable's directory first
        if let Some(dir) = Self::exe_dir() {
            let env_path = dir.join(".env");
            if env_path.exists() {
                dotenvy::from_path(&env_path).ok();
            }
        }
        // Fall back to current directory
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> ScanOutcome<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let user_agent = lookup("FEEDSCAN_USER_AGENT")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        let accept = lookup("FEEDSCAN_ACCEPT")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ACCEPT.to_string());

        let follow_redirects = match lookup("FEEDSCAN_FOLLOW_REDIRECTS") {
            Some(raw) => parse_flag(&raw).ok_or_else(|| {
                ScanError::Config(format!("FEEDSCAN_FOLLOW_REDIRECTS must be a boolean, got '{}'", raw))
            })?,
            None => true,
        };

        let out_dir = lookup("FEEDSCAN_OUT_DIR").unwrap_or_else(|| DEFAULT_OUT_DIR.to_string());

        Ok(Self {
            user_agent,
            accept,
            follow_redirects,
            out_dir,
        })
    }

    /// HTTP settings for a scan run with the given per-request timeout.
    pub fn http_config(&self, timeout_s: f64) -> HttpConfig {
        HttpConfig {
            timeout_s,
            user_agent: self.user_agent.clone(),
            accept: self.accept.clone(),
            follow_redirects: self.follow_redirects,
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
