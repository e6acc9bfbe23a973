use std::{env, path::PathBuf};

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_DOMAIN: &str = "http://localhost:8000";
pub const DEFAULT_SESSION_PATH: &str = "data/session.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_url: String,
    pub domain: String,
    pub session_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            domain: DEFAULT_DOMAIN.to_string(),
            session_path: PathBuf::from(DEFAULT_SESSION_PATH),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            api_url: non_empty("SHORTLINK_API_URL").unwrap_or(defaults.api_url),
            domain: non_empty("SHORTLINK_DOMAIN").unwrap_or(defaults.domain),
            session_path: non_empty("SHORTLINK_SESSION_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.session_path),
        }
    }

    pub fn full_short_url(&self, code: &str) -> String {
        if code.is_empty() {
            return String::new();
        }
        let domain = self.domain.strip_suffix('/').unwrap_or(&self.domain);
        let code = code.strip_prefix('/').unwrap_or(code);
        format!("{domain}/{code}")
    }
}
