use std::{env, path::PathBuf, time::Duration};

/// The backend mounts every route under `api/v1/`.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";

#[derive(Clone, Debug)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub session_file: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            api_base_url: normalize_base_url(
                &env::var("QUIZWHIZ_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            ),
            request_timeout_secs: env::var("QUIZWHIZ_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
            session_file: env::var("QUIZWHIZ_SESSION_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_session_file()),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Joins an API path such as `quiz/create/` onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url, path.trim_start_matches('/'))
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8000/api".to_string(),
            request_timeout_secs: 5,
            session_file: env::temp_dir().join("quizwhiz-test-session"),
        }
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn default_session_file() -> PathBuf {
    env::var("HOME")
        .map(|home| PathBuf::from(home).join(".quizwhiz_session"))
        .unwrap_or_else(|_| PathBuf::from(".quizwhiz_session"))
}
