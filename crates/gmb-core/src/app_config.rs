use std::path::PathBuf;
use std::time::Duration;

#[derive(Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub session_path: PathBuf,
    pub ai_api_key: Option<String>,
    pub ai_model: String,
    pub ai_base_url: String,
    /// `None` leaves the transport default in place.
    pub request_timeout_secs: Option<u64>,
    pub user_agent: String,
    pub notice_ttl_ms: u64,
    pub surface_generation_errors: bool,
    pub log_level: String,
}

impl AppConfig {
    /// How long the post-submit confirmation stays visible.
    #[must_use]
    pub fn notice_ttl(&self) -> Duration {
        Duration::from_millis(self.notice_ttl_ms)
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_base_url", &self.api_base_url)
            .field("session_path", &self.session_path)
            .field("ai_api_key", &self.ai_api_key.as_ref().map(|_| "[redacted]"))
            .field("ai_model", &self.ai_model)
            .field("ai_base_url", &self.ai_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("notice_ttl_ms", &self.notice_ttl_ms)
            .field("surface_generation_errors", &self.surface_generation_errors)
            .field("log_level", &self.log_level)
            .finish()
    }
}
