use std::path::PathBuf;

#[derive(Clone)]
pub struct AppConfig {
    pub gemini_api_key: String,
    pub gemini_model: String,
    /// Base URL for the Gemini REST API. Overridable so tests and proxies can
    /// point the client elsewhere.
    pub gemini_base_url: String,
    pub request_timeout_secs: u64,
    pub cache_dir: PathBuf,
    pub log_level: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("gemini_api_key", &"[redacted]")
            .field("gemini_model", &self.gemini_model)
            .field("gemini_base_url", &self.gemini_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("cache_dir", &self.cache_dir)
            .field("log_level", &self.log_level)
            .finish()
    }
}
