use crate::app_config::AppConfig;
use crate::ConfigError;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files, which is useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup, no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    // The single credential gating all backend calls. Checked here, once, so
    // a missing key surfaces as a startup notice rather than per-request
    // failures.
    let gemini_api_key = require("GEMINI_API_KEY")?;

    let gemini_model = or_default("INSIGHT_GEMINI_MODEL", DEFAULT_GEMINI_MODEL);
    let gemini_base_url = or_default("INSIGHT_GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL);
    let request_timeout_secs = parse_u64("INSIGHT_REQUEST_TIMEOUT_SECS", "120")?;
    let cache_dir = PathBuf::from(or_default("INSIGHT_CACHE_DIR", "./.insight-cache"));
    let log_level = or_default("INSIGHT_LOG_LEVEL", "info");

    Ok(AppConfig {
        gemini_api_key,
        gemini_model,
        gemini_base_url,
        request_timeout_secs,
        cache_dir,
        log_level,
    })
}
