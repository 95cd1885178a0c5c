use crate::app_config::AppConfig;
use crate::ConfigError;

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
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        match lookup(var) {
            Ok(v) if !v.trim().is_empty() => Ok(v),
            _ => Err(ConfigError::MissingEnvVar(var.to_string())),
        }
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

    let parse_optional_u64 = |var: &str| -> Result<Option<u64>, ConfigError> {
        match lookup(var) {
            Ok(raw) if !raw.trim().is_empty() => raw
                .trim()
                .parse::<u64>()
                .map(Some)
                .map_err(|e| ConfigError::InvalidEnvVar {
                    var: var.to_string(),
                    reason: e.to_string(),
                }),
            _ => Ok(None),
        }
    };

    let api_base_url = require("GMB_API_BASE_URL")?;
    let session_path = PathBuf::from(or_default("GMB_SESSION_PATH", "./session.yaml"));
    let ai_api_key = lookup("GMB_AI_API_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty());
    let ai_model = or_default("GMB_AI_MODEL", "gemini-pro");
    let ai_base_url = or_default(
        "GMB_AI_BASE_URL",
        "https://generativelanguage.googleapis.com",
    );
    let request_timeout_secs = parse_optional_u64("GMB_REQUEST_TIMEOUT_SECS")?;
    let user_agent = or_default("GMB_USER_AGENT", "gmb-replies/0.1");
    let notice_ttl_ms = parse_u64("GMB_NOTICE_TTL_MS", "3000")?;
    let surface_generation_errors = parse_bool(
        "GMB_SURFACE_GENERATION_ERRORS",
        &or_default("GMB_SURFACE_GENERATION_ERRORS", "false"),
    )?;
    let log_level = or_default("GMB_LOG_LEVEL", "info");

    Ok(AppConfig {
        api_base_url,
        session_path,
        ai_api_key,
        ai_model,
        ai_base_url,
        request_timeout_secs,
        user_agent,
        notice_ttl_ms,
        surface_generation_errors,
        log_level,
    })
}

fn parse_bool(var: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("expected a boolean, got '{other}'"),
        }),
    }
}
