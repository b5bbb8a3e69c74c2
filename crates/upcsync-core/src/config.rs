use std::path::PathBuf;

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
/// Decoupled from the real environment so tests can drive it with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    // An empty credential is as unusable as a missing one.
    let require = |var: &str| -> Result<String, ConfigError> {
        match lookup(var) {
            Ok(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(ConfigError::MissingEnvVar(var.to_string())),
        }
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let api_key = require("UPCSYNC_API_KEY")?;
    let database_url = require("DATABASE_URL")?;

    let contact = or_default("UPCSYNC_CONTACT", "");
    let user_agent = or_default("UPCSYNC_USER_AGENT", "upcsync/0.1 (UPC-to-SKU loader)");
    let catalog_base_url = or_default(
        "UPCSYNC_CATALOG_BASE_URL",
        "https://api.gap.com/commerce/product-catalogs",
    );
    let log_level = or_default("UPCSYNC_LOG_LEVEL", "info");
    let error_log_path = PathBuf::from(or_default("UPCSYNC_ERROR_LOG_PATH", "errorlog.txt"));

    let page_size = parse_u32("UPCSYNC_PAGE_SIZE", "200")?;
    if page_size == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "UPCSYNC_PAGE_SIZE".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    let request_timeout_secs = parse_u64("UPCSYNC_REQUEST_TIMEOUT_SECS", "120")?;
    let retry_delay_ms = parse_u64("UPCSYNC_RETRY_DELAY_MS", "1000")?;
    let retry_max_delay_ms = parse_u64("UPCSYNC_RETRY_MAX_DELAY_MS", "60000")?;

    let db_max_connections = parse_u32("UPCSYNC_DB_MAX_CONNECTIONS", "1")?;
    let db_min_connections = parse_u32("UPCSYNC_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("UPCSYNC_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    Ok(AppConfig {
        database_url,
        log_level,
        error_log_path,
        catalog_base_url,
        page_size,
        api_key,
        contact,
        user_agent,
        request_timeout_secs,
        retry_delay_ms,
        retry_max_delay_ms,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
