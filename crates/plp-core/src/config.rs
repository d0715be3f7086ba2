use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
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
/// Returns `ConfigError` if a value is present but invalid.
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

    let parse_page_size = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let size = parse_u32(var, default)?;
        if size == 0 {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "page size must be at least 1".to_string(),
            });
        }
        Ok(size)
    };

    let env = parse_environment(&or_default("PLP_ENV", "development"));
    let log_level = or_default("PLP_LOG_LEVEL", "info");

    let api_base_url = or_default("PLP_API_BASE_URL", "https://dummyjson.com")
        .trim_end_matches('/')
        .to_string();
    if !(api_base_url.starts_with("http://") || api_base_url.starts_with("https://")) {
        return Err(ConfigError::InvalidEnvVar {
            var: "PLP_API_BASE_URL".to_string(),
            reason: format!("expected an http(s) URL, got \"{api_base_url}\""),
        });
    }

    let page_size = parse_page_size("PLP_PAGE_SIZE", "20")?;
    let listing_page_size = parse_page_size("PLP_LISTING_PAGE_SIZE", "12")?;

    let request_timeout_secs = parse_u64("PLP_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("PLP_USER_AGENT", "plp/0.1 (catalog-browser)");
    let max_retries = parse_u32("PLP_MAX_RETRIES", "3")?;
    let retry_backoff_base_ms = parse_u64("PLP_RETRY_BACKOFF_BASE_MS", "500")?;
    let search_debounce_ms = parse_u64("PLP_SEARCH_DEBOUNCE_MS", "300")?;

    Ok(AppConfig {
        env,
        log_level,
        api_base_url,
        page_size,
        listing_page_size,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_ms,
        search_debounce_ms,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
