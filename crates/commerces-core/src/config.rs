use crate::app_config::{AppConfig, DEFAULT_API_URL};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
/// When `api_url_override` is set, `COMMERCES_API_URL` is not read at all.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config(api_url_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env(api_url_override)
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env(api_url_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key), api_url_override)
}

/// Picks the catalog URL: an explicit override as given, otherwise
/// `COMMERCES_API_URL` (or the public endpoint), which must be http(s).
///
/// An override is not validated here; the catalog client rejects bad URLs
/// when it builds the first page request.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] if the env value is not an http(s) URL.
pub fn resolve_api_url<F>(override_url: Option<&str>, lookup: F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    if let Some(url) = override_url {
        return Ok(url.to_owned());
    }
    let api_url = lookup("COMMERCES_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
    if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
        return Err(ConfigError::InvalidEnvVar {
            var: "COMMERCES_API_URL".to_string(),
            reason: format!("expected an http(s) URL, got \"{api_url}\""),
        });
    }
    Ok(api_url)
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F, api_url_override: Option<&str>) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
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

    let api_url = resolve_api_url(api_url_override, &lookup)?;

    let log_level = or_default("COMMERCES_LOG_LEVEL", "info");
    let request_timeout_secs = parse_u64("COMMERCES_REQUEST_TIMEOUT_SECS", "30")?;
    if request_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "COMMERCES_REQUEST_TIMEOUT_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    let user_agent = or_default("COMMERCES_USER_AGENT", "commerces/0.1 (open-data-catalog)");
    let cache_ttl_secs = parse_u64("COMMERCES_CACHE_TTL_SECS", "3600")?;

    Ok(AppConfig {
        api_url,
        log_level,
        request_timeout_secs,
        user_agent,
        cache_ttl_secs,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
