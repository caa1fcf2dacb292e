//! API key resolution shared by the REST and streaming clients.

use crate::core::TiingoError;

const MISSING_KEY: &str = "credential not provided; Tiingo API key must be supplied \
     via the configuration or the environment variable";

/// Resolve the API key from an explicit value first, then from `env_var`.
///
/// Empty strings count as absent. Resolution happens once, at construction.
pub(crate) fn resolve_api_key(
    explicit: Option<&str>,
    env_var: &str,
) -> Result<String, TiingoError> {
    resolve_with(explicit, env_var, |name| std::env::var(name).ok())
}

pub(crate) fn resolve_with<F>(
    explicit: Option<&str>,
    env_var: &str,
    lookup: F,
) -> Result<String, TiingoError>
where
    F: FnOnce(&str) -> Option<String>,
{
    if let Some(key) = explicit.filter(|k| !k.is_empty()) {
        return Ok(key.to_string());
    }
    lookup(env_var)
        .filter(|k| !k.is_empty())
        .ok_or_else(|| TiingoError::Configuration(format!("{MISSING_KEY} {env_var}")))
}
