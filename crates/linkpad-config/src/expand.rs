//! Environment variable expansion for configuration strings.

use crate::ConfigError;

/// Expands `${VAR}` references in a configuration value.
///
/// `${VAR}` becomes the value of `VAR` and errors when unset;
/// `${VAR:-default}` falls back to the default. Strings without a
/// `${` are returned unchanged, and bare `$VAR` is left alone.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    // Fast path: nothing to expand
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, MissingVar> {
        std::env::var(var)
            .map(Some)
            .map_err(|_| MissingVar(var.to_owned()))
    })
    .map(|expanded| expanded.into_owned())
    .map_err(|error| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{0}}} not set", error.cause.0),
    })
}

/// Lookup failure carrying the variable name.
struct MissingVar(String);
