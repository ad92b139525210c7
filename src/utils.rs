use std::env::var;
use std::str::FromStr;

use anyhow::Context;
use anyhow::Result;

/// Get the value of ENV var
///
/// Only when:
/// - It is set
/// - It is not empty
pub fn env_var(var_name: &'static str) -> Option<String> {
    var(var_name).ok().filter(|value| !value.is_empty())
}

/// Parse a configuration value, naming the variable in the error
pub fn parse_value<T>(var_name: &'static str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .trim()
        .parse::<T>()
        .with_context(|| format!("Invalid value for `{var_name}`: {value:?}"))
}

/// Parse a boolean flag, accepting the usual spellings
pub fn parse_flag(var_name: &'static str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => anyhow::bail!("Invalid value for `{var_name}`: {value:?}"),
    }
}
