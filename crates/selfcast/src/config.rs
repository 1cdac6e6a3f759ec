//! Process configuration.
//!
//! Two required values sourced from the environment (a local `.env` file is
//! loaded first by `main`): the backend base URL and the auth token. They
//! are validated eagerly so a missing value fails at startup with its name
//! instead of surfacing later as an opaque HTTP error.

use anyhow::{Context, Result};

pub const URL_VAR: &str = "SELFCAST_URL";
pub const TOKEN_VAR: &str = "SELFCAST_TOKEN";

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the podcast backend, e.g. `https://cast.example.com`.
    pub base_url: String,
    /// Static auth token passed as a body/query parameter.
    pub auth_token: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            base_url: require(URL_VAR)?,
            auth_token: require(TOKEN_VAR)?,
        })
    }
}

fn require(key: &str) -> Result<String> {
    validate(key, std::env::var(key).ok())
}

// Split from `require` so validation can be tested without mutating the
// process environment, which is not thread-safe under the parallel test
// runner.
fn validate(key: &str, value: Option<String>) -> Result<String> {
    let value = value.with_context(|| format!("environment variable {key} is not set"))?;
    if value.trim().is_empty() {
        anyhow::bail!("environment variable {key} is empty");
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_variable_names_the_key() {
        let err = validate("SELFCAST_TEST_UNSET", None).unwrap_err();
        assert!(format!("{err:#}").contains("SELFCAST_TEST_UNSET"));
    }

    #[test]
    fn empty_variable_is_rejected() {
        let err = validate("SELFCAST_TEST_EMPTY", Some("  ".to_string())).unwrap_err();
        assert!(format!("{err:#}").contains("SELFCAST_TEST_EMPTY"));
    }

    #[test]
    fn present_variable_is_returned_verbatim() {
        let value = validate(URL_VAR, Some("https://cast.example.com".to_string())).unwrap();
        assert_eq!(value, "https://cast.example.com");
    }
}
