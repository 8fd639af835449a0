//! Configuration access port trait.

use crate::domain::error::RiskPremiaError;
use std::str::FromStr;

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;

    /// Lenient: an absent or unparseable value yields `default`.
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
    fn get_double(&self, section: &str, key: &str, default: f64) -> f64;

    /// Trimmed, non-empty value or `None`.
    fn get_non_empty(&self, section: &str, key: &str) -> Option<String> {
        self.get_string(section, key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Strict: `Ok(None)` when absent, `ConfigInvalid` when present but
    /// not an integer.
    fn parse_int(&self, section: &str, key: &str) -> Result<Option<i64>, RiskPremiaError> {
        parse_value(self.get_non_empty(section, key), section, key, "an integer")
    }

    fn parse_double(&self, section: &str, key: &str) -> Result<Option<f64>, RiskPremiaError> {
        parse_value(self.get_non_empty(section, key), section, key, "a number")
    }
}

fn parse_value<T: FromStr>(
    raw: Option<String>,
    section: &str,
    key: &str,
    expected: &str,
) -> Result<Option<T>, RiskPremiaError> {
    raw.map(|v| {
        v.parse::<T>().map_err(|_| RiskPremiaError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: format!("expected {}, got '{}'", expected, v),
        })
    })
    .transpose()
}
