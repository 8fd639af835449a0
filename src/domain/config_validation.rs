//! Configuration validation.
//!
//! Validates every config section before a run touches any data.

use crate::domain::error::RiskPremiaError;
use crate::domain::noise::CleaningMethod;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), RiskPremiaError> {
    validate_data_config(config)?;
    validate_noise_config(config)?;
    validate_factor_config(config)?;
    validate_backtest_config(config)?;
    Ok(())
}

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), RiskPremiaError> {
    let start = parse_optional_date(config, "start_date")?;
    let end = parse_optional_date(config, "end_date")?;

    if let (Some(start), Some(end)) = (start, end) {
        if start >= end {
            return Err(invalid("data", "start_date", "start_date must be before end_date"));
        }
    }
    Ok(())
}

pub fn validate_noise_config(config: &dyn ConfigPort) -> Result<(), RiskPremiaError> {
    if let Some(method) = config.get_non_empty("noise", "method") {
        method.parse::<CleaningMethod>()?;
    }
    require_positive(config, "noise", "window", 3, 1)
}

pub fn validate_factor_config(config: &dyn ConfigPort) -> Result<(), RiskPremiaError> {
    require_positive(config, "factors", "momentum_lookback", 90, 1)?;
    require_positive(config, "factors", "low_vol_window", 30, 2)?;
    require_positive(config, "factors", "nvt_volume_window", 7, 1)?;

    let risk_free = config.parse_double("factors", "risk_free")?.unwrap_or(1.0);
    if !risk_free.is_finite() || risk_free <= 0.0 {
        return Err(invalid("factors", "risk_free", "risk_free must be positive"));
    }
    Ok(())
}

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), RiskPremiaError> {
    for key in ["weight_a", "weight_b"] {
        if !config.parse_double("backtest", key)?.unwrap_or(0.5).is_finite() {
            return Err(invalid("backtest", key, "weight must be a finite number"));
        }
    }

    let rate = config.parse_double("backtest", "risk_free_rate")?.unwrap_or(0.0);
    if !(0.0..1.0).contains(&rate) {
        return Err(invalid(
            "backtest",
            "risk_free_rate",
            "risk_free_rate must be between 0 and 1",
        ));
    }
    Ok(())
}

pub fn parse_optional_date(
    config: &dyn ConfigPort,
    key: &str,
) -> Result<Option<NaiveDate>, RiskPremiaError> {
    config
        .get_non_empty("data", key)
        .map(|s| {
            NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|_| {
                invalid("data", key, &format!("invalid {} format, expected YYYY-MM-DD", key))
            })
        })
        .transpose()
}

fn require_positive(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: i64,
    minimum: i64,
) -> Result<(), RiskPremiaError> {
    let value = config.parse_int(section, key)?.unwrap_or(default);
    if value < minimum {
        return Err(invalid(
            section,
            key,
            &format!("{} must be at least {}", key, minimum),
        ));
    }
    Ok(())
}

fn invalid(section: &str, key: &str, reason: &str) -> RiskPremiaError {
    RiskPremiaError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
