//! INI file configuration adapter.

use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::RiskPremiaError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_sections() {
        let content = r#"
[data]
dir = ./data
symbol = BTC-USD

[noise]
method = rolling_median
window = 5

[backtest]
weight_a = 0.7
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(adapter.get_string("data", "symbol"), Some("BTC-USD".to_string()));
        assert_eq!(
            adapter.get_string("noise", "method"),
            Some("rolling_median".to_string())
        );
        assert_eq!(adapter.get_int("noise", "window", 3), 5);
        assert_eq!(adapter.get_double("backtest", "weight_a", 0.5), 0.7);
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[data]\nsymbol = BTC-USD\n").unwrap();
        assert_eq!(adapter.get_string("data", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn get_int_returns_default_for_missing_or_non_numeric() {
        let adapter = FileConfigAdapter::from_string("[factors]\nlow_vol_window = abc\n").unwrap();
        assert_eq!(adapter.get_int("factors", "low_vol_window", 30), 30);
        assert_eq!(adapter.get_int("factors", "momentum_lookback", 90), 90);
    }

    #[test]
    fn get_double_returns_default_for_non_numeric() {
        let adapter =
            FileConfigAdapter::from_string("[factors]\nrisk_free = not_a_number\n").unwrap();
        assert_eq!(adapter.get_double("factors", "risk_free", 1.0), 1.0);
    }

    #[test]
    fn strict_getters_reject_unparseable_values() {
        let adapter = FileConfigAdapter::from_string(
            "[noise]\nwindow = abc\n\n[backtest]\nweight_a = 0.25\nweight_b = high\n",
        )
        .unwrap();

        assert!(matches!(
            adapter.parse_int("noise", "window"),
            Err(RiskPremiaError::ConfigInvalid { .. })
        ));
        assert_eq!(adapter.parse_double("backtest", "weight_a").unwrap(), Some(0.25));
        assert!(adapter.parse_double("backtest", "weight_b").is_err());
        assert_eq!(adapter.parse_int("noise", "missing").unwrap(), None);
    }

    #[test]
    fn get_non_empty_trims_and_filters() {
        let adapter = FileConfigAdapter::from_string("[data]\nsymbol =   \nend_date = 2024-01-01 \n")
            .unwrap();
        assert_eq!(adapter.get_non_empty("data", "symbol"), None);
        assert_eq!(
            adapter.get_non_empty("data", "end_date"),
            Some("2024-01-01".to_string())
        );
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[data]\ndir = /var/prices\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(adapter.get_string("data", "dir"), Some("/var/prices".to_string()));
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/config.ini");
        assert!(result.is_err());
    }
}
