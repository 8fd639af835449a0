//! Domain error types.

/// Top-level error type for riskpremia.
#[derive(Debug, thiserror::Error)]
pub enum RiskPremiaError {
    /// Missing required column, unordered index, or empty table after
    /// dropping null rows.
    #[error("data shape error: {reason}")]
    DataShape { reason: String },

    #[error("unsupported noise reduction method: {name}")]
    UnsupportedMethod { name: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl RiskPremiaError {
    pub fn data_shape(reason: impl Into<String>) -> Self {
        RiskPremiaError::DataShape {
            reason: reason.into(),
        }
    }
}

impl From<&RiskPremiaError> for std::process::ExitCode {
    fn from(err: &RiskPremiaError) -> Self {
        let code: u8 = match err {
            RiskPremiaError::Io(_) | RiskPremiaError::Data { .. } => 1,
            RiskPremiaError::ConfigParse { .. }
            | RiskPremiaError::ConfigMissing { .. }
            | RiskPremiaError::ConfigInvalid { .. } => 2,
            RiskPremiaError::UnsupportedMethod { .. } => 4,
            RiskPremiaError::DataShape { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
