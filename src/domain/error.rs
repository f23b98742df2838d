//! Domain error types.

/// Top-level error type for lookback.
#[derive(Debug, thiserror::Error)]
pub enum LookbackError {
    #[error("invalid type for {field}: expected {expected}, got {found:?}")]
    InvalidType {
        field: &'static str,
        expected: &'static str,
        found: String,
    },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("{kind} {key:?} is already registered")]
    DuplicateKey { kind: &'static str, key: String },

    #[error("{kind} {key:?} not found")]
    NotFound { kind: &'static str, key: String },

    #[error("no fx rate available for {pair}")]
    RateUnavailable { pair: String },

    #[error("{field} cannot be changed: {reason}")]
    ImmutableFieldViolation { field: &'static str, reason: String },

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

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&LookbackError> for std::process::ExitCode {
    fn from(err: &LookbackError) -> Self {
        let code: u8 = match err {
            LookbackError::Io(_) => 1,
            LookbackError::ConfigParse { .. }
            | LookbackError::ConfigMissing { .. }
            | LookbackError::ConfigInvalid { .. } => 2,
            LookbackError::InvalidType { .. }
            | LookbackError::InvalidValue { .. }
            | LookbackError::ImmutableFieldViolation { .. } => 3,
            LookbackError::DuplicateKey { .. } | LookbackError::NotFound { .. } => 4,
            LookbackError::RateUnavailable { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
