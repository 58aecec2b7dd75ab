//! Domain error types.
//!
//! The engine itself never fails: insufficient data produces `None` entries,
//! empty signal lists, or a zeroed result. This enum covers the adapter and
//! CLI boundary, where files, config and user-supplied identifiers live.

/// Top-level error type for barsight.
#[derive(Debug, thiserror::Error)]
pub enum BarsightError {
    #[error("data error: {reason}")]
    Data { reason: String },

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

    #[error("unknown strategy '{name}'")]
    UnknownStrategy { name: String },

    #[error("unknown sampling period '{name}'")]
    UnknownPeriod { name: String },

    #[error("invalid parameter '{name}' for strategy {strategy}: {reason}")]
    InvalidParam {
        strategy: String,
        name: String,
        reason: String,
    },

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&BarsightError> for std::process::ExitCode {
    fn from(err: &BarsightError) -> Self {
        let code: u8 = match err {
            BarsightError::Io(_) => 1,
            BarsightError::ConfigParse { .. }
            | BarsightError::ConfigMissing { .. }
            | BarsightError::ConfigInvalid { .. } => 2,
            BarsightError::Data { .. } => 3,
            BarsightError::UnknownStrategy { .. }
            | BarsightError::UnknownPeriod { .. }
            | BarsightError::InvalidParam { .. } => 4,
            BarsightError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::ExitCode;

    #[test]
    fn error_display() {
        let err = BarsightError::UnknownStrategy {
            name: "frob".into(),
        };
        assert_eq!(err.to_string(), "unknown strategy 'frob'");
    }

    #[test]
    fn exit_codes_are_stable() {
        let io: BarsightError = std::io::Error::other("x").into();
        assert_eq!(ExitCode::from(&io), ExitCode::from(1));
        let cfg = BarsightError::ConfigMissing {
            section: "backtest".into(),
            key: "capital".into(),
        };
        assert_eq!(ExitCode::from(&cfg), ExitCode::from(2));
        let data = BarsightError::Data { reason: "bad".into() };
        assert_eq!(ExitCode::from(&data), ExitCode::from(3));
        let strat = BarsightError::UnknownStrategy { name: "x".into() };
        assert_eq!(ExitCode::from(&strat), ExitCode::from(4));
        let nodata = BarsightError::NoData { symbol: "BHP".into() };
        assert_eq!(ExitCode::from(&nodata), ExitCode::from(5));
    }
}
