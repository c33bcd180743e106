use std::path::PathBuf;

use milciv_core::ScheduleError;
use thiserror::Error;

/// Errors that can occur when loading rate-table files.
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("CSV parse error in {file}: {message}")]
    CsvParse { file: &'static str, message: String },

    #[error("policy file error: {0}")]
    Policy(String),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Brackets for one jurisdiction and filing status do not form a schedule.
    #[error("invalid {jurisdiction} {filing_status} schedule: {source}")]
    InvalidSchedule {
        jurisdiction: String,
        filing_status: String,
        #[source]
        source: ScheduleError,
    },

    #[error("unknown rank '{0}'")]
    UnknownRank(String),

    #[error("unknown filing status '{0}'")]
    UnknownFilingStatus(String),

    #[error("unknown rank category '{0}' (expected enlisted or officer)")]
    UnknownCategory(String),

    #[error("state {state}: unknown tax method '{method}'")]
    UnknownStateMethod { state: String, method: String },

    #[error("state {0}: flat method requires a rate")]
    MissingStateRate(String),

    #[error("state {0}: progressive method but no single-filer brackets")]
    MissingStateBrackets(String),
}

impl From<toml::de::Error> for LoaderError {
    fn from(err: toml::de::Error) -> Self {
        LoaderError::Policy(err.to_string())
    }
}
