use crate::domain::model::Year;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VintageError {
    #[error("A vintage already exists with year {year} in technology type {series}")]
    DuplicateVintage { series: String, year: Year },

    #[error("Invalid base year {year} for technology type {series}: cannot initialize previous vintages")]
    BaseYearMissing { series: String, year: Year },

    #[error("Invalid current technology year {year} for technology type {series}: cannot initialize current technology")]
    ReferenceYearMissing { series: String, year: Year },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration parse error: {message}")]
    ConfigParseError { message: String },

    #[error("Missing configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Vintage,
    Configuration,
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl VintageError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::DuplicateVintage { .. }
            | Self::BaseYearMissing { .. }
            | Self::ReferenceYearMissing { .. } => ErrorCategory::Vintage,
            Self::ConfigParseError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            Self::IoError(_) | Self::SerializationError(_) | Self::CsvError(_) => ErrorCategory::Io,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 重複年份只是拒絕插入，模擬可以繼續
            Self::DuplicateVintage { .. } => ErrorSeverity::Low,
            Self::ReferenceYearMissing { .. } => ErrorSeverity::Medium,
            Self::BaseYearMissing { .. } => ErrorSeverity::High,
            Self::ConfigParseError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorSeverity::High,
            Self::IoError(_) | Self::SerializationError(_) | Self::CsvError(_) => {
                ErrorSeverity::Critical
            }
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::DuplicateVintage { year, .. } => format!(
                "Update the existing {} vintage instead of inserting a new one",
                year
            ),
            Self::BaseYearMissing { year, .. } => format!(
                "Make sure a vintage for base year {} is created before calibration",
                year
            ),
            Self::ReferenceYearMissing { year, .. } => format!(
                "Create the {} vintage before advancing the series past it",
                year
            ),
            Self::ConfigParseError { .. } => "Check the TOML syntax of the scenario file".to_string(),
            Self::MissingConfigError { field } => format!("Add the '{}' field to the scenario file", field),
            Self::InvalidConfigValueError { field, .. } => {
                format!("Fix the value of '{}' in the scenario file", field)
            }
            Self::IoError(_) => "Check that the file exists and is accessible".to_string(),
            Self::SerializationError(_) | Self::CsvError(_) => {
                "Check that the output destination is writable".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Vintage => format!("Vintage series error: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Io => format!("Input/output failure: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, VintageError>;
