use crate::domain::model::SimulationReport;
use crate::utils::error::{Result, VintageError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

impl FromStr for OutputFormat {
    type Err = VintageError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(VintageError::InvalidConfigValueError {
                field: "output.format".to_string(),
                value: other.to_string(),
                reason: "Unsupported format. Valid formats: csv, json".to_string(),
            }),
        }
    }
}

pub fn render(report: &SimulationReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Csv => to_csv(report),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
    }
}

/// 每個期間一列
pub fn to_csv(report: &SimulationReport) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for period in &report.periods {
        writer.serialize(period)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| VintageError::IoError(e.into_error()))?;

    String::from_utf8(bytes).map_err(|e| VintageError::InvalidConfigValueError {
        field: "output".to_string(),
        value: String::new(),
        reason: format!("CSV output is not valid UTF-8: {}", e),
    })
}

pub fn write_report<P: AsRef<Path>>(report: &SimulationReport, format: OutputFormat, path: P) -> Result<()> {
    let content = render(report, format)?;
    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, content)?;
    Ok(())
}
