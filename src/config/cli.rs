use crate::adapters::report::OutputFormat;
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "vintage-engine")]
#[command(about = "Run a technology vintage series through a model time grid")]
pub struct CliConfig {
    /// Path to TOML scenario file
    #[arg(short, long, default_value = "scenario.toml")]
    pub config: String,

    /// Override output format from config (csv or json)
    #[arg(long)]
    pub format: Option<String>,

    /// Override output path from config; prints to stdout when neither is set
    #[arg(short, long)]
    pub output: Option<String>,

    #[arg(long, help = "Only validate the scenario and print a summary")]
    pub dry_run: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    pub fn output_format(&self) -> crate::utils::error::Result<Option<OutputFormat>> {
        self.format.as_deref().map(str::parse::<OutputFormat>).transpose()
    }
}
