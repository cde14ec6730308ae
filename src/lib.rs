pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::technology::{TechnologyParams, VintageTechnology};
pub use config::ScenarioConfig;
pub use crate::core::{
    arena::TechnologyArena, registry::VintageSeries, simulation::VintageSimulation,
    time::ModelTime,
};
pub use domain::model::{PeriodOffset, SimulationReport, TechId, VintageOutcome};
pub use domain::ports::{Technology, YearPeriodMap};
pub use utils::error::{Result, VintageError};
