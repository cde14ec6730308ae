pub mod arena;
pub mod interpolation;
pub mod investment;
pub mod lifecycle;
pub mod registry;
pub mod simulation;
pub mod time;

pub use crate::domain::model::{PeriodOffset, TechId, VintageOutcome, Year};
pub use crate::domain::ports::{Technology, YearPeriodMap};
pub use crate::utils::error::Result;
