use serde::{Deserialize, Serialize};
use std::fmt;

/// Calendar year of a vintage.
pub type Year = i32;

/// Discrete simulation period index.
pub type Period = usize;

/// Stable handle to a technology owned by a [`TechnologyArena`](crate::core::arena::TechnologyArena).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TechId(pub(crate) usize);

impl TechId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for TechId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tech#{}", self.0)
    }
}

/// Which period's annual investment to read from a technology.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodOffset {
    /// The most recently recorded annual investment.
    Latest,
    At(Period),
}

/// Result of advancing a series to a new vintage year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VintageOutcome {
    /// A new vintage was cloned from the reference and inserted.
    Created(TechId),
    /// The vintage already existed; its parameters were refreshed from the reference.
    Updated(TechId),
}

impl VintageOutcome {
    pub fn tech(self) -> TechId {
        match self {
            Self::Created(id) | Self::Updated(id) => id,
        }
    }

    pub fn is_created(self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// 每個期間在報表中的動作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VintageAction {
    Seeded,
    Created,
    Updated,
    Skipped,
}

impl From<VintageOutcome> for VintageAction {
    fn from(outcome: VintageOutcome) -> Self {
        match outcome {
            VintageOutcome::Created(_) => Self::Created,
            VintageOutcome::Updated(_) => Self::Updated,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodReport {
    pub period: Period,
    pub year: Year,
    pub action: VintageAction,
    pub vintages: usize,
    pub annual_investment: f64,
    /// 內插後的總投資，套用上限前
    pub requested_investment: f64,
    pub applied_investment: f64,
    pub capital_stock: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub scenario: String,
    pub region: String,
    pub technology: String,
    pub periods: Vec<PeriodReport>,
}

impl SimulationReport {
    pub fn total_applied_investment(&self) -> f64 {
        self.periods.iter().map(|p| p.applied_investment).sum()
    }

    pub fn final_capital_stock(&self) -> f64 {
        self.periods.last().map(|p| p.capital_stock).unwrap_or(0.0)
    }
}
