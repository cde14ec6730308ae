use crate::domain::model::{Period, PeriodOffset, Year};
use std::any::Any;
use std::fmt::Debug;

/// Capability set the vintage engine needs from a technology.
///
/// The engine never looks inside a technology; production and cost calculus
/// stay behind this trait so new technology kinds can be added without
/// touching the series.
pub trait Technology: Debug + Send {
    fn name(&self) -> &str;
    fn year(&self) -> Year;
    fn set_year(&mut self, year: Year);
    fn capital(&self) -> f64;
    fn annual_investment(&self, offset: PeriodOffset) -> f64;

    fn clone_box(&self) -> Box<dyn Technology>;

    /// Overwrite tunable parameters from `source` as evaluated at `period`.
    /// Must not change the year or the capital history.
    fn copy_param(&mut self, source: &dyn Technology, period: Period);

    /// Record investment and return the amount actually invested, which may
    /// differ from `total_investment` when the technology applies its own limits.
    fn set_investment(
        &mut self,
        region: &str,
        annual_investment: f64,
        total_investment: f64,
        period: Period,
    ) -> f64;

    fn as_any(&self) -> &dyn Any;
}

impl Clone for Box<dyn Technology> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Read-only translation between calendar years and simulation periods.
pub trait YearPeriodMap {
    fn year_to_period(&self, year: Year) -> Period;
    fn period_to_year(&self, period: Period) -> Option<Year>;
}
