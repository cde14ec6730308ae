use crate::domain::model::{Period, Year};
use crate::domain::ports::YearPeriodMap;
use crate::utils::error::{Result, VintageError};
use crate::utils::validation::validate_strictly_increasing;

/// Non-uniform model time grid: one calendar year per period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelTime {
    years: Vec<Year>,
}

impl ModelTime {
    /// Build from period years, which must be non-empty and strictly increasing.
    pub fn new(years: Vec<Year>) -> Result<Self> {
        validate_strictly_increasing("time.years", &years)?;
        Ok(Self { years })
    }

    /// Build from a start year and the length in years of every following period.
    pub fn from_timesteps(start_year: Year, timesteps: &[u32]) -> Result<Self> {
        let mut years = Vec::with_capacity(timesteps.len() + 1);
        years.push(start_year);

        let mut year = start_year;
        for step in timesteps {
            if *step == 0 {
                return Err(VintageError::InvalidConfigValueError {
                    field: "time.timesteps".to_string(),
                    value: step.to_string(),
                    reason: "Timesteps must be at least one year".to_string(),
                });
            }
            year = i32::try_from(*step)
                .ok()
                .and_then(|s| year.checked_add(s))
                .ok_or_else(|| VintageError::InvalidConfigValueError {
                    field: "time.timesteps".to_string(),
                    value: step.to_string(),
                    reason: "Timestep overflows the calendar year range".to_string(),
                })?;
            years.push(year);
        }

        Self::new(years)
    }

    pub fn years(&self) -> &[Year] {
        &self.years
    }

    pub fn num_periods(&self) -> usize {
        self.years.len()
    }

    pub fn final_period(&self) -> Period {
        self.years.len() - 1
    }

    pub fn start_year(&self) -> Year {
        self.years[0]
    }

    pub fn end_year(&self) -> Year {
        self.years[self.final_period()]
    }

    /// Years between `period` and the period before it. Period 0 reuses the
    /// first step, or 1 when the grid has a single period.
    pub fn timestep(&self, period: Period) -> Option<u32> {
        if period >= self.years.len() {
            return None;
        }
        let step = match period {
            0 if self.years.len() > 1 => self.years[1].abs_diff(self.years[0]),
            0 => 1,
            p => self.years[p].abs_diff(self.years[p - 1]),
        };
        Some(step)
    }

    pub fn is_period_year(&self, year: Year) -> bool {
        self.years.binary_search(&year).is_ok()
    }

    pub fn periods(&self) -> impl Iterator<Item = (Period, Year)> + '_ {
        self.years.iter().copied().enumerate()
    }
}

impl YearPeriodMap for ModelTime {
    /// A year between two period years belongs to the later period. Years
    /// outside the grid are clamped to the first or final period.
    fn year_to_period(&self, year: Year) -> Period {
        match self.years.binary_search(&year) {
            Ok(period) => period,
            Err(0) => {
                tracing::warn!(
                    "Year {} precedes the first model year {}; using period 0",
                    year,
                    self.start_year()
                );
                0
            }
            Err(idx) if idx == self.years.len() => {
                tracing::warn!(
                    "Year {} is after the last model year {}; using the final period",
                    year,
                    self.end_year()
                );
                self.final_period()
            }
            Err(idx) => idx,
        }
    }

    fn period_to_year(&self, period: Period) -> Option<Year> {
        self.years.get(period).copied()
    }
}
