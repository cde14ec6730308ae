use crate::core::arena::TechnologyArena;
use crate::core::registry::VintageSeries;
use crate::domain::model::{VintageOutcome, Year};
use crate::domain::ports::YearPeriodMap;
use crate::utils::error::{Result, VintageError};

impl VintageSeries {
    /// Initialize every vintage older than `base_year` with the parameters of
    /// the base-year vintage, evaluated at the base period.
    ///
    /// Returns how many vintages were initialized. Vintages at or after the
    /// base year are not touched.
    pub fn back_propagate_from_base(
        &self,
        arena: &mut TechnologyArena,
        base_year: Year,
        time: &dyn YearPeriodMap,
    ) -> Result<usize> {
        let Some(base) = self.find(base_year) else {
            tracing::error!(
                "Invalid base year {} for technology type {}. Cannot initialize previous base technologies.",
                base_year,
                self.name()
            );
            return Err(VintageError::BaseYearMissing {
                series: self.name().to_string(),
                year: base_year,
            });
        };

        let base_period = time.year_to_period(base_year);
        let mut initialized = 0;
        for (year, id) in self.range_before(base_year) {
            if let Some((target, source)) = arena.pair_mut(id, base) {
                target.copy_param(source, base_period);
                initialized += 1;
                tracing::debug!(
                    "Initialized {} vintage {} from base year {} (period {})",
                    self.name(),
                    year,
                    base_year,
                    base_period
                );
            }
        }

        Ok(initialized)
    }

    /// Advance the series to `new_year` using the vintage at `reference_year`.
    ///
    /// An existing `new_year` vintage has its parameters refreshed from the
    /// reference; otherwise the reference is cloned into a new vintage that is
    /// pushed into `arena` and registered here.
    ///
    /// # Panics
    ///
    /// Panics if the series is empty.
    pub fn resolve_or_create(
        &mut self,
        arena: &mut TechnologyArena,
        new_year: Year,
        reference_year: Year,
        time: &dyn YearPeriodMap,
    ) -> Result<VintageOutcome> {
        assert!(
            !self.is_empty(),
            "cannot advance technology type {} with no vintages",
            self.name()
        );

        let Some(reference) = self.find(reference_year) else {
            tracing::error!(
                "Invalid current technology year {} for technology type {}. Cannot initialize current technology.",
                reference_year,
                self.name()
            );
            return Err(VintageError::ReferenceYearMissing {
                series: self.name().to_string(),
                year: reference_year,
            });
        };

        if let Some(existing) = self.find(new_year) {
            let new_period = time.year_to_period(new_year);
            if let Some((target, source)) = arena.pair_mut(existing, reference) {
                target.copy_param(source, new_period);
            }
            tracing::debug!(
                "Updated {} vintage {} from {} (period {})",
                self.name(),
                new_year,
                reference_year,
                new_period
            );
            return Ok(VintageOutcome::Updated(existing));
        }

        let mut tech = arena[reference].clone_box();
        tech.set_year(new_year);
        let id = arena.push(tech);
        self.insert(arena, new_year, id)?;
        tracing::debug!(
            "Created {} vintage {} from {}",
            self.name(),
            new_year,
            reference_year
        );
        Ok(VintageOutcome::Created(id))
    }

    /// Capital stock of every vintage up to and including `up_to_year`.
    pub fn total_capital_stock(&self, arena: &TechnologyArena, up_to_year: Year) -> f64 {
        self.sum_capital_up_to(arena, f64::from(up_to_year))
    }
}
