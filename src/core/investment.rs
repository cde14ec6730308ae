use crate::core::arena::TechnologyArena;
use crate::core::interpolation::interpolate_and_sum;
use crate::core::registry::VintageSeries;
use crate::domain::model::{Period, PeriodOffset, Year};

impl VintageSeries {
    /// Interpolated total investment for the `current_year` vintage before the
    /// technology applies any limit of its own. A missing `prev_year` vintage
    /// contributes a zero annual rate.
    pub fn requested_total_investment(
        &self,
        arena: &TechnologyArena,
        prev_year: Year,
        current_year: Year,
        annual_investment: f64,
    ) -> f64 {
        // 第一個年份沒有前一期，視為零投資
        let prev_annual = self
            .find(prev_year)
            .map(|id| arena[id].annual_investment(PeriodOffset::Latest))
            .unwrap_or(0.0);

        interpolate_and_sum(
            prev_annual,
            annual_investment,
            current_year.abs_diff(prev_year),
        )
    }

    /// Set total investment for the `current_year` vintage from an annual
    /// investment level, interpolating from the `prev_year` vintage's most
    /// recent annual investment.
    ///
    /// Returns the amount the technology reports as actually invested.
    ///
    /// # Panics
    ///
    /// Panics when `prev_year >= current_year`, when `annual_investment` is not
    /// a finite number greater than zero, when no vintage exists for
    /// `current_year`, or when the interpolated total is not positive. All
    /// checks run before any vintage is modified.
    pub fn set_total_investment(
        &self,
        arena: &mut TechnologyArena,
        region: &str,
        prev_year: Year,
        current_year: Year,
        annual_investment: f64,
        period: Period,
    ) -> f64 {
        assert!(
            prev_year < current_year,
            "previous investment year {} must precede current year {}",
            prev_year,
            current_year
        );
        assert!(
            annual_investment.is_finite() && annual_investment > 0.0,
            "annual investment for {} must be a finite positive number, got {}",
            self.name(),
            annual_investment
        );

        let Some(current) = self.find(current_year) else {
            panic!(
                "no {} vintage for year {}; it must be created before investment is set",
                self.name(),
                current_year
            );
        };

        let total = self.requested_total_investment(arena, prev_year, current_year, annual_investment);
        assert!(
            total.is_finite() && total > 0.0,
            "total investment for {} vintage {} must be a finite positive number, got {}",
            self.name(),
            current_year,
            total
        );

        let applied = arena[current].set_investment(region, annual_investment, total, period);
        tracing::debug!(
            region,
            series = self.name(),
            year = current_year,
            requested = total,
            applied,
            "Set total investment"
        );
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::technology::VintageTechnology;
    use crate::domain::model::TechId;
    use crate::domain::ports::Technology;
    use std::any::Any;
    use std::sync::{Arc, Mutex};

    fn series_with(vintages: Vec<VintageTechnology>) -> (VintageSeries, TechnologyArena) {
        let mut arena = TechnologyArena::new();
        let mut series = VintageSeries::new("nuclear");
        for tech in vintages {
            let year = tech.year();
            let id = arena.push(Box::new(tech));
            series.insert(&arena, year, id).unwrap();
        }
        (series, arena)
    }

    #[test]
    fn test_interpolates_from_previous_vintage() {
        let (series, mut arena) = series_with(vec![
            VintageTechnology::new("nuclear", 2000).with_annual_investment(0, 50.0),
            VintageTechnology::new("nuclear", 2010),
        ]);

        let applied = series.set_total_investment(&mut arena, "USA", 2000, 2010, 150.0, 1);
        assert_eq!(applied, 1000.0);

        let current = series.find(2010).unwrap();
        assert_eq!(arena[current].capital(), 1000.0);
        assert_eq!(arena[current].annual_investment(PeriodOffset::At(1)), 150.0);
    }

    #[test]
    fn test_missing_previous_vintage_counts_as_zero() {
        let (series, mut arena) = series_with(vec![VintageTechnology::new("nuclear", 2010)]);

        let applied = series.set_total_investment(&mut arena, "USA", 2005, 2010, 40.0, 2);
        assert_eq!(applied, 100.0);
    }

    #[test]
    fn test_returns_amount_reported_by_technology() {
        let (series, mut arena) = series_with(vec![
            VintageTechnology::new("nuclear", 2000).with_annual_investment(0, 100.0),
            VintageTechnology::new("nuclear", 2010).with_max_investment(600.0),
        ]);

        assert_eq!(series.requested_total_investment(&arena, 2000, 2010, 100.0), 1000.0);
        let applied = series.set_total_investment(&mut arena, "USA", 2000, 2010, 100.0, 1);
        assert_eq!(applied, 600.0);
    }

    #[derive(Debug, Clone)]
    struct RecordingTech {
        year: Year,
        received: Arc<Mutex<Option<f64>>>,
    }

    impl Technology for RecordingTech {
        fn name(&self) -> &str {
            "recorder"
        }
        fn year(&self) -> Year {
            self.year
        }
        fn set_year(&mut self, year: Year) {
            self.year = year;
        }
        fn capital(&self) -> f64 {
            0.0
        }
        fn annual_investment(&self, _offset: PeriodOffset) -> f64 {
            50.0
        }
        fn clone_box(&self) -> Box<dyn Technology> {
            Box::new(self.clone())
        }
        fn copy_param(&mut self, _source: &dyn Technology, _period: Period) {}
        fn set_investment(&mut self, _region: &str, _annual: f64, total: f64, _period: Period) -> f64 {
            *self.received.lock().unwrap() = Some(total);
            total * 0.5
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn test_forwards_exact_total_to_current_vintage() {
        let received = Arc::new(Mutex::new(None));
        let mut arena = TechnologyArena::new();
        let mut series = VintageSeries::new("recorder");
        for year in [2000, 2010] {
            let id: TechId = arena.push(Box::new(RecordingTech {
                year,
                received: received.clone(),
            }));
            series.insert(&arena, year, id).unwrap();
        }

        let applied = series.set_total_investment(&mut arena, "EU", 2000, 2010, 150.0, 3);
        assert_eq!(*received.lock().unwrap(), Some(1000.0));
        assert_eq!(applied, 500.0);
    }

    #[test]
    #[should_panic(expected = "must precede")]
    fn test_non_increasing_years_panic() {
        let (series, mut arena) = series_with(vec![VintageTechnology::new("nuclear", 2010)]);
        series.set_total_investment(&mut arena, "USA", 2010, 2010, 10.0, 1);
    }

    #[test]
    #[should_panic(expected = "finite positive")]
    fn test_non_positive_investment_panics() {
        let (series, mut arena) = series_with(vec![VintageTechnology::new("nuclear", 2010)]);
        series.set_total_investment(&mut arena, "USA", 2005, 2010, 0.0, 1);
    }

    #[test]
    #[should_panic(expected = "must be created before")]
    fn test_missing_current_vintage_panics() {
        let (series, mut arena) = series_with(vec![VintageTechnology::new("nuclear", 2000)]);
        series.set_total_investment(&mut arena, "USA", 2000, 2010, 10.0, 1);
    }

    #[test]
    fn test_precondition_violation_leaves_vintages_untouched() {
        let (series, mut arena) = series_with(vec![
            VintageTechnology::new("nuclear", 2000).with_annual_investment(0, 50.0),
            VintageTechnology::new("nuclear", 2010),
        ]);

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            series.set_total_investment(&mut arena, "USA", 2010, 2000, 150.0, 1);
        }));
        assert!(result.is_err());

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            series.set_total_investment(&mut arena, "USA", 2000, 2010, f64::NAN, 1);
        }));
        assert!(result.is_err());

        for (_, id) in series.iter() {
            assert_eq!(arena[id].capital(), 0.0);
        }
        assert_eq!(arena[series.find(2010).unwrap()].annual_investment(PeriodOffset::Latest), 0.0);
    }
}
