use crate::domain::model::{Period, PeriodOffset, Year};
use crate::domain::ports::Technology;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::BTreeMap;

/// Parameters inherited between vintages through `copy_param`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnologyParams {
    pub capital_cost: f64,
    pub efficiency: f64,
    pub lifetime_years: u32,
    /// Upper bound on total investment accepted per call.
    pub max_investment: Option<f64>,
}

impl Default for TechnologyParams {
    fn default() -> Self {
        Self {
            capital_cost: 1.0,
            efficiency: 1.0,
            lifetime_years: 30,
            max_investment: None,
        }
    }
}

/// Capital-accumulating technology used by the simulation driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VintageTechnology {
    name: String,
    year: Year,
    params: TechnologyParams,
    capital: f64,
    annual_investments: BTreeMap<Period, f64>,
    initialized_from: Option<(Year, Period)>,
}

impl VintageTechnology {
    pub fn new(name: impl Into<String>, year: Year) -> Self {
        Self {
            name: name.into(),
            year,
            params: TechnologyParams::default(),
            capital: 0.0,
            annual_investments: BTreeMap::new(),
            initialized_from: None,
        }
    }

    pub fn with_params(mut self, params: TechnologyParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_capital(mut self, capital: f64) -> Self {
        self.capital = capital;
        self
    }

    pub fn with_annual_investment(mut self, period: Period, rate: f64) -> Self {
        self.annual_investments.insert(period, rate);
        self
    }

    pub fn with_max_investment(mut self, max_investment: f64) -> Self {
        self.params.max_investment = Some(max_investment);
        self
    }

    pub fn params(&self) -> &TechnologyParams {
        &self.params
    }

    /// Year and period of the vintage this one last copied parameters from.
    pub fn initialized_from(&self) -> Option<(Year, Period)> {
        self.initialized_from
    }
}

impl Technology for VintageTechnology {
    fn name(&self) -> &str {
        &self.name
    }

    fn year(&self) -> Year {
        self.year
    }

    fn set_year(&mut self, year: Year) {
        self.year = year;
    }

    fn capital(&self) -> f64 {
        self.capital
    }

    fn annual_investment(&self, offset: PeriodOffset) -> f64 {
        match offset {
            PeriodOffset::Latest => self
                .annual_investments
                .values()
                .next_back()
                .copied()
                .unwrap_or(0.0),
            PeriodOffset::At(period) => self.annual_investments.get(&period).copied().unwrap_or(0.0),
        }
    }

    /// 新的年份只繼承參數，不繼承資本存量與投資紀錄
    fn clone_box(&self) -> Box<dyn Technology> {
        Box::new(Self {
            name: self.name.clone(),
            year: self.year,
            params: self.params.clone(),
            capital: 0.0,
            annual_investments: BTreeMap::new(),
            initialized_from: self.initialized_from,
        })
    }

    fn copy_param(&mut self, source: &dyn Technology, period: Period) {
        match source.as_any().downcast_ref::<Self>() {
            Some(base) => {
                self.params = base.params.clone();
                self.initialized_from = Some((base.year, period));
            }
            None => tracing::warn!(
                "Cannot copy parameters into {} {} from a different kind of technology ({})",
                self.name,
                self.year,
                source.name()
            ),
        }
    }

    fn set_investment(
        &mut self,
        region: &str,
        annual_investment: f64,
        total_investment: f64,
        period: Period,
    ) -> f64 {
        let applied = match self.params.max_investment {
            Some(limit) if total_investment > limit => {
                tracing::debug!(
                    "{} {} in {}: investment {} limited to {}",
                    self.name,
                    self.year,
                    region,
                    total_investment,
                    limit
                );
                limit
            }
            _ => total_investment,
        };

        let scale = if total_investment > 0.0 {
            applied / total_investment
        } else {
            0.0
        };

        self.annual_investments.insert(period, annual_investment * scale);
        self.capital += applied;
        applied
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> TechnologyParams {
        TechnologyParams {
            capital_cost: 2000.0,
            efficiency: 0.5,
            lifetime_years: 40,
            max_investment: None,
        }
    }

    #[test]
    fn test_copy_param_keeps_identity_and_capital() {
        let base = VintageTechnology::new("coal", 2005).with_params(params());
        let mut old = VintageTechnology::new("coal", 1990).with_capital(75.0);

        old.copy_param(&base, 2);

        assert_eq!(old.params(), base.params());
        assert_eq!(old.year(), 1990);
        assert_eq!(old.capital(), 75.0);
        assert_eq!(old.initialized_from(), Some((2005, 2)));
    }

    #[derive(Debug, Clone)]
    struct OtherKind;

    impl Technology for OtherKind {
        fn name(&self) -> &str {
            "other"
        }
        fn year(&self) -> Year {
            2000
        }
        fn set_year(&mut self, _year: Year) {}
        fn capital(&self) -> f64 {
            0.0
        }
        fn annual_investment(&self, _offset: PeriodOffset) -> f64 {
            0.0
        }
        fn clone_box(&self) -> Box<dyn Technology> {
            Box::new(self.clone())
        }
        fn copy_param(&mut self, _source: &dyn Technology, _period: Period) {}
        fn set_investment(&mut self, _region: &str, _annual: f64, total: f64, _period: Period) -> f64 {
            total
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn test_copy_param_ignores_other_kinds() {
        let mut tech = VintageTechnology::new("coal", 1990).with_params(params());
        tech.copy_param(&OtherKind, 0);
        assert_eq!(tech.params(), &params());
        assert_eq!(tech.initialized_from(), None);
    }

    #[test]
    fn test_clone_box_starts_fresh() {
        let tech = VintageTechnology::new("coal", 2005)
            .with_params(params())
            .with_capital(500.0)
            .with_annual_investment(2, 25.0);

        let clone = tech.clone_box();
        assert_eq!(clone.year(), 2005);
        assert_eq!(clone.capital(), 0.0);
        assert_eq!(clone.annual_investment(PeriodOffset::Latest), 0.0);
        let clone = clone.as_any().downcast_ref::<VintageTechnology>().unwrap();
        assert_eq!(clone.params(), &params());
    }

    #[test]
    fn test_set_investment_accumulates_capital() {
        let mut tech = VintageTechnology::new("wind", 2010);
        assert_eq!(tech.set_investment("USA", 10.0, 50.0, 3), 50.0);
        assert_eq!(tech.set_investment("USA", 20.0, 75.0, 4), 75.0);

        assert_eq!(tech.capital(), 125.0);
        assert_eq!(tech.annual_investment(PeriodOffset::At(3)), 10.0);
        assert_eq!(tech.annual_investment(PeriodOffset::Latest), 20.0);
        assert_eq!(tech.annual_investment(PeriodOffset::At(9)), 0.0);
    }

    #[test]
    fn test_set_investment_respects_limit() {
        let mut tech = VintageTechnology::new("wind", 2010).with_max_investment(40.0);
        let applied = tech.set_investment("USA", 10.0, 80.0, 3);

        assert_eq!(applied, 40.0);
        assert_eq!(tech.capital(), 40.0);
        assert_eq!(tech.annual_investment(PeriodOffset::At(3)), 5.0);
    }
}
