use crate::adapters::technology::VintageTechnology;
use crate::config::ScenarioConfig;
use crate::core::arena::TechnologyArena;
use crate::core::registry::VintageSeries;
use crate::core::time::ModelTime;
use crate::domain::model::{Period, PeriodReport, SimulationReport, VintageAction, Year};
use crate::domain::ports::YearPeriodMap;
use crate::utils::error::Result;
use crate::utils::validation::Validate;

/// Drives one vintage series through every period of the model time grid.
pub struct VintageSimulation {
    config: ScenarioConfig,
    time: ModelTime,
    arena: TechnologyArena,
    series: VintageSeries,
}

impl VintageSimulation {
    /// Validate the scenario, build the time grid and seed the configured vintages.
    pub fn new(config: ScenarioConfig) -> Result<Self> {
        config.validate()?;
        let time = config.model_time()?;
        let mut arena = TechnologyArena::new();
        let mut series = VintageSeries::new(config.technology.name.clone());

        for seed in &config.technology.vintages {
            let mut tech = VintageTechnology::new(config.technology.name.clone(), seed.year)
                .with_params(config.technology_params())
                .with_capital(seed.capital);
            if let Some(rate) = seed.annual_investment {
                // 起始年份都不晚於第 0 期
                tech = tech.with_annual_investment(0, rate);
            }
            let id = arena.push(Box::new(tech));
            series.insert(&arena, seed.year, id)?;
        }

        tracing::info!(
            "Seeded {} vintages of {} over {} periods",
            series.len(),
            series.name(),
            time.num_periods()
        );

        Ok(Self {
            config,
            time,
            arena,
            series,
        })
    }

    pub fn series(&self) -> &VintageSeries {
        &self.series
    }

    pub fn arena(&self) -> &TechnologyArena {
        &self.arena
    }

    pub fn time(&self) -> &ModelTime {
        &self.time
    }

    pub fn run(&mut self) -> Result<SimulationReport> {
        let mut report = SimulationReport {
            scenario: self.config.scenario.name.clone(),
            region: self.config.scenario.region.clone(),
            technology: self.series.name().to_string(),
            periods: Vec::with_capacity(self.time.num_periods()),
        };

        let years: Vec<(Period, Year)> = self.time.periods().collect();
        for (period, year) in years {
            let period_report = self.run_period(period, year);
            tracing::info!(
                "Period {} ({}): {:?}, {} vintages, capital stock {:.2}",
                period,
                year,
                period_report.action,
                period_report.vintages,
                period_report.capital_stock
            );
            report.periods.push(period_report);
        }

        Ok(report)
    }

    fn run_period(&mut self, period: Period, year: Year) -> PeriodReport {
        let action = if period == 0 && self.series.contains(year) {
            VintageAction::Seeded
        } else {
            self.advance_to(year)
        };

        if year == self.config.time.base_year {
            if let Err(e) = self
                .series
                .back_propagate_from_base(&mut self.arena, year, &self.time)
            {
                tracing::warn!("Skipping base year calibration: {}", e);
            }
        }

        let mut annual_investment = 0.0;
        let mut requested_investment = 0.0;
        let mut applied_investment = 0.0;
        if period > 0 && action != VintageAction::Skipped {
            annual_investment =
                self.config
                    .annual_investment(period, year, self.time.start_year());
            if let Some(prev_year) = self.time.period_to_year(period - 1) {
                requested_investment = self.series.requested_total_investment(
                    &self.arena,
                    prev_year,
                    year,
                    annual_investment,
                );
                applied_investment = self.series.set_total_investment(
                    &mut self.arena,
                    &self.config.scenario.region,
                    prev_year,
                    year,
                    annual_investment,
                    period,
                );
            }
        }

        PeriodReport {
            period,
            year,
            action,
            vintages: self.series.len(),
            annual_investment,
            requested_investment,
            applied_investment,
            capital_stock: self.series.total_capital_stock(&self.arena, year),
        }
    }

    /// 找最近的前一個年份作為參考，建立或更新這一期的年份
    fn advance_to(&mut self, year: Year) -> VintageAction {
        match self.series.latest_year_before(year) {
            Some(reference) => {
                match self
                    .series
                    .resolve_or_create(&mut self.arena, year, reference, &self.time)
                {
                    Ok(outcome) => outcome.into(),
                    Err(e) => {
                        tracing::warn!("Skipping period year {}: {}", year, e);
                        VintageAction::Skipped
                    }
                }
            }
            None => {
                tracing::warn!(
                    "No vintage of {} at or before {}; skipping period",
                    self.series.name(),
                    year
                );
                VintageAction::Skipped
            }
        }
    }
}
