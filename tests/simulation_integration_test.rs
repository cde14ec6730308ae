use anyhow::Result;
use tempfile::TempDir;
use vintage_engine::adapters::report::{self, OutputFormat};
use vintage_engine::domain::model::VintageAction;
use vintage_engine::{ScenarioConfig, VintageSimulation, VintageTechnology};

const SCENARIO: &str = r#"
[scenario]
name = "reference"
region = "USA"
description = "Coal vintages on an uneven grid"

[time]
years = [1975, 1990, 2005, 2010, 2015]
base_year = 2005

[technology]
name = "coal"
capital_cost = 1500.0
efficiency = 0.35
lifetime_years = 40

[[technology.vintages]]
year = 1960
capital = 40.0

[[technology.vintages]]
year = 1975
capital = 60.0
annual_investment = 4.0

[investment]
annual = [0.0, 5.0, 6.0, 8.0, 9.0]
"#;

fn create_test_config(dir: &TempDir, content: &str) -> Result<String> {
    let path = dir.path().join("scenario.toml");
    std::fs::write(&path, content)?;
    Ok(path.to_string_lossy().replace('\\', "/"))
}

#[test]
fn test_full_run_from_config_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = create_test_config(&temp_dir, SCENARIO)?;

    let config = ScenarioConfig::from_file(&path)?;
    let mut simulation = VintageSimulation::new(config)?;
    let report = simulation.run()?;

    let actions: Vec<VintageAction> = report.periods.iter().map(|p| p.action).collect();
    assert_eq!(
        actions,
        vec![
            VintageAction::Seeded,
            VintageAction::Created,
            VintageAction::Created,
            VintageAction::Created,
            VintageAction::Created,
        ]
    );

    let applied: Vec<f64> = report.periods.iter().map(|p| p.applied_investment).collect();
    assert_eq!(applied, vec![0.0, 67.5, 82.5, 35.0, 42.5]);

    let requested: Vec<f64> = report.periods.iter().map(|p| p.requested_investment).collect();
    assert_eq!(requested, applied);

    let stock: Vec<f64> = report.periods.iter().map(|p| p.capital_stock).collect();
    assert_eq!(stock, vec![100.0, 167.5, 250.0, 285.0, 327.5]);

    assert_eq!(report.periods.last().map(|p| p.vintages), Some(6));
    assert_eq!(report.total_applied_investment(), 227.5);
    assert_eq!(report.final_capital_stock(), 327.5);
    Ok(())
}

#[test]
fn test_base_year_calibration_reaches_older_vintages() -> Result<()> {
    let config = ScenarioConfig::from_toml_str(SCENARIO)?;
    let mut simulation = VintageSimulation::new(config)?;
    simulation.run()?;

    let series = simulation.series();
    for year in [1960, 1975, 1990] {
        let id = series.find(year).expect("vintage exists");
        let tech = simulation.arena()[id]
            .as_any()
            .downcast_ref::<VintageTechnology>()
            .expect("vintage technology");
        assert_eq!(tech.initialized_from(), Some((2005, 2)), "vintage {}", year);
    }

    let newer = series.find(2010).expect("vintage exists");
    let newer = simulation.arena()[newer]
        .as_any()
        .downcast_ref::<VintageTechnology>()
        .expect("vintage technology");
    assert_eq!(newer.initialized_from(), None);
    Ok(())
}

#[test]
fn test_investment_limit_is_reported() -> Result<()> {
    let content = SCENARIO.replace("lifetime_years = 40", "lifetime_years = 40\nmax_investment = 50.0");
    let config = ScenarioConfig::from_toml_str(&content)?;
    let report = VintageSimulation::new(config)?.run()?;

    let applied: Vec<f64> = report.periods.iter().map(|p| p.applied_investment).collect();
    assert_eq!(report.periods[1].requested_investment, 67.5);
    assert_eq!(applied[1], 50.0);
    assert!(report.periods[2].requested_investment > 50.0);
    assert_eq!(applied[2], 50.0);
    assert!(applied.iter().all(|a| *a <= 50.0));
    assert!(report.final_capital_stock() < 327.5);
    Ok(())
}

#[test]
fn test_invalid_scenario_is_rejected_before_running() -> Result<()> {
    let content = SCENARIO.replace("annual = [0.0, 5.0, 6.0, 8.0, 9.0]", "annual = [0.0, 5.0, -6.0, 8.0, 9.0]");
    let config = ScenarioConfig::from_toml_str(&content)?;

    assert!(VintageSimulation::new(config).is_err());
    Ok(())
}

#[test]
fn test_vanishing_growth_schedule_is_rejected_before_running() -> Result<()> {
    let content = r#"
[scenario]
name = "decline"
region = "EU"

[time]
start_year = 2000
timesteps = [100, 100, 100]
base_year = 2000

[technology]
name = "coal"
capital_cost = 1500.0
efficiency = 0.35
lifetime_years = 40

[[technology.vintages]]
year = 2000
capital = 10.0

[investment]
initial = 100.0
growth_rate = -0.99
"#;
    let config = ScenarioConfig::from_toml_str(content)?;

    assert!(VintageSimulation::new(config).is_err());
    Ok(())
}

#[test]
fn test_report_written_as_csv() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = ScenarioConfig::from_toml_str(SCENARIO)?;
    let report = VintageSimulation::new(config)?.run()?;

    let output = temp_dir.path().join("out").join("coal.csv");
    report::write_report(&report, OutputFormat::Csv, &output)?;

    let content = std::fs::read_to_string(&output)?;
    let mut reader = csv::Reader::from_reader(content.as_bytes());
    let rows: Vec<csv::StringRecord> = reader.records().collect::<std::result::Result<_, _>>()?;

    assert_eq!(rows.len(), 5);
    assert_eq!(&rows[0][2], "seeded");
    assert_eq!(&rows[4][1], "2015");
    Ok(())
}
