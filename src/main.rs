use anyhow::Context;
use clap::Parser;
use vintage_engine::adapters::report::{render, write_report, OutputFormat};
use vintage_engine::utils::error::{ErrorSeverity, VintageError};
use vintage_engine::utils::{logger, validation::Validate};
use vintage_engine::{CliConfig, ScenarioConfig, SimulationReport, VintageSimulation};

fn main() -> anyhow::Result<()> {
    let args = CliConfig::parse();

    // 初始化日誌
    if args.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting vintage-engine");
    tracing::info!("📁 Loading scenario from: {}", args.config);
    if args.verbose {
        tracing::debug!("CLI config: {:?}", args);
    }

    // 載入並驗證配置
    let config = match ScenarioConfig::from_file(&args.config).and_then(|c| c.validate().map(|_| c)) {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };

    let format = match args.output_format() {
        Ok(format) => format.unwrap_or_else(|| config.output_format()),
        Err(e) => exit_with(&e),
    };
    let output_path = args
        .output
        .clone()
        .or_else(|| config.output_path().map(str::to_string));

    tracing::info!("✅ Scenario loaded and validated successfully");
    display_summary(&config, format, output_path.as_deref());

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No periods will be simulated");
        return Ok(());
    }

    let mut simulation = match VintageSimulation::new(config) {
        Ok(simulation) => simulation,
        Err(e) => exit_with(&e),
    };

    let report = match simulation.run() {
        Ok(report) => report,
        Err(e) => exit_with(&e),
    };

    emit(&report, format, output_path.as_deref())?;

    tracing::info!(
        "✅ Simulation completed: {} periods, total investment {:.2}, final capital stock {:.2}",
        report.periods.len(),
        report.total_applied_investment(),
        report.final_capital_stock()
    );

    Ok(())
}

fn display_summary(config: &ScenarioConfig, format: OutputFormat, output_path: Option<&str>) {
    tracing::info!("📋 Scenario: {} ({})", config.scenario.name, config.scenario.region);
    if let Some(description) = &config.scenario.description {
        tracing::info!("   {}", description);
    }
    if let Ok(time) = config.model_time() {
        tracing::info!(
            "🕒 Periods: {} ({} - {}), base year {}",
            time.num_periods(),
            time.start_year(),
            time.end_year(),
            config.time.base_year
        );
    }
    tracing::info!(
        "🏭 Technology: {} with {} seed vintages",
        config.technology.name,
        config.technology.vintages.len()
    );
    tracing::info!(
        "📤 Output: {:?} -> {}",
        format,
        output_path.unwrap_or("stdout")
    );
}

fn emit(report: &SimulationReport, format: OutputFormat, output_path: Option<&str>) -> anyhow::Result<()> {
    match output_path {
        Some(path) => {
            write_report(report, format, path)
                .with_context(|| format!("failed to write report to {}", path))?;
            tracing::info!("📁 Report saved to: {}", path);
        }
        None => {
            let content = render(report, format).context("failed to render report")?;
            println!("{}", content);
        }
    }
    Ok(())
}

fn exit_with(e: &VintageError) -> ! {
    // 記錄詳細錯誤信息
    tracing::error!(
        "❌ vintage-engine failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
