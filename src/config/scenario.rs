use crate::adapters::report::OutputFormat;
use crate::adapters::technology::TechnologyParams;
use crate::core::time::ModelTime;
use crate::domain::model::{Period, Year};
use crate::utils::error::{Result, VintageError};
use crate::utils::validation::{
    validate_non_empty_string, validate_non_negative_number, validate_path,
    validate_positive_number, validate_range, validate_required_field, validate_unique, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub scenario: ScenarioSection,
    pub time: TimeConfig,
    pub technology: TechnologyConfig,
    pub investment: InvestmentConfig,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioSection {
    pub name: String,
    pub region: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeConfig {
    pub years: Option<Vec<Year>>,
    pub start_year: Option<Year>,
    pub timesteps: Option<Vec<u32>>,
    pub base_year: Year,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnologyConfig {
    pub name: String,
    pub capital_cost: f64,
    pub efficiency: f64,
    pub lifetime_years: u32,
    pub max_investment: Option<f64>,
    #[serde(default)]
    pub vintages: Vec<VintageSeed>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VintageSeed {
    pub year: Year,
    #[serde(default)]
    pub capital: f64,
    pub annual_investment: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestmentConfig {
    /// 每個期間的年投資額，長度需與期間數相同
    pub annual: Option<Vec<f64>>,
    pub initial: Option<f64>,
    pub growth_rate: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: Option<OutputFormat>,
    pub path: Option<String>,
}

impl ScenarioConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(VintageError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| VintageError::ConfigParseError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${REGION})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR.get_or_init(|| {
            Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("env var pattern is a valid regex")
        });

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    /// 依照 years 或 start_year + timesteps 建立時間軸
    pub fn model_time(&self) -> Result<ModelTime> {
        match &self.time.years {
            Some(years) => ModelTime::new(years.clone()),
            None => {
                let start = validate_required_field("time.start_year", &self.time.start_year)?;
                let steps = validate_required_field("time.timesteps", &self.time.timesteps)?;
                ModelTime::from_timesteps(*start, steps)
            }
        }
    }

    pub fn technology_params(&self) -> TechnologyParams {
        TechnologyParams {
            capital_cost: self.technology.capital_cost,
            efficiency: self.technology.efficiency,
            lifetime_years: self.technology.lifetime_years,
            max_investment: self.technology.max_investment,
        }
    }

    /// 取得指定期間的年投資額
    pub fn annual_investment(&self, period: Period, year: Year, start_year: Year) -> f64 {
        if let Some(annual) = &self.investment.annual {
            return annual.get(period).copied().unwrap_or(0.0);
        }

        let initial = self.investment.initial.unwrap_or(0.0);
        let growth = self.investment.growth_rate.unwrap_or(0.0);
        initial * (1.0 + growth).powi(year - start_year)
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output
            .as_ref()
            .and_then(|o| o.format)
            .unwrap_or_default()
    }

    pub fn output_path(&self) -> Option<&str> {
        self.output.as_ref().and_then(|o| o.path.as_deref())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("scenario.name", &self.scenario.name)?;
        validate_non_empty_string("scenario.region", &self.scenario.region)?;
        validate_non_empty_string("technology.name", &self.technology.name)?;

        let time = self.model_time()?;
        if !time.is_period_year(self.time.base_year) {
            return Err(VintageError::InvalidConfigValueError {
                field: "time.base_year".to_string(),
                value: self.time.base_year.to_string(),
                reason: "Base year must be one of the model period years".to_string(),
            });
        }

        validate_positive_number("technology.capital_cost", self.technology.capital_cost)?;
        validate_range("technology.efficiency", self.technology.efficiency, f64::MIN_POSITIVE, 1.0)?;
        validate_range("technology.lifetime_years", self.technology.lifetime_years, 1, 200)?;
        if let Some(limit) = self.technology.max_investment {
            validate_positive_number("technology.max_investment", limit)?;
        }

        // 至少要有一個起始年份，序列才能往後推進
        if self.technology.vintages.is_empty() {
            return Err(VintageError::MissingConfigError {
                field: "technology.vintages".to_string(),
            });
        }
        let seed_years: Vec<Year> = self.technology.vintages.iter().map(|v| v.year).collect();
        validate_unique("technology.vintages.year", &seed_years)?;
        for seed in &self.technology.vintages {
            validate_non_negative_number("technology.vintages.capital", seed.capital)?;
            if let Some(rate) = seed.annual_investment {
                validate_non_negative_number("technology.vintages.annual_investment", rate)?;
            }
            if seed.year > time.start_year() {
                return Err(VintageError::InvalidConfigValueError {
                    field: "technology.vintages.year".to_string(),
                    value: seed.year.to_string(),
                    reason: format!("Seed vintages must not be later than the first model year {}", time.start_year()),
                });
            }
        }

        self.validate_investment(&time)?;

        if let Some(path) = self.output_path() {
            validate_path("output.path", path)?;
        }

        Ok(())
    }

    fn validate_investment(&self, time: &ModelTime) -> Result<()> {
        match &self.investment.annual {
            Some(annual) => {
                if annual.len() != time.num_periods() {
                    return Err(VintageError::InvalidConfigValueError {
                        field: "investment.annual".to_string(),
                        value: annual.len().to_string(),
                        reason: format!("Expected one value per period ({})", time.num_periods()),
                    });
                }
                // 第 0 期不投資，只檢查之後的期間
                for value in annual.iter().skip(1) {
                    validate_positive_number("investment.annual", *value)?;
                }
            }
            None => {
                let initial = validate_required_field("investment.initial", &self.investment.initial)?;
                validate_positive_number("investment.initial", *initial)?;
                if let Some(growth) = self.investment.growth_rate {
                    validate_range("investment.growth_rate", growth, -0.99, 10.0)?;
                }
                // 成長率在範圍內仍可能下溢到 0 或溢位成 inf
                for (period, year) in time.periods().skip(1) {
                    let value = self.annual_investment(period, year, time.start_year());
                    validate_positive_number("investment.annual", value)?;
                }
            }
        }
        Ok(())
    }
}

impl Validate for ScenarioConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
