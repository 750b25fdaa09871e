use crate::error::ConfigurationError;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub vault: VaultConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub assumptions: CostAssumptions,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VaultConfig {
    #[serde(default = "default_vault_root")]
    pub root: PathBuf,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            root: default_vault_root(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u8,
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            retry_attempts: default_retry_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DutyBracket {
    pub lower: i64,
    #[serde(default)]
    pub upper: Option<i64>,
    pub base: f64,
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CostAssumptions {
    #[serde(default = "default_annual_interest_rate")]
    pub annual_interest_rate: f64,
    #[serde(default = "default_term_months")]
    pub term_months: u32,
    #[serde(default = "default_deposit_fraction")]
    pub deposit_fraction: f64,
    #[serde(default = "default_transfer_duty_brackets")]
    pub transfer_duty_brackets: Vec<DutyBracket>,
    #[serde(default)]
    pub fees: BTreeMap<String, f64>,
}

impl Default for CostAssumptions {
    fn default() -> Self {
        Self {
            annual_interest_rate: default_annual_interest_rate(),
            term_months: default_term_months(),
            deposit_fraction: default_deposit_fraction(),
            transfer_duty_brackets: default_transfer_duty_brackets(),
            fees: BTreeMap::new(),
        }
    }
}

impl CostAssumptions {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.term_months == 0 {
            return Err(ConfigurationError::new("term_months must be positive"));
        }
        if !self.annual_interest_rate.is_finite() || self.annual_interest_rate < 0.0 {
            return Err(ConfigurationError::new(
                "annual_interest_rate must be zero or positive",
            ));
        }
        if !(0.0..1.0).contains(&self.deposit_fraction) {
            return Err(ConfigurationError::new(
                "deposit_fraction must be at least 0 and below 1",
            ));
        }

        let brackets = &self.transfer_duty_brackets;
        if brackets.is_empty() {
            return Err(ConfigurationError::new(
                "transfer_duty_brackets must not be empty",
            ));
        }
        if brackets[0].lower != 0 {
            return Err(ConfigurationError::new(
                "first transfer duty bracket must start at 0",
            ));
        }

        for (idx, bracket) in brackets.iter().enumerate() {
            if bracket.base < 0.0 || bracket.rate < 0.0 {
                return Err(ConfigurationError::new(format!(
                    "transfer duty bracket {idx} has a negative base or rate"
                )));
            }

            match bracket.upper {
                Some(upper) => {
                    if upper <= bracket.lower {
                        return Err(ConfigurationError::new(format!(
                            "transfer duty bracket {idx} has upper bound <= lower bound"
                        )));
                    }
                    let Some(next) = brackets.get(idx + 1) else {
                        return Err(ConfigurationError::new(
                            "last transfer duty bracket must be unbounded",
                        ));
                    };
                    if next.lower != upper {
                        return Err(ConfigurationError::new(format!(
                            "transfer duty bracket {} does not start at the previous upper bound",
                            idx + 1
                        )));
                    }
                }
                None => {
                    if idx + 1 != brackets.len() {
                        return Err(ConfigurationError::new(format!(
                            "unbounded transfer duty bracket {idx} must be last"
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}

pub fn load_config(path: &Path) -> Result<AppConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    let config: AppConfig = toml::from_str(&text)
        .with_context(|| format!("failed to parse toml in {}", path.display()))?;
    config
        .assumptions
        .validate()
        .with_context(|| format!("invalid cost assumptions in {}", path.display()))?;
    Ok(config)
}

fn default_vault_root() -> PathBuf {
    PathBuf::from("data/vault")
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string()
}

fn default_timeout_secs() -> u64 {
    20
}

fn default_retry_attempts() -> u8 {
    2
}

fn default_retry_backoff_ms() -> u64 {
    500
}

fn default_annual_interest_rate() -> f64 {
    0.1075
}

fn default_term_months() -> u32 {
    240
}

fn default_deposit_fraction() -> f64 {
    0.10
}

fn default_transfer_duty_brackets() -> Vec<DutyBracket> {
    vec![
        DutyBracket {
            lower: 0,
            upper: Some(1_210_000),
            base: 0.0,
            rate: 0.0,
        },
        DutyBracket {
            lower: 1_210_000,
            upper: Some(1_663_800),
            base: 0.0,
            rate: 0.03,
        },
        DutyBracket {
            lower: 1_663_800,
            upper: Some(2_329_300),
            base: 13_614.0,
            rate: 0.06,
        },
        DutyBracket {
            lower: 2_329_300,
            upper: Some(2_994_800),
            base: 53_544.0,
            rate: 0.08,
        },
        DutyBracket {
            lower: 2_994_800,
            upper: Some(13_310_000),
            base: 106_784.0,
            rate: 0.11,
        },
        DutyBracket {
            lower: 13_310_000,
            upper: None,
            base: 1_241_456.0,
            rate: 0.13,
        },
    ]
}
