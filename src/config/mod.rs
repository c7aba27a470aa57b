use crate::engine::{AnalysisSettings, CohortMembership, DEFAULT_RECOMMENDATION_LIMIT};
use std::env;
use std::fmt;

/// Distinguishes runtime behavior for different deployment stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the advisor.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    pub engine: EngineConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let recommendation_limit = match env::var("ADVISOR_RECOMMENDATION_LIMIT") {
            Ok(raw) => parse_limit(&raw)?,
            Err(_) => DEFAULT_RECOMMENDATION_LIMIT,
        };
        let rank_by_impact = match env::var("ADVISOR_RANK_BY_IMPACT") {
            Ok(raw) => parse_flag("ADVISOR_RANK_BY_IMPACT", &raw)?,
            Err(_) => false,
        };
        let includes_subject = match env::var("ADVISOR_COHORT_INCLUDES_SUBJECT") {
            Ok(raw) => parse_flag("ADVISOR_COHORT_INCLUDES_SUBJECT", &raw)?,
            Err(_) => true,
        };

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level },
            engine: EngineConfig {
                recommendation_limit,
                rank_by_impact,
                cohort_membership: if includes_subject {
                    CohortMembership::IncludeSubject
                } else {
                    CohortMembership::ExcludeSubject
                },
            },
        })
    }
}

fn parse_limit(raw: &str) -> Result<usize, ConfigError> {
    match raw.trim().parse::<usize>() {
        Ok(limit) if limit > 0 => Ok(limit),
        _ => Err(ConfigError::InvalidRecommendationLimit {
            value: raw.to_string(),
        }),
    }
}

fn parse_flag(variable: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            variable,
            value: raw.to_string(),
        }),
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Knobs applied on top of the versioned rule tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub recommendation_limit: usize,
    pub rank_by_impact: bool,
    /// Revenue portfolio baseline only; engagement always excludes the subject.
    pub cohort_membership: CohortMembership,
}

impl EngineConfig {
    pub fn to_settings(&self) -> AnalysisSettings {
        AnalysisSettings {
            recommendation_limit: self.recommendation_limit,
            rank_by_impact: self.rank_by_impact,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            recommendation_limit: DEFAULT_RECOMMENDATION_LIMIT,
            rank_by_impact: false,
            cohort_membership: CohortMembership::IncludeSubject,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidRecommendationLimit {
        value: String,
    },
    InvalidFlag {
        variable: &'static str,
        value: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidRecommendationLimit { value } => write!(
                f,
                "ADVISOR_RECOMMENDATION_LIMIT must be a positive integer (got '{}')",
                value
            ),
            ConfigError::InvalidFlag { variable, value } => {
                write!(f, "{} must be true or false (got '{}')", variable, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("ADVISOR_RECOMMENDATION_LIMIT");
        env::remove_var("ADVISOR_RANK_BY_IMPACT");
        env::remove_var("ADVISOR_COHORT_INCLUDES_SUBJECT");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.engine, EngineConfig::default());
        assert_eq!(config.engine.to_settings(), AnalysisSettings::default());
    }

    #[test]
    fn engine_overrides_are_read_from_env() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "prod");
        env::set_var("ADVISOR_RECOMMENDATION_LIMIT", "3");
        env::set_var("ADVISOR_RANK_BY_IMPACT", "yes");
        env::set_var("ADVISOR_COHORT_INCLUDES_SUBJECT", "false");

        let config = AppConfig::load().expect("config loads");
        reset_env();

        assert_eq!(config.environment, AppEnvironment::Production);
        assert_eq!(config.engine.recommendation_limit, 3);
        assert!(config.engine.rank_by_impact);
        assert_eq!(
            config.engine.cohort_membership,
            CohortMembership::ExcludeSubject
        );
    }

    #[test]
    fn zero_limit_is_rejected() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("ADVISOR_RECOMMENDATION_LIMIT", "0");

        let result = AppConfig::load();
        reset_env();

        match result {
            Err(ConfigError::InvalidRecommendationLimit { value }) => assert_eq!(value, "0"),
            other => panic!("expected invalid limit, got {other:?}"),
        }
    }

    #[test]
    fn unparseable_flag_names_the_variable() {
        let err = parse_flag("ADVISOR_RANK_BY_IMPACT", "maybe").expect_err("not a flag");
        assert!(err.to_string().starts_with("ADVISOR_RANK_BY_IMPACT"));
    }
}
