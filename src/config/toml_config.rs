use crate::core::schedule::FareSchedule;
use crate::core::ConfigProvider;
use crate::utils::error::{FareError, Result};
use crate::utils::validation::{
    validate_allowed_values, validate_non_empty_string, validate_path, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

pub const OUTPUT_FORMATS: [&str; 2] = ["csv", "json"];
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: [&str; 2] = ["compact", "json"];

/// Contents of a `taxi-fare.toml` file. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FareConfig {
    pub schedule: FareSchedule,
    pub batch: BatchConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub input_path: Option<String>,
    pub output_path: String,
    pub output_formats: Vec<String>,
    pub skip_invalid: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            input_path: None,
            output_path: "./output".to_string(),
            output_formats: vec!["csv".to_string(), "json".to_string()],
            skip_invalid: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub format: Option<String>,
}

impl FareConfig {
    /// Loads and parses a TOML file. Call `validate` before use.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(FareError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| FareError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the variable's value; unset variables are left as written.
    fn substitute_env_vars(content: &str) -> String {
        static PATTERN: OnceLock<Regex> = OnceLock::new();
        let re = PATTERN.get_or_init(|| {
            Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("env var pattern is valid")
        });

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.level.as_deref())
    }

    pub fn json_logs(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.format.as_deref())
            .is_some_and(|f| f == "json")
    }
}

impl Validate for FareConfig {
    fn validate(&self) -> Result<()> {
        self.schedule.validate()?;
        self.batch.validate()?;

        if let Some(logging) = &self.logging {
            if let Some(level) = &logging.level {
                validate_allowed_values("logging.level", std::slice::from_ref(level), &LOG_LEVELS)?;
            }
            if let Some(format) = &logging.format {
                validate_allowed_values(
                    "logging.format",
                    std::slice::from_ref(format),
                    &LOG_FORMATS,
                )?;
            }
        }

        Ok(())
    }
}

impl Validate for BatchConfig {
    fn validate(&self) -> Result<()> {
        if let Some(input) = &self.input_path {
            validate_non_empty_string("batch.input_path", input)?;
            validate_path("batch.input_path", input)?;
        }
        validate_path("batch.output_path", &self.output_path)?;

        if self.output_formats.is_empty() {
            return Err(FareError::InvalidConfigValueError {
                field: "batch.output_formats".to_string(),
                value: String::new(),
                reason: "At least one output format is required".to_string(),
            });
        }
        validate_allowed_values("batch.output_formats", &self.output_formats, &OUTPUT_FORMATS)
    }
}

impl ConfigProvider for BatchConfig {
    fn input_path(&self) -> &str {
        self.input_path.as_deref().unwrap_or_default()
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.output_formats
    }

    fn skip_invalid(&self) -> bool {
        self.skip_invalid
    }
}
