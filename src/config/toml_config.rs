use crate::config::{DEFAULT_ATTRIBUTES_ENDPOINT, DEFAULT_OUTPUT_PATH, DEFAULT_STORES_ENDPOINT};
use crate::core::ConfigProvider;
use crate::domain::model::{RequestOptions, SelectionRule};
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

static ENV_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub pipeline: Option<PipelineConfig>,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub load: LoadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_stores_endpoint")]
    pub stores_endpoint: String,
    #[serde(default = "default_attributes_endpoint")]
    pub attributes_endpoint: String,
    pub timeout_seconds: Option<u64>,
    pub retry_attempts: Option<u32>,
    pub retry_delay_seconds: Option<u64>,
    pub headers: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterConfig {
    pub services_pattern: Option<String>,
    pub service_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    #[serde(default = "default_output_path")]
    pub output_path: String,
    #[serde(default)]
    pub pretty: bool,
}

fn default_stores_endpoint() -> String {
    DEFAULT_STORES_ENDPOINT.to_string()
}

fn default_attributes_endpoint() -> String {
    DEFAULT_ATTRIBUTES_ENDPOINT.to_string()
}

fn default_output_path() -> String {
    DEFAULT_OUTPUT_PATH.to_string()
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            stores_endpoint: default_stores_endpoint(),
            attributes_endpoint: default_attributes_endpoint(),
            timeout_seconds: None,
            retry_attempts: None,
            retry_delay_seconds: None,
            headers: None,
        }
    }
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            pretty: false,
        }
    }
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` placeholders from the environment; unset variables are left as is.
    fn substitute_env_vars(content: &str) -> String {
        ENV_PLACEHOLDER
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn name(&self) -> &str {
        self.pipeline
            .as_ref()
            .map(|p| p.name.as_str())
            .unwrap_or("store-locator")
    }
}

impl ConfigProvider for TomlConfig {
    fn stores_endpoint(&self) -> &str {
        &self.source.stores_endpoint
    }

    fn attributes_endpoint(&self) -> &str {
        &self.source.attributes_endpoint
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn request_options(&self) -> RequestOptions {
        let defaults = RequestOptions::default();

        let mut headers: Vec<(String, String)> = self
            .source
            .headers
            .iter()
            .flatten()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        headers.sort();

        RequestOptions {
            timeout: self
                .source
                .timeout_seconds
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            retry_attempts: self.source.retry_attempts.unwrap_or(defaults.retry_attempts),
            retry_delay: self
                .source
                .retry_delay_seconds
                .map(Duration::from_secs)
                .unwrap_or(defaults.retry_delay),
            headers,
        }
    }

    fn selection_rule(&self) -> Option<SelectionRule> {
        match (&self.filter.services_pattern, &self.filter.service_code) {
            (_, Some(code)) => Some(SelectionRule::ServiceCode(code.clone())),
            (Some(pattern), None) => Some(SelectionRule::Pattern(pattern.clone())),
            (None, None) => None,
        }
    }

    fn pretty_output(&self) -> bool {
        self.load.pretty
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("source.stores_endpoint", &self.source.stores_endpoint)?;
        validation::validate_url("source.attributes_endpoint", &self.source.attributes_endpoint)?;
        validation::validate_path("load.output_path", &self.load.output_path)?;
        if let Some(timeout) = self.source.timeout_seconds {
            validation::validate_positive_number("source.timeout_seconds", timeout, 1)?;
        }
        validation::validate_selection(
            self.filter.services_pattern.as_deref(),
            self.filter.service_code.as_deref(),
        )
    }
}
