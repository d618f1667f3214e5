use crate::config::{DEFAULT_ATTRIBUTES_ENDPOINT, DEFAULT_OUTPUT_PATH, DEFAULT_STORES_ENDPOINT};
use crate::core::ConfigProvider;
use crate::domain::model::{RequestOptions, SelectionRule};
use crate::utils::error::Result;
use crate::utils::logger::LogFormat;
use crate::utils::validation::{self, Validate};
use clap::Parser;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "store-locator-etl")]
#[command(about = "Exports SC stores from the store locator with decoded attributes")]
pub struct CliConfig {
    #[arg(long, default_value = DEFAULT_STORES_ENDPOINT)]
    pub stores_endpoint: String,

    #[arg(long, default_value = DEFAULT_ATTRIBUTES_ENDPOINT)]
    pub attributes_endpoint: String,

    #[arg(long, default_value = DEFAULT_OUTPUT_PATH)]
    pub output_path: String,

    /// Extra request header, KEY=VALUE (repeatable)
    #[arg(long = "header", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    #[arg(long, default_value_t = 30)]
    pub timeout_seconds: u64,

    #[arg(long, default_value_t = 2)]
    pub retry_attempts: u32,

    #[arg(long, default_value_t = 1)]
    pub retry_delay_seconds: u64,

    /// Regular expression over the raw services bits (replaces the SC pattern)
    #[arg(long, conflicts_with = "service_code")]
    pub services_pattern: Option<String>,

    /// Keep stores that have this services dictionary code set
    #[arg(long)]
    pub service_code: Option<String>,

    #[arg(long, help = "Pretty-print the output JSON")]
    pub pretty: bool,

    #[arg(long, help = "Fetch and decode without writing the output file")]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

fn parse_header(raw: &str) -> std::result::Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("header name is empty in '{}'", raw));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

impl ConfigProvider for CliConfig {
    fn stores_endpoint(&self) -> &str {
        &self.stores_endpoint
    }

    fn attributes_endpoint(&self) -> &str {
        &self.attributes_endpoint
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn request_options(&self) -> RequestOptions {
        RequestOptions {
            timeout: Duration::from_secs(self.timeout_seconds),
            retry_attempts: self.retry_attempts,
            retry_delay: Duration::from_secs(self.retry_delay_seconds),
            headers: self.headers.clone(),
        }
    }

    fn selection_rule(&self) -> Option<SelectionRule> {
        match (&self.services_pattern, &self.service_code) {
            (_, Some(code)) => Some(SelectionRule::ServiceCode(code.clone())),
            (Some(pattern), None) => Some(SelectionRule::Pattern(pattern.clone())),
            (None, None) => None,
        }
    }

    fn pretty_output(&self) -> bool {
        self.pretty
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("stores_endpoint", &self.stores_endpoint)?;
        validation::validate_url("attributes_endpoint", &self.attributes_endpoint)?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_positive_number("timeout_seconds", self.timeout_seconds, 1)?;
        validation::validate_selection(
            self.services_pattern.as_deref(),
            self.service_code.as_deref(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CliConfig::parse_from(["store-locator-etl"]);

        assert_eq!(config.stores_endpoint, DEFAULT_STORES_ENDPOINT);
        assert_eq!(config.output_path, DEFAULT_OUTPUT_PATH);
        assert_eq!(config.selection_rule(), None);
        assert_eq!(config.request_options(), RequestOptions::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_headers_and_service_code() {
        let config = CliConfig::parse_from([
            "store-locator-etl",
            "--header",
            "Referer=https://example.com/map",
            "--header",
            "X-Trace = 1",
            "--service-code",
            "sc",
        ]);

        assert_eq!(
            config.request_options().headers,
            vec![
                ("Referer".to_string(), "https://example.com/map".to_string()),
                ("X-Trace".to_string(), "1".to_string()),
            ]
        );
        assert_eq!(
            config.selection_rule(),
            Some(SelectionRule::ServiceCode("sc".to_string()))
        );
    }

    #[test]
    fn test_pattern_conflicts_with_service_code() {
        let result = CliConfig::try_parse_from([
            "store-locator-etl",
            "--services-pattern",
            "1",
            "--service-code",
            "sc",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_malformed_header_rejected() {
        assert!(CliConfig::try_parse_from(["store-locator-etl", "--header", "novalue"]).is_err());
    }

    #[test]
    fn test_validation_rejects_zero_timeout() {
        let config = CliConfig::parse_from(["store-locator-etl", "--timeout-seconds", "0"]);
        assert!(config.validate().is_err());
    }
}
