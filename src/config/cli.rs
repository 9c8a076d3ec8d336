use crate::core::client::DEFAULT_BOOKING_URL;
use crate::domain::model::{ReportFormat, RouteQuery, Traveler};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_range, validate_url, Validate};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "njcheck")]
#[command(about = "Checks Nightjet offers for routes and dates and renders a report")]
pub struct CliConfig {
    /// Route queries, e.g. "München|Mailand|2025-10-18|6"
    #[arg(value_name = "ORIGIN|DESTINATION|DATE[|COUNT]", required_unless_present = "config")]
    pub routes: Vec<RouteQuery>,

    #[arg(long, default_value = DEFAULT_BOOKING_URL)]
    pub endpoint: String,

    /// Write the report under this directory instead of stdout
    #[arg(long)]
    pub output_path: Option<String>,

    #[arg(long, value_enum, default_value_t = ReportFormat::Html)]
    pub format: ReportFormat,

    /// Travelers priced into the offers, e.g. --traveler female:1983
    #[arg(long = "traveler", value_name = "GENDER:YEAR", default_value = "male:1980")]
    pub travelers: Vec<Traveler>,

    /// Read the configuration from a TOML file instead of flags
    #[arg(long, value_name = "FILE")]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log process cpu/memory statistics")]
    pub monitor: bool,
}

impl ConfigProvider for CliConfig {
    fn api_endpoint(&self) -> &str {
        &self.endpoint
    }

    fn output_path(&self) -> Option<&str> {
        self.output_path.as_deref()
    }

    fn routes(&self) -> &[RouteQuery] {
        &self.routes
    }

    fn travelers(&self) -> &[Traveler] {
        &self.travelers
    }

    fn format(&self) -> ReportFormat {
        self.format
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("endpoint", &self.endpoint)?;
        for route in &self.routes {
            validate_range("count", route.count, 1, 50)?;
        }
        for traveler in &self.travelers {
            validate_range("year_of_birth", traveler.year_of_birth, 1900, 2100)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Gender;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_routes_and_defaults() {
        let config = CliConfig::parse_from([
            "njcheck",
            "München|Mailand|2025-10-18|6",
            "Mailand|München|2025-10-27",
        ]);

        assert_eq!(config.routes.len(), 2);
        assert_eq!(config.routes[0].count, 6);
        assert_eq!(
            config.routes[1].date,
            NaiveDate::from_ymd_opt(2025, 10, 27).unwrap()
        );
        assert_eq!(config.endpoint, DEFAULT_BOOKING_URL);
        assert_eq!(config.format, ReportFormat::Html);
        assert_eq!(config.travelers, vec![Traveler::male(1980)]);
        assert!(config.output_path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_travelers_and_format() {
        let config = CliConfig::parse_from([
            "njcheck",
            "--traveler",
            "female:1983",
            "--traveler",
            "male:2011",
            "--format",
            "text",
            "--output-path",
            "docs",
            "Wien|Hamburg|2025-11-02",
        ]);

        assert_eq!(config.travelers.len(), 2);
        assert_eq!(config.travelers[0].gender, Gender::Female);
        assert_eq!(config.travelers[1].year_of_birth, 2011);
        assert_eq!(config.format, ReportFormat::Text);
        assert_eq!(config.output_path.as_deref(), Some("docs"));
    }

    #[test]
    fn test_malformed_route_is_rejected() {
        let result = CliConfig::try_parse_from(["njcheck", "Wien|Hamburg"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_routes_optional_with_config_file() {
        let config = CliConfig::parse_from(["njcheck", "--config", "check.toml"]);
        assert!(config.routes.is_empty());
        assert_eq!(config.config.as_deref(), Some("check.toml"));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = CliConfig::parse_from(["njcheck", "Wien|Hamburg|2025-11-02|0"]);
        assert!(config.validate().is_err());

        config = CliConfig::parse_from(["njcheck", "--endpoint", "not-a-url", "Wien|Hamburg|2025-11-02"]);
        assert!(config.validate().is_err());

        config = CliConfig::parse_from(["njcheck", "--traveler", "male:180", "Wien|Hamburg|2025-11-02"]);
        assert!(config.validate().is_err());
    }
}
