use crate::core::client::DEFAULT_BOOKING_URL;
use crate::domain::model::{ReportFormat, RouteQuery, Traveler};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{CheckError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_range, validate_url, Validate};
use serde::{Deserialize, Serialize};

/// TOML configuration, the file-based alternative to CLI flags:
///
/// ```toml
/// endpoint = "https://www.nightjet.com/nj-booking-ocp"
/// output_path = "docs"
/// format = "html"
///
/// [[route]]
/// origin = "München"
/// destination = "Mailand"
/// date = "2025-10-18"
/// count = 6
///
/// [[traveler]]
/// gender = "female"
/// year_of_birth = 1983
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default)]
    pub output_path: Option<String>,

    #[serde(default = "default_format")]
    pub format: ReportFormat,

    #[serde(rename = "route", default)]
    pub routes: Vec<RouteQuery>,

    #[serde(rename = "traveler", default)]
    pub travelers: Vec<Traveler>,

    #[serde(default)]
    pub monitor: bool,
}

fn default_endpoint() -> String {
    DEFAULT_BOOKING_URL.to_string()
}

fn default_format() -> ReportFormat {
    ReportFormat::Html
}

impl FileConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file(path: &str) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::parse(&raw).map_err(|e| match e {
            CheckError::ConfigError { message } => CheckError::ConfigError {
                message: format!("{}: {}", path, message),
            },
            other => other,
        })
    }

    /// 從 TOML 字串解析配置
    pub fn parse(raw: &str) -> Result<Self> {
        let mut config: FileConfig = toml::from_str(raw).map_err(|e| CheckError::ConfigError {
            message: format!("Invalid TOML configuration: {}", e),
        })?;

        if config.travelers.is_empty() {
            config.travelers.push(Traveler::male(1980));
        }

        Ok(config)
    }
}

impl ConfigProvider for FileConfig {
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

impl Validate for FileConfig {
    fn validate(&self) -> Result<()> {
        // 驗證 API 端點
        validate_url("endpoint", &self.endpoint)?;
        if self.routes.is_empty() {
            return Err(CheckError::MissingConfigError {
                field: "route".to_string(),
            });
        }
        for route in &self.routes {
            validate_non_empty_string("origin", &route.origin)?;
            validate_non_empty_string("destination", &route.destination)?;
            validate_range("count", route.count, 1, 50)?;
        }
        for traveler in &self.travelers {
            validate_range("year_of_birth", traveler.year_of_birth, 1900, 2100)?;
        }
        Ok(())
    }
}
