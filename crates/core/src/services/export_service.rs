use std::str::FromStr;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Path of the forecast endpoint, relative to the API root.
pub const FORECAST_PATH: &str = "plugin/stock-forecasting/forecast/";

/// File formats the forecast endpoint can export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Xls,
    Xlsx,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Csv, ExportFormat::Xls, ExportFormat::Xlsx];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xls => "xls",
            ExportFormat::Xlsx => "xlsx",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "xls" => Ok(ExportFormat::Xls),
            "xlsx" => Ok(ExportFormat::Xlsx),
            other => Err(CoreError::ValidationError(format!(
                "Unsupported export format '{other}': expected csv, xls or xlsx"
            ))),
        }
    }
}

/// Builds forecast and export URLs.
///
/// Triggering the download is left to the caller (or to
/// `ForecastSource::download_export`); this only parameterizes the request.
#[derive(Debug, Clone, Default)]
pub struct ExportService;

impl ExportService {
    pub fn new() -> Self {
        Self
    }

    /// `<base>/plugin/stock-forecasting/forecast/?part=<id>&include_variants=<bool>`
    pub fn forecast_url(
        &self,
        base_url: &str,
        part: u64,
        include_variants: bool,
    ) -> Result<Url, CoreError> {
        let endpoint = endpoint_url(base_url)?;
        let part = part.to_string();
        let include = include_variants.to_string();
        Url::parse_with_params(
            endpoint.as_str(),
            &[("part", part.as_str()), ("include_variants", include.as_str())],
        )
        .map_err(|e| CoreError::Configuration(format!("Invalid forecast URL: {e}")))
    }

    /// Same as [`ExportService::forecast_url`] with `&export=<format>` appended.
    pub fn export_url(
        &self,
        base_url: &str,
        part: u64,
        include_variants: bool,
        format: ExportFormat,
    ) -> Result<Url, CoreError> {
        let mut url = self.forecast_url(base_url, part, include_variants)?;
        url.query_pairs_mut().append_pair("export", format.as_str());
        Ok(url)
    }
}

/// Join the forecast path onto the API root. The root is treated as a
/// directory whether or not it ends with a slash.
fn endpoint_url(base_url: &str) -> Result<Url, CoreError> {
    let trimmed = base_url.trim();
    let root = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };

    Url::parse(&root)
        .and_then(|root| root.join(FORECAST_PATH))
        .map_err(|e| CoreError::Configuration(format!("Invalid base URL '{base_url}': {e}")))
}
