use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::forecast::ForecastResponse;
use crate::services::export_service::ExportFormat;

/// Where forecast data comes from.
///
/// The HTTP implementation talks to the stock-forecasting endpoint; tests
/// and embedders can substitute anything that produces a `ForecastResponse`.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait ForecastSource: Send + Sync {
    /// Human-readable name of this source (for logs/errors).
    fn name(&self) -> &str;

    /// Fetch scheduled stock movements for `part`, optionally including
    /// movements of its variant parts.
    async fn fetch_forecast(
        &self,
        part: u64,
        include_variants: bool,
    ) -> Result<ForecastResponse, CoreError>;

    /// Request an export of the same data as a file in `format`.
    /// Returns the raw file contents.
    async fn download_export(
        &self,
        part: u64,
        include_variants: bool,
        format: ExportFormat,
    ) -> Result<Vec<u8>, CoreError>;
}
