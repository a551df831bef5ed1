use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Response, Url};
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::forecast::ForecastResponse;
use crate::models::settings::Settings;
use crate::services::export_service::{ExportFormat, ExportService};
use super::traits::ForecastSource;

const SOURCE_NAME: &str = "InvenTree";

/// Longest server error message carried into `CoreError::Api`.
pub const MAX_ERROR_CHARS: usize = 200;

/// Forecast source backed by the InvenTree stock-forecasting plugin.
///
/// - **Endpoint**: `GET <api>/plugin/stock-forecasting/forecast/`
/// - **Auth**: `Authorization: Token <key>` when a token is configured
/// - **Export**: same endpoint with `export=csv|xls|xlsx`
pub struct InvenTreeForecastSource {
    client: Client,
    base_url: String,
    urls: ExportService,
}

impl InvenTreeForecastSource {
    pub fn new(settings: &Settings) -> Result<Self, CoreError> {
        settings.validate()?;

        let mut headers = HeaderMap::new();
        if let Some(token) = &settings.api_token {
            let mut value = HeaderValue::from_str(&format!("Token {token}"))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let builder = Client::builder().default_headers(headers);
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(settings.timeout_secs));

        Ok(Self {
            client: builder.build()?,
            base_url: settings.base_url.clone(),
            urls: ExportService::new(),
        })
    }

    async fn get(&self, url: Url) -> Result<Response, CoreError> {
        let endpoint = url.path().to_string();
        tracing::debug!(source = SOURCE_NAME, %endpoint, "sending forecast request");

        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            tracing::warn!(source = SOURCE_NAME, %endpoint, status = status.as_u16(), "forecast request rejected");
            return Err(CoreError::Api {
                endpoint,
                status: status.as_u16(),
                message: truncate(&message, MAX_ERROR_CHARS),
            });
        }
        Ok(resp)
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl ForecastSource for InvenTreeForecastSource {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    async fn fetch_forecast(
        &self,
        part: u64,
        include_variants: bool,
    ) -> Result<ForecastResponse, CoreError> {
        let url = self.urls.forecast_url(&self.base_url, part, include_variants)?;
        let body = self.get(url).await?.text().await?;
        let response = parse_forecast_body(part, &body)?;

        tracing::info!(
            source = SOURCE_NAME,
            part,
            include_variants,
            entries = response.entries.len(),
            "forecast fetched"
        );
        Ok(response)
    }

    async fn download_export(
        &self,
        part: u64,
        include_variants: bool,
        format: ExportFormat,
    ) -> Result<Vec<u8>, CoreError> {
        let url = self
            .urls
            .export_url(&self.base_url, part, include_variants, format)?;
        let bytes = self.get(url).await?.bytes().await?;

        tracing::info!(source = SOURCE_NAME, part, %format, size = bytes.len(), "forecast exported");
        Ok(bytes.to_vec())
    }
}

/// Decode a forecast endpoint body.
///
/// A blank body is an empty forecast, not a failure.
pub fn parse_forecast_body(part: u64, body: &str) -> Result<ForecastResponse, CoreError> {
    if body.trim().is_empty() {
        return Ok(ForecastResponse::default());
    }
    serde_json::from_str(body).map_err(|e| {
        CoreError::Deserialization(format!("Failed to parse forecast for part {part}: {e}"))
    })
}

/// Cut `text` to at most `max_chars` characters, marking the cut with `…`.
pub fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}
