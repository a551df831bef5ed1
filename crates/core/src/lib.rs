pub mod errors;
pub mod logging;
pub mod models;
pub mod providers;
pub mod services;

use chrono::NaiveDate;
use models::{
    cache::{ForecastCache, QueryKey},
    forecast::{ForecastReport, ForecastResponse, ForecastSeries, ForecastStatus},
    settings::Settings,
};
use providers::{inventree::InvenTreeForecastSource, traits::ForecastSource};
use reqwest::Url;
use services::{
    export_service::{ExportFormat, ExportService},
    forecast_service::ForecastService,
    table_service::{ForecastTableRow, SortStatus, TableService},
};

use errors::CoreError;

/// Main entry point for the stock-forecasting core library.
/// Holds the forecast panel state for one part and all services needed to
/// render it.
///
/// Every input change (new response, variant toggle) is followed by a fresh
/// aggregation; no derived state survives between reports.
#[must_use]
pub struct StockForecaster {
    part: u64,
    include_variants: bool,
    base_url: String,
    source: Box<dyn ForecastSource>,
    cache: ForecastCache,
    forecast_service: ForecastService,
    table_service: TableService,
    export_service: ExportService,
    /// Data for the current query key; empty until a fetch completes.
    current: ForecastResponse,
    /// Error from the last fetch for the current query key.
    error: Option<String>,
    /// Key of the request in flight, if any.
    pending: Option<QueryKey>,
    sort: SortStatus,
}

impl std::fmt::Debug for StockForecaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StockForecaster")
            .field("part", &self.part)
            .field("include_variants", &self.include_variants)
            .field("source", &self.source.name())
            .field("cached", &self.cache.len())
            .field("pending", &self.pending)
            .field("error", &self.error)
            .finish()
    }
}

impl StockForecaster {
    /// Create a forecaster for `part` that fetches from the server
    /// described by `settings`.
    pub fn new(part: u64, settings: &Settings) -> Result<Self, CoreError> {
        let source = InvenTreeForecastSource::new(settings)?;
        Ok(Self::with_source(part, settings, Box::new(source)))
    }

    /// Create a forecaster with a custom data source.
    pub fn with_source(part: u64, settings: &Settings, source: Box<dyn ForecastSource>) -> Self {
        Self {
            part,
            include_variants: settings.include_variants,
            base_url: settings.base_url.clone(),
            source,
            cache: ForecastCache::new(),
            forecast_service: ForecastService::new(),
            table_service: TableService::new(),
            export_service: ExportService::new(),
            current: ForecastResponse::default(),
            error: None,
            pending: None,
            sort: SortStatus::default(),
        }
    }

    // ── Query Parameters ────────────────────────────────────────────

    #[must_use]
    pub fn part(&self) -> u64 {
        self.part
    }

    #[must_use]
    pub fn include_variants(&self) -> bool {
        self.include_variants
    }

    /// The key the current data belongs to.
    #[must_use]
    pub fn query_key(&self) -> QueryKey {
        QueryKey::new(self.part, self.include_variants)
    }

    /// Toggle inclusion of variant parts.
    ///
    /// Previously fetched data for the new setting is shown straight from the
    /// cache; otherwise the forecaster is empty until the next fetch completes.
    pub fn set_include_variants(&mut self, include_variants: bool) {
        if self.include_variants == include_variants {
            return;
        }
        self.include_variants = include_variants;
        self.switch_key();
    }

    /// Point the forecaster at a different part.
    pub fn set_part(&mut self, part: u64) {
        if self.part == part {
            return;
        }
        self.part = part;
        self.switch_key();
    }

    // ── Fetching ────────────────────────────────────────────────────

    /// Fetch fresh data for the current parameters and report on it.
    ///
    /// Never fails: a request error is reported as `ForecastStatus::Failed`
    /// with an empty forecast.
    pub async fn refresh(&mut self) -> ForecastReport {
        let key = self.begin_fetch();
        let result = self
            .source
            .fetch_forecast(key.part, key.include_variants)
            .await;
        self.complete_fetch(key, result);
        self.report()
    }

    /// Mark a request for the current parameters as in flight.
    /// Returns the key its result must be completed with.
    pub fn begin_fetch(&mut self) -> QueryKey {
        let key = self.query_key();
        tracing::debug!(%key, source = self.source.name(), "fetching forecast");
        self.pending = Some(key);
        key
    }

    /// Deliver the result of a request started with [`begin_fetch`].
    ///
    /// Results for a key that no longer matches the current parameters are
    /// discarded and `false` is returned. Successful responses are cached.
    ///
    /// [`begin_fetch`]: StockForecaster::begin_fetch
    pub fn complete_fetch(
        &mut self,
        key: QueryKey,
        result: Result<ForecastResponse, CoreError>,
    ) -> bool {
        if key != self.query_key() {
            tracing::debug!(%key, current = %self.query_key(), "discarding stale forecast result");
            return false;
        }
        if self.pending == Some(key) {
            self.pending = None;
        }

        match result {
            Ok(response) => {
                self.cache.insert(key, response.clone());
                self.current = response;
                self.error = None;
            }
            Err(e) => {
                tracing::warn!(%key, error = %e, "forecast fetch failed");
                self.current = ForecastResponse::default();
                self.error = Some(e.to_string());
            }
        }
        true
    }

    /// Returns `true` while a request for the current parameters is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.pending == Some(self.query_key())
    }

    /// The response the forecaster is currently showing.
    /// Empty if nothing has arrived for the current parameters.
    #[must_use]
    pub fn response(&self) -> &ForecastResponse {
        &self.current
    }

    // ── Reporting ───────────────────────────────────────────────────

    /// Aggregate the current data, anchored at the local calendar day.
    #[must_use]
    pub fn report(&self) -> ForecastReport {
        self.report_at(chrono::Local::now().date_naive())
    }

    /// Aggregate the current data, anchored at `today`.
    #[must_use]
    pub fn report_at(&self, today: NaiveDate) -> ForecastReport {
        let response = self.response();
        let series = self.series_at(today);

        let status = if self.is_loading() {
            ForecastStatus::Loading
        } else if let Some(message) = &self.error {
            ForecastStatus::Failed(message.clone())
        } else if !response.has_entries() {
            ForecastStatus::NoData
        } else if !series.is_sufficient() {
            ForecastStatus::Insufficient
        } else {
            ForecastStatus::Ready
        };

        ForecastReport {
            part: self.part,
            include_variants: self.include_variants,
            status,
            series,
            chart: self
                .forecast_service
                .chart_spec(response.min_stock, response.max_stock),
        }
    }

    /// The forecast series for the current data, anchored at `today`.
    #[must_use]
    pub fn series_at(&self, today: NaiveDate) -> ForecastSeries {
        let response = self.response();
        self.forecast_service.aggregate(
            &response.entries,
            response.in_stock,
            response.min_stock,
            response.max_stock,
            today,
        )
    }

    // ── Table ───────────────────────────────────────────────────────

    #[must_use]
    pub fn sort_status(&self) -> SortStatus {
        self.sort
    }

    pub fn set_sort(&mut self, sort: SortStatus) {
        self.sort = sort;
    }

    /// Table rows for the current data in the current sort order.
    #[must_use]
    pub fn table_rows(&self, today: NaiveDate) -> Vec<ForecastTableRow<'_>> {
        self.table_service
            .rows(&self.response().entries, self.sort, today)
    }

    // ── Export ──────────────────────────────────────────────────────

    /// Download URL for the current data in `format`.
    pub fn export_url(&self, format: ExportFormat) -> Result<Url, CoreError> {
        self.export_service
            .export_url(&self.base_url, self.part, self.include_variants, format)
    }

    /// Fetch the exported file for the current parameters.
    pub async fn download_export(&self, format: ExportFormat) -> Result<Vec<u8>, CoreError> {
        self.source
            .download_export(self.part, self.include_variants, format)
            .await
    }

    // ── Cache Management ────────────────────────────────────────────

    /// Number of query keys with cached data.
    #[must_use]
    pub fn cached_queries(&self) -> usize {
        self.cache.len()
    }

    /// Forget all cached responses. The data currently shown is kept.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    // ── Internal ────────────────────────────────────────────────────

    fn switch_key(&mut self) {
        let key = self.query_key();
        let cached = self.cache.get(&key).cloned();
        tracing::debug!(%key, cached = cached.is_some(), "forecast parameters changed");
        self.current = cached.unwrap_or_default();
        self.error = None;
    }
}
