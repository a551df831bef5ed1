use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::chart::ChartSpec;
use super::event::{lenient_f64, StockEvent};

/// One row of the forecast series.
///
/// The core generates these; the frontend plots the `quantity`, `minimum`
/// and `maximum` keys against `date` and draws the thresholds as reference
/// lines. Those keys are the data keys named by [`ChartSpec`] series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,

    /// Quantity change that produced this point (0 for the anchor)
    pub delta: f64,

    /// Projected stock level if every movement happens as scheduled
    #[serde(rename = "quantity")]
    pub running_quantity: f64,

    /// Pessimistic trajectory
    #[serde(rename = "minimum")]
    pub running_minimum: f64,

    /// Optimistic trajectory
    #[serde(rename = "maximum")]
    pub running_maximum: f64,

    pub low_threshold: f64,
    pub high_threshold: f64,

    /// Reference label of the originating event (empty for the anchor)
    #[serde(default)]
    pub label: String,

    /// Description of the originating event (empty for the anchor)
    #[serde(default)]
    pub title: String,
}

/// Horizontal axis bounds for the forecast chart (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisDomain {
    pub min: NaiveDate,
    pub max: NaiveDate,
}

impl AxisDomain {
    /// Pad `[first, last]` by one day on either side.
    pub fn padded(first: NaiveDate, last: NaiveDate) -> Self {
        Self {
            min: first.checked_sub_days(Days::new(1)).unwrap_or(first),
            max: last.checked_add_days(Days::new(1)).unwrap_or(last),
        }
    }
}

/// The full output of one aggregation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSeries {
    /// The day the aggregation was anchored to
    pub today: NaiveDate,

    /// Anchor first, then one point per prospective event in date order
    pub points: Vec<ForecastPoint>,

    pub domain: AxisDomain,
}

impl ForecastSeries {
    /// The synthetic "now" point. Present on every aggregated series;
    /// `None` only for a hand-built or deserialized series without points.
    pub fn anchor(&self) -> Option<&ForecastPoint> {
        self.points.first()
    }

    /// Points produced by dated events, excluding the anchor.
    pub fn scheduled(&self) -> &[ForecastPoint] {
        self.points.get(1..).unwrap_or(&[])
    }

    /// A series with only the anchor carries no forecast worth charting.
    pub fn is_sufficient(&self) -> bool {
        self.points.len() > 1
    }
}

/// Body returned by the forecast endpoint.
///
/// Every field defaults, so an empty object (or a failed request mapped to
/// one) yields an empty forecast with zero stock.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub part: Option<u64>,

    /// Current on-hand quantity
    #[serde(default, deserialize_with = "lenient_f64")]
    pub in_stock: f64,

    /// Low-stock threshold (0 when not configured)
    #[serde(default, deserialize_with = "lenient_f64")]
    pub min_stock: f64,

    /// Overstock threshold (0 when not configured)
    #[serde(default, deserialize_with = "lenient_f64")]
    pub max_stock: f64,

    #[serde(default)]
    pub entries: Vec<StockEvent>,
}

impl ForecastResponse {
    pub fn has_entries(&self) -> bool {
        !self.entries.is_empty()
    }
}

/// What the panel should show for the current query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ForecastStatus {
    /// A request for the current parameters is in flight
    Loading,
    /// The request itself failed (network or HTTP error)
    Failed(String),
    /// The server answered but reported no movements
    NoData,
    /// Movements exist but none are dated today or later
    Insufficient,
    /// The series is worth charting
    Ready,
}

impl ForecastStatus {
    pub fn is_chartable(&self) -> bool {
        matches!(self, ForecastStatus::Ready)
    }
}

/// Everything derived from one response, ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastReport {
    pub part: u64,
    pub include_variants: bool,
    pub status: ForecastStatus,
    pub series: ForecastSeries,
    pub chart: ChartSpec,
}
