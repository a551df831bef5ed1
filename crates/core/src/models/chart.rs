use serde::{Deserialize, Serialize};

/// A line drawn from one `ForecastPoint` field.
///
/// The core decides what is plotted; the frontend just renders it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    /// Data key on the point ("minimum", "maximum", "quantity")
    pub name: String,

    /// Legend label
    pub label: String,

    /// Theme color token (e.g., "blue.6")
    pub color: String,
}

/// A horizontal threshold line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLine {
    pub y: f64,
    pub label: String,
    pub color: String,
}

/// Everything the chart widget needs besides the points themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub series: Vec<ChartSeries>,
    pub reference_lines: Vec<ReferenceLine>,
}

impl ChartSeries {
    pub fn new(name: &str, label: &str, color: &str) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            color: color.to_string(),
        }
    }
}

impl ReferenceLine {
    pub fn new(y: f64, label: &str, color: &str) -> Self {
        Self {
            y,
            label: label.to_string(),
            color: color.to_string(),
        }
    }
}
