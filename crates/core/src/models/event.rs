use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use super::reference::ReferenceKind;

/// A single scheduled stock movement for a part.
///
/// Events come straight from the forecast endpoint and are never modified
/// by the core. Positive quantities are incoming stock (purchase orders,
/// build outputs), negative quantities are outgoing (sales orders, build
/// allocations).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockEvent {
    /// Scheduled date. `None` means the movement has no target date.
    #[serde(default)]
    pub date: Option<NaiveDate>,

    /// Signed quantity change
    #[serde(rename = "quantity", default, deserialize_with = "lenient_f64")]
    pub quantity_delta: f64,

    /// Reference of the source record (e.g., "PO-0042")
    #[serde(rename = "label", default)]
    pub reference_label: String,

    /// Kind of the source record, used to build a deep link
    #[serde(rename = "model_type", default)]
    pub reference_model_type: Option<ReferenceKind>,

    /// Primary key of the source record
    #[serde(rename = "model_id", default)]
    pub reference_model_id: Option<u64>,

    /// Free-text description of the movement
    #[serde(default)]
    pub title: String,

    /// The variant part this movement belongs to, when variants are included
    #[serde(default)]
    pub part: Option<u64>,
}

impl StockEvent {
    pub fn new(date: Option<NaiveDate>, quantity_delta: f64, reference_label: impl Into<String>) -> Self {
        Self {
            date,
            quantity_delta,
            reference_label: reference_label.into(),
            reference_model_type: None,
            reference_model_id: None,
            title: String::new(),
            part: None,
        }
    }

    /// Attach the source record this movement was derived from.
    pub fn with_reference(mut self, kind: ReferenceKind, id: u64) -> Self {
        self.reference_model_type = Some(kind);
        self.reference_model_id = Some(id);
        self
    }

    /// Attach a description.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Returns `true` if the event has no date or is dated before `today`.
    ///
    /// Such events may already have happened without being confirmed.
    pub fn is_retrospective(&self, today: NaiveDate) -> bool {
        self.date.map_or(true, |d| d < today)
    }

    /// Deep link to the referenced record, if the reference kind is known.
    pub fn detail_url(&self) -> Option<String> {
        let kind = self.reference_model_type.as_ref()?;
        let id = self.reference_model_id?;
        kind.detail_url(id)
    }
}

/// Accepts either a JSON number or a decimal string ("12.50000").
///
/// The forecast endpoint serializes decimal fields as strings; a null or
/// unparseable value is treated as zero.
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(f64),
        Text(String),
        Null(()),
    }

    Ok(match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(n) => n,
        NumberOrText::Text(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        NumberOrText::Null(()) => 0.0,
    })
}
