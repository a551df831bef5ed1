use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::event::StockEvent;

/// Column the forecast table is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SortColumn {
    /// Chronological; undated rows sort first
    #[default]
    Date,
    /// Numeric quantity change
    Quantity,
    /// Reference label (lexicographic)
    Label,
    /// Model type name (lexicographic)
    ModelType,
    /// Description (lexicographic)
    Description,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Current sort state of the table. Defaults to date ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SortStatus {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl SortStatus {
    pub fn new(column: SortColumn, direction: SortDirection) -> Self {
        Self { column, direction }
    }
}

/// How a row's date relates to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RowStatus {
    /// No target date set (flagged)
    Undated,
    /// Target date already passed (flagged)
    Overdue,
    /// Today or later
    Scheduled,
}

impl RowStatus {
    pub fn is_flagged(self) -> bool {
        !matches!(self, RowStatus::Scheduled)
    }
}

/// A read-only view of one event, decorated for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastTableRow<'a> {
    pub event: &'a StockEvent,
    pub status: RowStatus,

    /// Date cell text ("No date specified" when undated)
    pub date_display: String,

    /// Signed quantity, "+" prefixed when positive
    pub quantity_display: String,

    /// Deep link to the referenced record, if its kind is known
    pub link: Option<String>,

    /// Human label of the referenced record's kind
    pub model_label: String,
}

/// Sorts and decorates raw events for the forecast table.
///
/// Never re-derives or mutates values; rows borrow the events they show.
#[derive(Debug, Clone, Default)]
pub struct TableService;

impl TableService {
    pub fn new() -> Self {
        Self
    }

    /// Build table rows in the requested order.
    pub fn rows<'a>(
        &self,
        events: &'a [StockEvent],
        sort: SortStatus,
        today: NaiveDate,
    ) -> Vec<ForecastTableRow<'a>> {
        let mut sorted: Vec<&StockEvent> = events.iter().collect();
        sort_events(&mut sorted, sort);

        sorted
            .into_iter()
            .map(|event| ForecastTableRow {
                event,
                status: row_status(event, today),
                date_display: event
                    .date
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "No date specified".to_string()),
                quantity_display: format_quantity_delta(event.quantity_delta),
                link: event.detail_url(),
                model_label: event
                    .reference_model_type
                    .as_ref()
                    .map(|k| k.label().to_string())
                    .unwrap_or_default(),
            })
            .collect()
    }
}

/// Stable in-place sort. Descending reverses the comparator, so ties keep
/// their original order in both directions.
pub fn sort_events(events: &mut [&StockEvent], sort: SortStatus) {
    events.sort_by(|a, b| {
        let ord = compare(a, b, sort.column);
        match sort.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
}

fn compare(a: &StockEvent, b: &StockEvent, column: SortColumn) -> Ordering {
    match column {
        // None < Some(_), matching "undated = epoch"
        SortColumn::Date => a.date.cmp(&b.date),
        SortColumn::Quantity => a.quantity_delta.total_cmp(&b.quantity_delta),
        SortColumn::Label => a.reference_label.cmp(&b.reference_label),
        SortColumn::ModelType => model_type_key(a).cmp(model_type_key(b)),
        SortColumn::Description => a.title.cmp(&b.title),
    }
}

fn model_type_key(event: &StockEvent) -> &str {
    event
        .reference_model_type
        .as_ref()
        .map(|k| k.as_str())
        .unwrap_or("")
}

fn row_status(event: &StockEvent, today: NaiveDate) -> RowStatus {
    match event.date {
        None => RowStatus::Undated,
        Some(d) if d < today => RowStatus::Overdue,
        Some(_) => RowStatus::Scheduled,
    }
}

/// Render a quantity change with an explicit "+" for incoming stock.
pub fn format_quantity_delta(value: f64) -> String {
    let body = format_decimal(Some(value));
    if value > 0.0 {
        format!("+{body}")
    } else {
        body
    }
}

/// Render a number with at most two fraction digits, trailing zeros trimmed.
/// Missing values render as "-".
pub fn format_decimal(value: Option<f64>) -> String {
    let Some(value) = value else {
        return "-".to_string();
    };
    if !value.is_finite() {
        return "-".to_string();
    }

    let mut text = format!("{value:.2}");
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }
    if text == "-0" {
        text = "0".to_string();
    }
    text
}
