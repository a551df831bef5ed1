use chrono::NaiveDate;

use crate::models::chart::{ChartSeries, ChartSpec, ReferenceLine};
use crate::models::event::StockEvent;
use crate::models::forecast::{AxisDomain, ForecastPoint, ForecastSeries};

/// Turns a part's scheduled stock movements into a forecast series.
///
/// The core computes all the numbers; the frontend only renders.
/// Each series contains:
/// - An anchor point for today, with the unconfirmed (undated or overdue)
///   movements widening the minimum/maximum envelope
/// - One point per movement dated today or later, in date order
/// - Axis bounds padded by a day on either side
#[derive(Debug, Clone, Default)]
pub struct ForecastService;

impl ForecastService {
    pub fn new() -> Self {
        Self
    }

    /// Aggregate using the local calendar day as the anchor.
    ///
    /// "Today" is read exactly once, so the whole run sees a single date.
    pub fn aggregate_now(
        &self,
        events: &[StockEvent],
        current_stock: f64,
        low_threshold: f64,
        high_threshold: f64,
    ) -> ForecastSeries {
        let today = chrono::Local::now().date_naive();
        self.aggregate(events, current_stock, low_threshold, high_threshold, today)
    }

    /// Build the forecast series anchored at `today`.
    ///
    /// 1. Undated and past-dated events only move the envelope: negative
    ///    quantities lower the minimum, positive ones raise the maximum.
    /// 2. The anchor reports `current_stock` unchanged.
    /// 3. Remaining events are walked in date order (stable for equal dates)
    ///    and shift all three trajectories by their quantity.
    ///
    /// Step 1 touches one bound per event; step 3 touches all three.
    pub fn aggregate(
        &self,
        events: &[StockEvent],
        current_stock: f64,
        low_threshold: f64,
        high_threshold: f64,
        today: NaiveDate,
    ) -> ForecastSeries {
        let mut min_stock = current_stock;
        let mut max_stock = current_stock;

        let mut prospective: Vec<(NaiveDate, &StockEvent)> = Vec::new();
        let mut retrospective = 0usize;

        for event in events {
            if event.is_retrospective(today) {
                retrospective += 1;
                if event.quantity_delta < 0.0 {
                    min_stock += event.quantity_delta;
                } else if event.quantity_delta > 0.0 {
                    max_stock += event.quantity_delta;
                }
            } else if let Some(date) = event.date {
                prospective.push((date, event));
            }
        }

        // Vec::sort_by_key is stable: same-day events keep their input order.
        prospective.sort_by_key(|(date, _)| *date);

        tracing::debug!(
            today = %today,
            retrospective,
            prospective = prospective.len(),
            "aggregating stock forecast"
        );

        let mut points = Vec::with_capacity(prospective.len() + 1);
        points.push(ForecastPoint {
            date: today,
            delta: 0.0,
            running_quantity: current_stock,
            running_minimum: min_stock,
            running_maximum: max_stock,
            low_threshold,
            high_threshold,
            label: String::new(),
            title: String::new(),
        });

        let mut stock = current_stock;
        for (date, event) in &prospective {
            stock += event.quantity_delta;
            min_stock += event.quantity_delta;
            max_stock += event.quantity_delta;

            points.push(ForecastPoint {
                date: *date,
                delta: event.quantity_delta,
                running_quantity: stock,
                running_minimum: min_stock,
                running_maximum: max_stock,
                low_threshold,
                high_threshold,
                label: event.reference_label.clone(),
                title: event.title.clone(),
            });
        }

        let domain = match (prospective.first(), prospective.last()) {
            (Some((first, _)), Some((last, _))) => AxisDomain::padded(*first, *last),
            _ => AxisDomain::padded(today, today),
        };

        ForecastSeries {
            today,
            points,
            domain,
        }
    }

    /// Lines and threshold markers for the forecast chart.
    ///
    /// The low-stock line is always drawn; the overstock line only when a
    /// positive threshold is configured.
    pub fn chart_spec(&self, low_threshold: f64, high_threshold: f64) -> ChartSpec {
        let series = vec![
            ChartSeries::new("minimum", "Minimum", "yellow.6"),
            ChartSeries::new("maximum", "Maximum", "teal.6"),
            ChartSeries::new("quantity", "Quantity", "blue.6"),
        ];

        let mut reference_lines = vec![ReferenceLine::new(low_threshold, "Minimum Stock", "red.6")];
        if high_threshold > 0.0 {
            reference_lines.push(ReferenceLine::new(high_threshold, "Maximum Stock", "red.3"));
        }

        ChartSpec {
            series,
            reference_lines,
        }
    }
}
