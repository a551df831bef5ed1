// ═══════════════════════════════════════════════════════════════════
// Model Tests — StockEvent, ForecastResponse, ReferenceKind, Settings,
// ForecastCache
// ═══════════════════════════════════════════════════════════════════

use chrono::NaiveDate;
use std::collections::HashMap;

use stock_forecasting_core::errors::CoreError;
use stock_forecasting_core::models::cache::{ForecastCache, QueryKey};
use stock_forecasting_core::models::event::StockEvent;
use stock_forecasting_core::models::forecast::ForecastResponse;
use stock_forecasting_core::models::reference::ReferenceKind;
use stock_forecasting_core::models::settings::Settings;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

// ── StockEvent ──────────────────────────────────────────────────────

mod stock_event {
    use super::*;

    #[test]
    fn deserializes_wire_format() {
        let json = r#"{
            "date": "2025-07-01",
            "quantity": -12.5,
            "label": "SO-0042",
            "model_type": "salesorder",
            "model_id": 42,
            "title": "Customer order",
            "part": 7
        }"#;
        let event: StockEvent = serde_json::from_str(json).unwrap();

        assert_eq!(event.date, Some(d(2025, 7, 1)));
        assert_eq!(event.quantity_delta, -12.5);
        assert_eq!(event.reference_label, "SO-0042");
        assert_eq!(event.reference_model_type, Some(ReferenceKind::SalesOrder));
        assert_eq!(event.reference_model_id, Some(42));
        assert_eq!(event.title, "Customer order");
        assert_eq!(event.part, Some(7));
    }

    #[test]
    fn quantity_accepts_decimal_string() {
        let event: StockEvent =
            serde_json::from_str(r#"{"date": null, "quantity": "15.00000", "label": "PO-1"}"#).unwrap();
        assert_eq!(event.quantity_delta, 15.0);
        assert_eq!(event.date, None);
    }

    #[test]
    fn quantity_null_or_garbage_is_zero() {
        let a: StockEvent = serde_json::from_str(r#"{"quantity": null}"#).unwrap();
        let b: StockEvent = serde_json::from_str(r#"{"quantity": "n/a"}"#).unwrap();
        assert_eq!(a.quantity_delta, 0.0);
        assert_eq!(b.quantity_delta, 0.0);
    }

    #[test]
    fn missing_fields_default() {
        let event: StockEvent = serde_json::from_str("{}").unwrap();
        assert_eq!(event.date, None);
        assert_eq!(event.quantity_delta, 0.0);
        assert_eq!(event.reference_label, "");
        assert_eq!(event.reference_model_type, None);
        assert_eq!(event.title, "");
    }

    #[test]
    fn unknown_model_type_is_kept_verbatim() {
        let event: StockEvent =
            serde_json::from_str(r#"{"model_type": "transferorder", "model_id": 3}"#).unwrap();
        assert_eq!(
            event.reference_model_type,
            Some(ReferenceKind::Other("transferorder".into()))
        );
        assert_eq!(event.detail_url(), None);
    }

    #[test]
    fn serializes_with_wire_names() {
        let event = StockEvent::new(Some(d(2025, 1, 2)), 3.0, "BO-9")
            .with_reference(ReferenceKind::Build, 9);
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["quantity"], 3.0);
        assert_eq!(value["label"], "BO-9");
        assert_eq!(value["model_type"], "build");
        assert_eq!(value["model_id"], 9);
        assert_eq!(value["date"], "2025-01-02");
    }

    #[test]
    fn retrospective_classification() {
        let today = d(2025, 5, 5);
        assert!(StockEvent::new(None, 1.0, "").is_retrospective(today));
        assert!(StockEvent::new(Some(d(2025, 5, 4)), 1.0, "").is_retrospective(today));
        assert!(!StockEvent::new(Some(today), 1.0, "").is_retrospective(today));
        assert!(!StockEvent::new(Some(d(2025, 5, 6)), 1.0, "").is_retrospective(today));
    }

    #[test]
    fn detail_url_needs_kind_and_id() {
        let mut event = StockEvent::new(None, 1.0, "PO-5");
        assert_eq!(event.detail_url(), None);

        event.reference_model_type = Some(ReferenceKind::PurchaseOrder);
        assert_eq!(event.detail_url(), None);

        event.reference_model_id = Some(5);
        assert_eq!(event.detail_url().as_deref(), Some("/web/purchasing/purchase-order/5/"));
    }
}

// ── ForecastResponse ────────────────────────────────────────────────

mod forecast_response {
    use super::*;

    #[test]
    fn empty_object_is_empty_forecast() {
        let resp: ForecastResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(resp, ForecastResponse::default());
        assert!(!resp.has_entries());
        assert_eq!(resp.in_stock, 0.0);
    }

    #[test]
    fn stock_figures_accept_strings_and_numbers() {
        let json = r#"{
            "part": 12,
            "in_stock": "140.000",
            "min_stock": 20,
            "max_stock": "0",
            "entries": [{"date": "2025-08-01", "quantity": 5, "label": "PO-1"}]
        }"#;
        let resp: ForecastResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.part, Some(12));
        assert_eq!(resp.in_stock, 140.0);
        assert_eq!(resp.min_stock, 20.0);
        assert_eq!(resp.max_stock, 0.0);
        assert_eq!(resp.entries.len(), 1);
        assert!(resp.has_entries());
    }
}

// ── ReferenceKind ───────────────────────────────────────────────────

mod reference_kind {
    use super::*;

    #[test]
    fn parses_known_names_case_insensitively() {
        assert_eq!(ReferenceKind::from("purchaseorder".to_string()), ReferenceKind::PurchaseOrder);
        assert_eq!(ReferenceKind::from("SalesOrder".to_string()), ReferenceKind::SalesOrder);
        assert_eq!(ReferenceKind::from("build".to_string()), ReferenceKind::Build);
        assert_eq!(ReferenceKind::from("stockitem".to_string()), ReferenceKind::StockItem);
    }

    #[test]
    fn every_known_kind_links() {
        let cases = [
            (ReferenceKind::Part, "/web/part/1/"),
            (ReferenceKind::StockItem, "/web/stock/item/1/"),
            (ReferenceKind::PurchaseOrder, "/web/purchasing/purchase-order/1/"),
            (ReferenceKind::SalesOrder, "/web/sales/sales-order/1/"),
            (ReferenceKind::ReturnOrder, "/web/sales/return-order/1/"),
            (ReferenceKind::Build, "/web/manufacturing/build-order/1/"),
        ];
        for (kind, url) in cases {
            assert_eq!(kind.detail_url(1).as_deref(), Some(url), "{kind}");
        }
    }

    #[test]
    fn unknown_kind_has_no_link_and_raw_label() {
        let kind = ReferenceKind::Other("widget".into());
        assert_eq!(kind.detail_url(1), None);
        assert_eq!(kind.label(), "widget");
        assert_eq!(kind.to_string(), "widget");
    }

    #[test]
    fn labels() {
        assert_eq!(ReferenceKind::ReturnOrder.label(), "Return Order");
        assert_eq!(ReferenceKind::Build.label(), "Build Order");
    }
}

// ── Settings ────────────────────────────────────────────────────────

mod settings {
    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let s = Settings::default();
        assert_eq!(s.base_url, "http://localhost:8000/api/");
        assert_eq!(s.api_token, None);
        assert_eq!(s.timeout_secs, 30);
        assert!(!s.include_variants);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn reads_all_variables() {
        let s = Settings::from_lookup(lookup(&[
            ("STOCK_FORECAST_BASE_URL", "https://inv.example.com/api"),
            ("STOCK_FORECAST_API_TOKEN", " abc123 "),
            ("STOCK_FORECAST_TIMEOUT_SECS", "5"),
            ("STOCK_FORECAST_INCLUDE_VARIANTS", "yes"),
        ]))
        .unwrap();

        assert_eq!(s.base_url, "https://inv.example.com/api");
        assert_eq!(s.api_token.as_deref(), Some("abc123"));
        assert_eq!(s.timeout_secs, 5);
        assert!(s.include_variants);
    }

    #[test]
    fn empty_token_is_none() {
        let s = Settings::from_lookup(lookup(&[("STOCK_FORECAST_API_TOKEN", "  ")])).unwrap();
        assert_eq!(s.api_token, None);
    }

    #[test]
    fn bad_timeout_is_rejected() {
        let err = Settings::from_lookup(lookup(&[("STOCK_FORECAST_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
        assert!(err.to_string().contains("soon"));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = Settings::from_lookup(lookup(&[("STOCK_FORECAST_TIMEOUT_SECS", "0")])).unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
    }

    #[test]
    fn bad_flag_is_rejected() {
        let err =
            Settings::from_lookup(lookup(&[("STOCK_FORECAST_INCLUDE_VARIANTS", "maybe")])).unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
    }

    #[test]
    fn non_http_base_url_is_rejected() {
        let err = Settings::from_lookup(lookup(&[("STOCK_FORECAST_BASE_URL", "ftp://x")])).unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
    }

    #[test]
    fn deserializes_with_defaults() {
        let s: Settings = serde_json::from_str(r#"{"base_url": "https://a.example/api/"}"#).unwrap();
        assert_eq!(s.timeout_secs, 30);
        assert!(!s.include_variants);
        assert_eq!(s.api_token, None);
    }
}

// ── ForecastCache ───────────────────────────────────────────────────

mod cache {
    use super::*;

    fn response(stock: f64) -> ForecastResponse {
        ForecastResponse {
            in_stock: stock,
            ..ForecastResponse::default()
        }
    }

    #[test]
    fn keys_distinguish_variant_flag() {
        let mut cache = ForecastCache::new();
        cache.insert(QueryKey::new(1, false), response(10.0));
        cache.insert(QueryKey::new(1, true), response(25.0));

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&QueryKey::new(1, false)).unwrap().in_stock, 10.0);
        assert_eq!(cache.get(&QueryKey::new(1, true)).unwrap().in_stock, 25.0);
        assert!(cache.get(&QueryKey::new(2, false)).is_none());
    }

    #[test]
    fn insert_replaces() {
        let mut cache = ForecastCache::new();
        let key = QueryKey::new(4, false);
        cache.insert(key, response(1.0));
        cache.insert(key, response(2.0));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&key).unwrap().in_stock, 2.0);
    }

    #[test]
    fn clear_empties_every_key() {
        let mut cache = ForecastCache::new();
        cache.insert(QueryKey::new(1, false), response(1.0));
        cache.insert(QueryKey::new(1, true), response(1.0));
        cache.insert(QueryKey::new(2, false), response(1.0));

        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.get(&QueryKey::new(1, true)).is_none());
    }

    #[test]
    fn key_display() {
        assert_eq!(QueryKey::new(9, true).to_string(), "part=9 include_variants=true");
    }
}
