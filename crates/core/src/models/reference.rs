use serde::{Deserialize, Serialize};

/// The kind of record a stock movement was derived from.
///
/// Determines how a table row links back to its source. Any model type the
/// server sends that is not listed here is kept verbatim in `Other` and
/// rendered as plain text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReferenceKind {
    /// A part (e.g., a variant the movement belongs to)
    Part,
    /// A stock item
    StockItem,
    /// Incoming stock from a purchase order
    PurchaseOrder,
    /// Outgoing stock for a sales order
    SalesOrder,
    /// Incoming stock from a customer return
    ReturnOrder,
    /// Build order output or allocation
    Build,
    /// Unknown model type, no deep link
    Other(String),
}

impl ReferenceKind {
    /// Wire name used by the forecast endpoint.
    pub fn as_str(&self) -> &str {
        match self {
            ReferenceKind::Part => "part",
            ReferenceKind::StockItem => "stockitem",
            ReferenceKind::PurchaseOrder => "purchaseorder",
            ReferenceKind::SalesOrder => "salesorder",
            ReferenceKind::ReturnOrder => "returnorder",
            ReferenceKind::Build => "build",
            ReferenceKind::Other(name) => name,
        }
    }

    /// Human-readable label for the "Model Type" column.
    pub fn label(&self) -> &str {
        match self {
            ReferenceKind::Part => "Part",
            ReferenceKind::StockItem => "Stock Item",
            ReferenceKind::PurchaseOrder => "Purchase Order",
            ReferenceKind::SalesOrder => "Sales Order",
            ReferenceKind::ReturnOrder => "Return Order",
            ReferenceKind::Build => "Build Order",
            ReferenceKind::Other(name) => name,
        }
    }

    /// Relative web path to the detail page of record `id`.
    ///
    /// Returns `None` for unknown kinds.
    pub fn detail_url(&self, id: u64) -> Option<String> {
        let prefix = match self {
            ReferenceKind::Part => "part",
            ReferenceKind::StockItem => "stock/item",
            ReferenceKind::PurchaseOrder => "purchasing/purchase-order",
            ReferenceKind::SalesOrder => "sales/sales-order",
            ReferenceKind::ReturnOrder => "sales/return-order",
            ReferenceKind::Build => "manufacturing/build-order",
            ReferenceKind::Other(_) => return None,
        };
        Some(format!("/web/{prefix}/{id}/"))
    }
}

impl From<String> for ReferenceKind {
    fn from(value: String) -> Self {
        match value.to_lowercase().as_str() {
            "part" => ReferenceKind::Part,
            "stockitem" => ReferenceKind::StockItem,
            "purchaseorder" => ReferenceKind::PurchaseOrder,
            "salesorder" => ReferenceKind::SalesOrder,
            "returnorder" => ReferenceKind::ReturnOrder,
            "build" => ReferenceKind::Build,
            _ => ReferenceKind::Other(value),
        }
    }
}

impl From<ReferenceKind> for String {
    fn from(kind: ReferenceKind) -> Self {
        kind.as_str().to_string()
    }
}

impl std::fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
