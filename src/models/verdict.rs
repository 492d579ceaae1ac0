use serde::{Deserialize, Serialize};
use std::fmt;

/// Which heuristic produced a verdict.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StockReason {
    InStockPrimary,
    OutOfStockPrimary,
    InStockFallback,
    Unknown,
}

impl StockReason {
    pub fn in_stock(self) -> bool {
        matches!(self, StockReason::InStockPrimary | StockReason::InStockFallback)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StockReason::InStockPrimary => "in-stock-primary",
            StockReason::OutOfStockPrimary => "out-of-stock-primary",
            StockReason::InStockFallback => "in-stock-fallback",
            StockReason::Unknown => "unknown",
        }
    }

    /// Human-readable button status used in debug logs.
    pub fn status_line(self) -> &'static str {
        match self {
            StockReason::InStockPrimary => "IN STOCK - 'Add to Cart' button found",
            StockReason::OutOfStockPrimary => "OUT OF STOCK - 'Unavailable' button found",
            StockReason::InStockFallback => "IN STOCK - Fallback 'Add to Cart' button found",
            StockReason::Unknown => "UNKNOWN STATE - No recognizable button pattern found",
        }
    }
}

impl fmt::Display for StockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StockVerdict {
    pub in_stock: bool,
    pub reason: StockReason,
}

impl StockVerdict {
    pub fn from_reason(reason: StockReason) -> Self {
        Self {
            in_stock: reason.in_stock(),
            reason,
        }
    }

    pub fn unknown() -> Self {
        Self::from_reason(StockReason::Unknown)
    }
}
