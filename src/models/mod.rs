use serde::{Deserialize, Serialize};

pub mod alert;
pub mod verdict;

// Re-exports for convenience
pub use alert::*;
pub use verdict::*;

/// Result of one fetch-and-classify pass over the product page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum CheckOutcome {
    Determined { verdict: StockVerdict, status: u16 },
    Failed { error: String },
}

impl CheckOutcome {
    pub fn is_in_stock(&self) -> bool {
        matches!(self, CheckOutcome::Determined { verdict, .. } if verdict.in_stock)
    }

    pub fn verdict(&self) -> Option<&StockVerdict> {
        match self {
            CheckOutcome::Determined { verdict, .. } => Some(verdict),
            CheckOutcome::Failed { .. } => None,
        }
    }
}
