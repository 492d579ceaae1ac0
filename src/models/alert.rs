use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::StockReason;

pub const ALERT_SUBJECT: &str = "Pokémon Center Stock Alert!";

/// The message delivered once stock is detected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockAlert {
    pub product_name: String,
    pub product_url: String,
    pub headline: String,
    pub reason: StockReason,
    pub detected_at: DateTime<Utc>,
}

impl StockAlert {
    pub fn new(product_name: &str, product_url: &str, reason: StockReason) -> Self {
        Self {
            product_name: product_name.to_string(),
            product_url: product_url.to_string(),
            headline: format!("🎉 {} is BACK IN STOCK!", product_name),
            reason,
            detected_at: Utc::now(),
        }
    }

    pub fn subject(&self) -> &str {
        ALERT_SUBJECT
    }

    pub fn text_body(&self) -> String {
        let mut text = String::new();

        text.push_str("Good news! The product you're monitoring is now available:\n\n");
        text.push_str(&format!("{}\n\n", self.headline));
        text.push_str(&format!("Product URL: {}\n", self.product_url));
        text.push_str(&format!(
            "Detected at: {}\n\n",
            self.detected_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        text.push_str("Hurry and grab it before it sells out again!\n");

        text
    }
}
