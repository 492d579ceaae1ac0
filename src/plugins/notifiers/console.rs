use crate::models::StockAlert;
use crate::plugins::traits::{NotificationResult, NotifierPlugin};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Prints alerts to stdout. Always succeeds.
#[derive(Debug, Default, Clone)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    pub fn new() -> Self {
        ConsoleNotifier
    }

    pub fn format_alert(&self, alert: &StockAlert) -> String {
        format!("\n🚨 STOCK ALERT: {}\n   {}", alert.headline, alert.product_url)
    }
}

#[async_trait]
impl NotifierPlugin for ConsoleNotifier {
    fn name(&self) -> &str {
        "Console Notifier"
    }

    fn plugin_type(&self) -> &str {
        "console"
    }

    async fn notify(&self, alert: &StockAlert) -> Result<NotificationResult> {
        println!("{}", self.format_alert(alert));
        Ok(NotificationResult {
            channel: self.plugin_type().to_string(),
            message_id: None,
        })
    }
}
