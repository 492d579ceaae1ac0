use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::StockAlert;
use crate::utils::error::Result;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationResult {
    /// `plugin_type` of the notifier that delivered the alert.
    pub channel: String,
    pub message_id: Option<String>,
}

/// Trait for implementing notification methods (email, console)
#[async_trait]
pub trait NotifierPlugin: Send + Sync {
    /// Plugin metadata
    fn name(&self) -> &str;
    fn plugin_type(&self) -> &str;

    /// Deliver a single alert. Errors are handled by the caller.
    async fn notify(&self, alert: &StockAlert) -> Result<NotificationResult>;
}
