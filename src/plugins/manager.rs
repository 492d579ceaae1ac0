use super::notifiers::{ConsoleNotifier, EmailNotifier};
use super::traits::{NotificationResult, NotifierPlugin};
use crate::config::NotificationsConfig;
use crate::models::StockAlert;

pub type NotifierPluginBox = Box<dyn NotifierPlugin>;

/// Ordered notifier chain. The first notifier to deliver wins; if every
/// registered notifier fails, or none is registered, the alert is printed to
/// the console.
pub struct PluginManager {
    notifiers: Vec<NotifierPluginBox>,
    fallback: ConsoleNotifier,
}

impl PluginManager {
    pub fn new() -> Self {
        Self {
            notifiers: Vec::new(),
            fallback: ConsoleNotifier::new(),
        }
    }

    /// Register the notifiers the configuration enables.
    pub fn from_config(config: &NotificationsConfig) -> Self {
        let mut manager = Self::new();
        if let Some(smtp) = config.email() {
            manager.register_notifier(Box::new(EmailNotifier::new(smtp.clone())));
        }
        manager
    }

    /// Register a notifier plugin
    pub fn register_notifier(&mut self, plugin: NotifierPluginBox) {
        tracing::debug!("Registered notifier: {}", plugin.name());
        self.notifiers.push(plugin);
    }

    /// Check if a notifier plugin exists
    pub fn has_notifier(&self, plugin_type: &str) -> bool {
        self.notifiers.iter().any(|n| n.plugin_type() == plugin_type)
    }

    /// List registered notifier types in dispatch order
    pub fn list_notifier_types(&self) -> Vec<String> {
        self.notifiers
            .iter()
            .map(|n| n.plugin_type().to_string())
            .collect()
    }

    /// Deliver an alert. Never fails: delivery errors are logged and the
    /// alert falls through to the next notifier and finally the console.
    pub async fn send_notification(&self, alert: &StockAlert) -> NotificationResult {
        for notifier in &self.notifiers {
            match notifier.notify(alert).await {
                Ok(result) => return result,
                Err(e) => {
                    tracing::error!("Failed to send {} notification: {}", notifier.plugin_type(), e);
                }
            }
        }

        match self.fallback.notify(alert).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!("Console fallback failed: {}", e);
                NotificationResult {
                    channel: self.fallback.plugin_type().to_string(),
                    message_id: None,
                }
            }
        }
    }
}

impl Default for PluginManager {
    fn default() -> Self {
        Self::new()
    }
}
