// Shared fixtures for integration tests

pub mod fetch_tests;
pub mod monitor_tests;

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use restock_watcher::{
    StockAlert, StockClassifier, StockMonitor,
    config::{DEFAULT_USER_AGENT, ScraperConfig},
    plugins::{NotifierPlugin, PluginManager, traits::NotificationResult},
    scraper::WebScraper,
};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const PRODUCT_PATH: &str = "/product/701-03000/pikachu-plush";

pub const IN_STOCK_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Pikachu Plush | Pokémon Center</title></head>
<body>
  <div class="product-detail">
    <h1>Pikachu Plush</h1>
    <button class="add-to-cart-button--PZmQF btn--ICBoB btn-secondary--mtUol" type="button">Add to Cart</button>
  </div>
</body>
</html>"#;

pub const OUT_OF_STOCK_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Pikachu Plush | Pokémon Center</title></head>
<body>
  <div class="product-detail">
    <h1>Pikachu Plush</h1>
    <button class="add-to-cart-button--PZmQF btn--ICBoB btn-tertiary--_2uKVi disabled--vkECP" disabled="">Unavailable</button>
  </div>
</body>
</html>"#;

/// Counts alerts delivered through it.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    calls: Arc<AtomicUsize>,
}

impl RecordingNotifier {
    pub fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NotifierPlugin for RecordingNotifier {
    fn name(&self) -> &str {
        "Recording Notifier"
    }

    fn plugin_type(&self) -> &str {
        "recording"
    }

    async fn notify(&self, _alert: &StockAlert) -> restock_watcher::Result<NotificationResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(NotificationResult {
            channel: "recording".to_string(),
            message_id: None,
        })
    }
}

pub fn test_scraper_config(timeout_secs: u64) -> ScraperConfig {
    ScraperConfig {
        user_agent: DEFAULT_USER_AGENT.to_string(),
        request_timeout: timeout_secs,
    }
}

pub fn product_url(server: &MockServer) -> Url {
    Url::parse(&format!("{}{}", server.uri(), PRODUCT_PATH)).expect("mock server URL")
}

/// A storefront that always serves `html` for the product page.
pub async fn storefront(html: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PRODUCT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(html))
        .mount(&server)
        .await;
    server
}

pub fn test_notifiers() -> (PluginManager, RecordingNotifier) {
    let recorder = RecordingNotifier::default();
    let mut notifiers = PluginManager::new();
    notifiers.register_notifier(Box::new(recorder.clone()));
    (notifiers, recorder)
}

pub fn monitor_for(
    server: &MockServer,
    (notifiers, recorder): (PluginManager, RecordingNotifier),
) -> anyhow::Result<(StockMonitor, RecordingNotifier)> {
    let scraper = WebScraper::new(test_scraper_config(5))?;
    let monitor = StockMonitor::new(
        product_url(server),
        "Pikachu Plush",
        Duration::from_millis(20),
        Box::new(scraper),
        StockClassifier::new(),
        notifiers,
    );
    Ok((monitor, recorder))
}
