use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use url::Url;

use crate::classifier::StockClassifier;
use crate::config::AppConfig;
use crate::models::{CheckOutcome, StockAlert, StockReason};
use crate::plugins::PluginManager;
use crate::plugins::traits::NotificationResult;
use crate::scraper::{PageFetcher, WebScraper};
use crate::utils::error::Result;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MonitorState {
    Polling,
    Done,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum MonitorOutcome {
    Restocked {
        reason: StockReason,
        notification: NotificationResult,
    },
    Interrupted,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorReport {
    pub outcome: MonitorOutcome,
    pub ticks: u64,
    pub failed_checks: u64,
}

/// Polls one product page until it is in stock or the shutdown future
/// resolves.
pub struct StockMonitor {
    target: Url,
    product_name: String,
    interval: Duration,
    fetcher: Box<dyn PageFetcher>,
    classifier: StockClassifier,
    notifiers: PluginManager,
    state: MonitorState,
}

impl StockMonitor {
    pub fn new(
        target: Url,
        product_name: impl Into<String>,
        interval: Duration,
        fetcher: Box<dyn PageFetcher>,
        classifier: StockClassifier,
        notifiers: PluginManager,
    ) -> Self {
        Self {
            target,
            product_name: product_name.into(),
            interval,
            fetcher,
            classifier,
            notifiers,
            state: MonitorState::Polling,
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let scraper = WebScraper::new(config.scraper.clone())?;

        Ok(Self::new(
            config.product.url.clone(),
            config.product.name.clone(),
            config.monitor.interval(),
            Box::new(scraper),
            StockClassifier::new(),
            PluginManager::from_config(&config.notifications),
        ))
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    /// One fetch-and-classify pass. Fetch errors become
    /// [`CheckOutcome::Failed`], never an out-of-stock verdict.
    pub async fn check_once(&self) -> CheckOutcome {
        match self.fetcher.fetch(&self.target).await {
            Ok(page) => CheckOutcome::Determined {
                verdict: self.classifier.classify(&page.html),
                status: page.status,
            },
            Err(e) => {
                tracing::error!("Error checking stock: {}", e);
                CheckOutcome::Failed {
                    error: e.to_string(),
                }
            }
        }
    }

    /// Run the polling loop. `shutdown` is armed before the first request and
    /// then only observed between ticks, so an in-flight request always
    /// completes or times out first.
    pub async fn run<F: Future>(&mut self, shutdown: F) -> MonitorReport {
        tracing::info!("Starting to monitor: {}", self.target);
        tracing::info!("Check interval: {} seconds", self.interval.as_secs());

        tokio::pin!(shutdown);
        self.state = MonitorState::Polling;

        // Arm the shutdown future before the first request: signal listeners
        // such as `ctrl_c` only register once they are polled.
        tokio::select! {
            biased;
            _ = &mut shutdown => return self.interrupted(0, 0),
            _ = std::future::ready(()) => {}
        }

        let mut ticks: u64 = 0;
        let mut failed_checks: u64 = 0;

        loop {
            ticks += 1;

            match self.check_once().await {
                CheckOutcome::Determined { verdict, .. } if verdict.in_stock => {
                    let alert =
                        StockAlert::new(&self.product_name, self.target.as_str(), verdict.reason);
                    tracing::info!("{}", alert.headline);

                    let notification = self.notifiers.send_notification(&alert).await;
                    self.state = MonitorState::Done;

                    return MonitorReport {
                        outcome: MonitorOutcome::Restocked {
                            reason: verdict.reason,
                            notification,
                        },
                        ticks,
                        failed_checks,
                    };
                }
                CheckOutcome::Determined { verdict, status } => {
                    tracing::info!(
                        reason = %verdict.reason,
                        "Still out of stock (Status: {})",
                        status
                    );
                }
                CheckOutcome::Failed { .. } => {
                    failed_checks += 1;
                    tracing::warn!("Failed to check stock");
                }
            }

            tokio::select! {
                biased;
                _ = &mut shutdown => return self.interrupted(ticks, failed_checks),
                _ = tokio::time::sleep(self.interval) => {}
            }
        }
    }

    fn interrupted(&mut self, ticks: u64, failed_checks: u64) -> MonitorReport {
        tracing::info!("Monitoring stopped by user");
        self.state = MonitorState::Done;
        MonitorReport {
            outcome: MonitorOutcome::Interrupted,
            ticks,
            failed_checks,
        }
    }
}
