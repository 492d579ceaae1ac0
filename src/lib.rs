pub mod classifier;
pub mod config;
pub mod models;
pub mod monitor;
pub mod plugins;
pub mod scraper;
pub mod utils;

// Re-export commonly used types
pub use classifier::StockClassifier;
pub use config::AppConfig;
pub use models::{CheckOutcome, StockAlert, StockReason, StockVerdict};
pub use monitor::{MonitorOutcome, MonitorReport, StockMonitor};
pub use utils::error::AppError;

pub type Result<T> = std::result::Result<T, AppError>;
