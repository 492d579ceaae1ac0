use config::{Config, Environment};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

use crate::utils::error::AppError;

pub const DEFAULT_CHECK_INTERVAL: u64 = 90;
pub const DEFAULT_REQUEST_TIMEOUT: u64 = 10;
pub const DEFAULT_PRODUCT_NAME: &str = "Pokémon product";
pub const DEFAULT_FROM_NAME: &str = "Restock Watcher";
pub const NO_PRODUCT_URL: &str = "No URL configured";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub const REQUIRED_VARS: &[&str] = &["PRODUCT_URL"];
pub const EMAIL_VARS: &[&str] = &[
    "SMTP_SERVER",
    "SMTP_PORT",
    "FROM_EMAIL",
    "EMAIL_PASSWORD",
    "TO_EMAIL",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub product: ProductConfig,
    pub scraper: ScraperConfig,
    pub monitor: MonitorConfig,
    pub notifications: NotificationsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductConfig {
    pub url: Url,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    pub user_agent: String,
    pub request_timeout: u64,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Seconds between checks.
    pub check_interval: u64,
}

impl MonitorConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.check_interval)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    pub email_enabled: bool,
    pub smtp: Option<SmtpConfig>,
}

impl NotificationsConfig {
    /// SMTP settings, if email delivery is both enabled and fully configured.
    pub fn email(&self) -> Option<&SmtpConfig> {
        if self.email_enabled {
            self.smtp.as_ref()
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub from_address: String,
    pub from_name: String,
    pub password: String,
    pub to_address: String,
}

/// Environment variables as read, before validation. Keys are lowercased by
/// the `config` environment source.
#[derive(Debug, Default, Deserialize)]
struct RawSettings {
    product_url: Option<String>,
    product_name: Option<String>,
    check_interval: Option<String>,
    email_notifications: Option<String>,
    smtp_server: Option<String>,
    smtp_port: Option<String>,
    from_email: Option<String>,
    email_password: Option<String>,
    to_email: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl AppConfig {
    /// Load from the process environment. Callers load any `.env` file first.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_environment(Environment::default())
    }

    /// Load from an explicit variable map instead of the process environment.
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, AppError> {
        Self::from_environment(Environment::default().source(Some(vars)))
    }

    fn from_environment(environment: Environment) -> Result<Self, AppError> {
        Self::from_raw(RawSettings::load(environment)?)
    }

    fn from_raw(raw: RawSettings) -> Result<Self, AppError> {
        let Some(product_url) = present(&raw.product_url) else {
            return Err(AppError::ConfigurationMissing {
                missing: REQUIRED_VARS.iter().map(|v| v.to_string()).collect(),
            });
        };
        let url = Url::parse(product_url)?;

        let name = present(&raw.product_name)
            .unwrap_or(DEFAULT_PRODUCT_NAME)
            .to_string();

        let check_interval = match present(&raw.check_interval) {
            None => DEFAULT_CHECK_INTERVAL,
            Some(value) => match value.parse::<u64>() {
                Ok(seconds) if seconds > 0 => seconds,
                _ => {
                    tracing::warn!(
                        "Invalid CHECK_INTERVAL value {:?}, using default ({} seconds)",
                        value,
                        DEFAULT_CHECK_INTERVAL
                    );
                    DEFAULT_CHECK_INTERVAL
                }
            },
        };

        let config = AppConfig {
            product: ProductConfig { url, name },
            scraper: ScraperConfig::default(),
            monitor: MonitorConfig { check_interval },
            notifications: NotificationsConfig::from_raw(&raw),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        match self.product.url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(AppError::Config(config::ConfigError::Message(format!(
                    "PRODUCT_URL must use http or https, got {}",
                    other
                ))));
            }
        }

        if self.monitor.check_interval == 0 {
            return Err(AppError::Config(config::ConfigError::Message(
                "CHECK_INTERVAL must be greater than 0".into(),
            )));
        }

        if self.scraper.request_timeout == 0 {
            return Err(AppError::Config(config::ConfigError::Message(
                "Request timeout must be greater than 0".into(),
            )));
        }

        Ok(())
    }
}

impl RawSettings {
    fn load(environment: Environment) -> Result<Self, AppError> {
        Ok(Config::builder()
            .add_source(environment)
            .build()?
            .try_deserialize()?)
    }
}

impl NotificationsConfig {
    fn from_raw(raw: &RawSettings) -> Self {
        // Unset means enabled; any other value, empty included, must say "true".
        let email_enabled = raw
            .email_notifications
            .as_deref()
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(true);

        let smtp = if email_enabled {
            Self::smtp_from_raw(raw)
        } else {
            None
        };

        NotificationsConfig {
            email_enabled,
            smtp,
        }
    }

    fn smtp_from_raw(raw: &RawSettings) -> Option<SmtpConfig> {
        let fields = [
            ("SMTP_SERVER", present(&raw.smtp_server)),
            ("SMTP_PORT", present(&raw.smtp_port)),
            ("FROM_EMAIL", present(&raw.from_email)),
            ("EMAIL_PASSWORD", present(&raw.email_password)),
            ("TO_EMAIL", present(&raw.to_email)),
        ];

        let missing: Vec<&str> = fields
            .iter()
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            tracing::warn!(
                "Email notifications disabled - missing email configuration: {}",
                missing.join(", ")
            );
            return None;
        }

        let [(_, Some(host)), (_, Some(port)), (_, Some(from)), (_, Some(password)), (_, Some(to))] =
            fields
        else {
            return None;
        };

        let Ok(port) = port.parse::<u16>() else {
            tracing::warn!("Invalid SMTP_PORT value {:?}, email notifications disabled", port);
            return None;
        };

        Some(SmtpConfig {
            host: host.to_string(),
            port,
            from_address: from.to_string(),
            from_name: DEFAULT_FROM_NAME.to_string(),
            password: password.to_string(),
            to_address: to.to_string(),
        })
    }
}

/// Settings for sending a test email. Unlike [`AppConfig`], no product URL is
/// required.
#[derive(Debug, Clone)]
pub struct EmailTestConfig {
    pub product_url: String,
    pub product_name: String,
    pub notifications: NotificationsConfig,
}

impl EmailTestConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_raw(&RawSettings::load(Environment::default())?)
    }

    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, AppError> {
        Self::from_raw(&RawSettings::load(
            Environment::default().source(Some(vars)),
        )?)
    }

    fn from_raw(raw: &RawSettings) -> Result<Self, AppError> {
        Ok(EmailTestConfig {
            product_url: present(&raw.product_url)
                .unwrap_or(NO_PRODUCT_URL)
                .to_string(),
            product_name: present(&raw.product_name)
                .unwrap_or(DEFAULT_PRODUCT_NAME)
                .to_string(),
            notifications: NotificationsConfig::from_raw(raw),
        })
    }
}
