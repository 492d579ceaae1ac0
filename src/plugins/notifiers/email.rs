use crate::config::SmtpConfig;
use crate::models::StockAlert;
use crate::plugins::traits::{NotificationResult, NotifierPlugin};
use crate::utils::error::{AppError, Result};
use async_trait::async_trait;
use lettre::message::{header, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;

pub const TEST_SUBJECT: &str = "🧪 Pokémon Stock Monitor - Test Email";

const SMTP_TIMEOUT: Duration = Duration::from_secs(30);

pub struct EmailNotifier {
    config: SmtpConfig,
}

impl EmailNotifier {
    pub fn new(config: SmtpConfig) -> Self {
        EmailNotifier { config }
    }

    /// Reject settings that cannot possibly reach a relay before opening a
    /// connection.
    pub fn validate(&self) -> Result<()> {
        if self.config.host.trim().is_empty() {
            return Err(AppError::Notification("SMTP server is empty".to_string()));
        }
        if self.config.port == 0 {
            return Err(AppError::Notification(
                "SMTP port must be greater than 0".to_string(),
            ));
        }
        self.mailboxes()?;
        Ok(())
    }

    fn mailboxes(&self) -> Result<(Mailbox, Mailbox)> {
        let from = Mailbox::new(
            Some(self.config.from_name.clone()),
            self.config.from_address.parse::<Address>()?,
        );
        let to = Mailbox::new(None, self.config.to_address.parse::<Address>()?);
        Ok((from, to))
    }

    pub fn build_message(&self, subject: &str, body: String) -> Result<Message> {
        let (from, to) = self.mailboxes()?;

        let email = Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .header(header::ContentType::TEXT_PLAIN)
            .body(body)?;

        Ok(email)
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>> {
        self.validate()?;

        // Credentials are the sender address and its (app) password.
        let credentials = Credentials::new(
            self.config.from_address.clone(),
            self.config.password.clone(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.host)?
            .port(self.config.port)
            .credentials(credentials)
            .timeout(Some(SMTP_TIMEOUT))
            .build();

        Ok(mailer)
    }

    async fn send(&self, subject: &str, body: String) -> Result<NotificationResult> {
        let email = self.build_message(subject, body)?;
        let mailer = self.transport()?;

        tracing::debug!(
            "Sending '{}' via {}:{} to {}",
            subject,
            self.config.host,
            self.config.port,
            self.config.to_address
        );

        let response = mailer.send(email).await?;

        Ok(NotificationResult {
            channel: self.plugin_type().to_string(),
            message_id: response.message().next().map(|line| line.to_string()),
        })
    }

    pub fn format_test_body(&self, product_url: &str) -> String {
        let mut text = String::new();

        text.push_str("✅ SUCCESS! Your email notifications are working correctly.\n\n");
        text.push_str("This is a test email from your restock watcher.\n\n");
        text.push_str(&format!(
            "Test sent at: {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        ));
        text.push_str(&format!("Monitoring URL: {}\n\n", product_url));
        text.push_str("🎉 When your monitored product comes back in stock,\n");
        text.push_str("you'll receive a notification just like this one!\n");

        text
    }

    /// Send a connectivity test message.
    pub async fn send_test_email(&self, product_url: &str) -> Result<NotificationResult> {
        self.send(TEST_SUBJECT, self.format_test_body(product_url)).await
    }

    /// Send an alert in the exact production format, marked as a test.
    pub async fn send_alert_preview(&self, alert: &StockAlert) -> Result<NotificationResult> {
        let mut body = alert.text_body();
        body.push_str("\n(This is a test email - the product may not actually be in stock)\n");
        self.send(alert.subject(), body).await
    }

    /// Connect, negotiate STARTTLS and authenticate without sending.
    pub async fn test_connection(&self) -> Result<bool> {
        let mailer = self.transport()?;
        Ok(mailer.test_connection().await?)
    }
}

#[async_trait]
impl NotifierPlugin for EmailNotifier {
    fn name(&self) -> &str {
        "Email Notifier"
    }

    fn plugin_type(&self) -> &str {
        "email"
    }

    async fn notify(&self, alert: &StockAlert) -> Result<NotificationResult> {
        let result = self.send(alert.subject(), alert.text_body()).await?;
        tracing::info!("Email notification sent successfully!");
        Ok(result)
    }
}
