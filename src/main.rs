use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};

use restock_watcher::config::{EMAIL_VARS, EmailTestConfig, REQUIRED_VARS};
use restock_watcher::plugins::notifiers::EmailNotifier;
use restock_watcher::{AppConfig, AppError, CheckOutcome, MonitorOutcome, StockAlert, StockMonitor, StockReason};

#[derive(Parser)]
#[command(name = "restock-watcher", version, about = "Watch a product page and get alerted when it is back in stock")]
struct Cli {
    /// Read configuration variables from this file instead of ./.env
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Poll the product page until it is back in stock (default)
    Watch {
        /// Seconds between checks, overriding CHECK_INTERVAL
        #[arg(long)]
        interval: Option<u64>,
    },
    /// Check the product page once and print the verdict
    Check {
        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },
    /// Send a test email with the configured SMTP settings
    TestEmail {
        /// Also send a sample stock alert
        #[arg(long)]
        preview_alert: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let directive = if cli.verbose {
        "restock_watcher=debug"
    } else {
        "restock_watcher=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(directive.parse()?),
        )
        .init();

    match &cli.env_file {
        Some(path) => {
            dotenvy::from_path(path)?;
        }
        None => {
            if let Err(e) = dotenvy::dotenv() {
                if !e.not_found() {
                    warn!("Could not read .env file: {}", e);
                }
            }
        }
    }

    match cli.command.unwrap_or(Command::Watch { interval: None }) {
        Command::Watch { interval } => match load_config() {
            Some(config) => watch(config, interval).await,
            None => Ok(()),
        },
        Command::Check { json } => match load_config() {
            Some(config) => check(&config, json).await,
            None => Ok(()),
        },
        Command::TestEmail { preview_alert } => match EmailTestConfig::from_env() {
            Ok(config) => test_email(&config, preview_alert).await,
            Err(e) => {
                eprintln!("❌ Error: {}", e);
                Ok(())
            }
        },
    }
}

/// Load the watcher configuration, printing guidance when it is unusable.
fn load_config() -> Option<AppConfig> {
    match AppConfig::from_env() {
        Ok(config) => Some(config),
        Err(AppError::ConfigurationMissing { missing }) => {
            print_missing_guidance(&missing);
            None
        }
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            None
        }
    }
}

fn print_missing_guidance(missing: &[String]) {
    eprintln!("❌ Error: Missing required environment variables:");
    for var in missing {
        eprintln!("   - {}", var);
    }
    eprintln!("\n📋 Please:");
    eprintln!("1. Copy .env.example to .env");
    eprintln!("2. Fill in your configuration values ({})", REQUIRED_VARS.join(", "));
    eprintln!("3. Run the watcher again");
}

async fn watch(mut config: AppConfig, interval: Option<u64>) -> Result<()> {
    if let Some(seconds) = interval {
        config.monitor.check_interval = seconds.max(1);
    }

    info!("Monitoring URL: {}", config.product.url);
    info!(
        "Check interval: {} seconds ({:.1} minutes)",
        config.monitor.check_interval,
        config.monitor.check_interval as f64 / 60.0
    );
    match config.notifications.email() {
        Some(smtp) => info!("Email notifications: Enabled ({})", smtp.to_address),
        None => info!("Email notifications: Disabled (console only)"),
    }
    info!("Starting monitor... (Press Ctrl+C to stop)");

    let mut monitor = StockMonitor::from_config(&config)?;
    let report = monitor.run(tokio::signal::ctrl_c()).await;

    match report.outcome {
        MonitorOutcome::Restocked { reason, notification } => info!(
            "Back in stock ({}) after {} checks, alert sent via {}",
            reason, report.ticks, notification.channel
        ),
        MonitorOutcome::Interrupted => info!(
            "Stopped after {} checks ({} failed)",
            report.ticks, report.failed_checks
        ),
    }

    Ok(())
}

async fn check(config: &AppConfig, json: bool) -> Result<()> {
    let monitor = StockMonitor::from_config(config)?;
    let outcome = monitor.check_once().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    match outcome {
        CheckOutcome::Determined { verdict, status } => {
            println!("{} (Status: {})", verdict.reason.status_line(), status);
        }
        CheckOutcome::Failed { error } => {
            println!("⚠️  Failed to check stock: {}", error);
        }
    }

    Ok(())
}

async fn test_email(config: &EmailTestConfig, preview_alert: bool) -> Result<()> {
    if !config.notifications.email_enabled {
        println!("❌ Email notifications are disabled in your configuration");
        println!("💡 Set EMAIL_NOTIFICATIONS=true to enable email testing");
        return Ok(());
    }

    let Some(smtp) = config.notifications.email() else {
        println!("❌ Missing or invalid email configuration. Required variables:");
        for var in EMAIL_VARS {
            println!("   - {}", var);
        }
        return Ok(());
    };

    let notifier = EmailNotifier::new(smtp.clone());
    println!("🔄 Connecting to {}:{}...", smtp.host, smtp.port);
    match notifier.test_connection().await {
        Ok(true) => println!("🔐 Connected and authenticated"),
        Ok(false) => println!("⚠️  Relay did not confirm the connection, trying to send anyway"),
        Err(e) => {
            print_email_failure(&e);
            return Ok(());
        }
    }

    println!("📧 Sending test email to: {}", smtp.to_address);

    match notifier.send_test_email(&config.product_url).await {
        Ok(_) => {
            println!("✅ SUCCESS! Test email sent successfully!");
            println!("📱 Check your inbox for the test notification.");
        }
        Err(e) => {
            print_email_failure(&e);
            return Ok(());
        }
    }

    if preview_alert {
        let alert = StockAlert::new(
            &config.product_name,
            &config.product_url,
            StockReason::InStockPrimary,
        );
        match notifier.send_alert_preview(&alert).await {
            Ok(_) => println!("✅ Stock alert test email sent!"),
            Err(e) => print_email_failure(&e),
        }
    }

    Ok(())
}

fn print_email_failure(err: &AppError) {
    if err.is_auth_failure() {
        println!("❌ AUTHENTICATION ERROR: {}", err);
        println!("🔑 This usually means:");
        println!("   1. You're using your regular account password instead of an app password");
        println!("   2. Two-factor authentication isn't enabled");
        println!("   3. The app password is incorrect");
        println!("📋 Generate an app password and put it in EMAIL_PASSWORD.");
    } else {
        println!("❌ Failed to send email: {}", err);
        println!("🔧 Check your SMTP settings, or try again in a moment.");
    }
}
