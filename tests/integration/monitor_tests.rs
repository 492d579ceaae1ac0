use super::*;
use restock_watcher::config::{NotificationsConfig, SmtpConfig};
use restock_watcher::{CheckOutcome, MonitorOutcome, StockReason};

#[tokio::test]
async fn test_restock_after_out_of_stock_notifies_once() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    // Mounted first, so it answers the first request only.
    Mock::given(method("GET"))
        .and(path(PRODUCT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(OUT_OF_STOCK_PAGE))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(PRODUCT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(IN_STOCK_PAGE))
        .mount(&server)
        .await;

    let (mut monitor, recorder) = monitor_for(&server, test_notifiers())?;
    let report = monitor.run(std::future::pending::<()>()).await;

    assert_eq!(report.ticks, 2);
    assert_eq!(report.failed_checks, 0);
    assert_eq!(recorder.count(), 1);
    assert!(matches!(
        report.outcome,
        MonitorOutcome::Restocked {
            reason: StockReason::InStockPrimary,
            ..
        }
    ));

    let requests = server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_server_errors_are_retried_without_notifying() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (mut monitor, recorder) = monitor_for(&server, test_notifiers())?;
    let report = monitor
        .run(tokio::time::sleep(Duration::from_millis(150)))
        .await;

    assert_eq!(report.outcome, MonitorOutcome::Interrupted);
    assert!(report.failed_checks >= 2);
    assert_eq!(recorder.count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_unrecognized_page_is_not_a_failure() -> anyhow::Result<()> {
    let server = storefront("<html><body><h1>Maintenance</h1></body></html>").await;
    let (monitor, _recorder) = monitor_for(&server, test_notifiers())?;

    match monitor.check_once().await {
        CheckOutcome::Determined { verdict, status } => {
            assert_eq!(status, 200);
            assert!(!verdict.in_stock);
            assert_eq!(verdict.reason, StockReason::Unknown);
        }
        other => panic!("expected a verdict, got {:?}", other),
    }
    Ok(())
}

fn smtp_config(host: &str, port: u16) -> SmtpConfig {
    SmtpConfig {
        host: host.to_string(),
        port,
        from_address: "watcher@example.com".to_string(),
        from_name: "Restock Watcher".to_string(),
        password: "app-password".to_string(),
        to_address: "me@example.com".to_string(),
    }
}

#[tokio::test]
async fn test_invalid_smtp_port_falls_back_to_console() -> anyhow::Result<()> {
    let server = storefront(IN_STOCK_PAGE).await;
    let notifiers = PluginManager::from_config(&NotificationsConfig {
        email_enabled: true,
        smtp: Some(smtp_config("smtp.example.com", 0)),
    });
    assert!(notifiers.has_notifier("email"));

    let (mut monitor, _) = monitor_for(&server, (notifiers, RecordingNotifier::default()))?;
    let report = monitor.run(std::future::pending::<()>()).await;

    match report.outcome {
        MonitorOutcome::Restocked { notification, .. } => {
            assert_eq!(notification.channel, "console");
        }
        other => panic!("expected restock, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_unreachable_relay_falls_back_to_console() -> anyhow::Result<()> {
    let server = storefront(IN_STOCK_PAGE).await;
    let notifiers = PluginManager::from_config(&NotificationsConfig {
        email_enabled: true,
        smtp: Some(smtp_config("127.0.0.1", 1)),
    });

    let (mut monitor, _) = monitor_for(&server, (notifiers, RecordingNotifier::default()))?;
    let report = monitor.run(std::future::pending::<()>()).await;

    match report.outcome {
        MonitorOutcome::Restocked { notification, .. } => {
            assert_eq!(notification.channel, "console");
        }
        other => panic!("expected restock, got {:?}", other),
    }
    Ok(())
}
