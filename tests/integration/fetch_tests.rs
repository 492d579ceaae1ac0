use super::*;
use restock_watcher::{AppError, StockReason, scraper::PageFetcher};
use wiremock::matchers::header_exists;

#[tokio::test]
async fn test_fetch_sends_user_agent_and_returns_markup() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PRODUCT_PATH))
        .and(header_exists("user-agent"))
        .respond_with(ResponseTemplate::new(200).set_body_string(IN_STOCK_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let scraper = WebScraper::new(test_scraper_config(5))?;
    let page = scraper.fetch(&product_url(&server)).await?;

    assert_eq!(page.status, 200);
    assert!(page.html.contains("Add to Cart"));
    assert!(page.final_url.ends_with(PRODUCT_PATH));
    assert_eq!(
        StockClassifier::new().classify(&page.html).reason,
        StockReason::InStockPrimary
    );
    Ok(())
}

#[tokio::test]
async fn test_non_success_status_is_fetch_failure() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&server)
        .await;

    let scraper = WebScraper::new(test_scraper_config(5))?;
    let err = scraper.fetch(&product_url(&server)).await.unwrap_err();

    assert!(matches!(err, AppError::HttpStatus { status: 503 }));
    assert!(err.is_fetch_failure());
    Ok(())
}

#[tokio::test]
async fn test_slow_response_times_out() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(IN_STOCK_PAGE)
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let scraper = WebScraper::new(test_scraper_config(1))?;
    let err = scraper.fetch(&product_url(&server)).await.unwrap_err();

    assert!(matches!(err, AppError::Timeout { seconds: 1 }));
    Ok(())
}
