use anyhow::Result;

use super::SimulatedMarket;
use crate::domain::models::MarketDataProvider;

#[tokio::test]
async fn it_returns_a_snapshot_per_symbol() -> Result<()> {
    let market = SimulatedMarket::seeded(7);
    let symbols = vec!["AAPL".to_string(), "MSFT".to_string()];

    let res = market.fetch(&symbols).await?;
    assert_eq!(res.len(), 2);
    for snapshot in res.values() {
        assert!(snapshot.price > 0.0);
        assert!(snapshot.volume >= 100_000.0);
        assert!(snapshot.news.len() <= 1);
    }

    return Ok(());
}

#[tokio::test]
async fn it_walks_prices_within_two_percent() -> Result<()> {
    let market = SimulatedMarket::seeded(42);
    let symbols = vec!["AAPL".to_string()];

    let mut last = market.fetch(&symbols).await?["AAPL"].price;
    for _ in 0..20 {
        let next = market.fetch(&symbols).await?["AAPL"].price;
        let change = (next - last).abs() / last;
        assert!(change <= 0.021, "{last} -> {next}");
        last = next;
    }

    return Ok(());
}

#[tokio::test]
async fn it_handles_no_symbols() -> Result<()> {
    let market = SimulatedMarket::default();
    assert!(market.fetch(&[]).await?.is_empty());
    return Ok(());
}
