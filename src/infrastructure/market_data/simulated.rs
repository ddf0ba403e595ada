#[cfg(test)]
#[path = "simulated_test.rs"]
mod tests;

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Duration;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

use crate::domain::models::DeskError;
use crate::domain::models::DeskResult;
use crate::domain::models::Earnings;
use crate::domain::models::MarketDataProvider;
use crate::domain::models::MarketSnapshot;
use crate::domain::models::NewsItem;
use crate::domain::models::Sentiment;

const HEADLINES: [&str; 4] = [
    "beats revenue expectations",
    "faces regulatory scrutiny",
    "announces buyback programme",
    "cuts full year guidance",
];

/// Random walk market data. Each symbol starts at a random price and drifts
/// by up to 2% per fetch.
pub struct SimulatedMarket {
    rng: Mutex<StdRng>,
    prices: Mutex<HashMap<String, f64>>,
}

impl Default for SimulatedMarket {
    fn default() -> SimulatedMarket {
        return SimulatedMarket {
            rng: Mutex::new(StdRng::from_entropy()),
            prices: Mutex::new(HashMap::new()),
        };
    }
}

impl SimulatedMarket {
    pub fn seeded(seed: u64) -> SimulatedMarket {
        return SimulatedMarket {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            prices: Mutex::new(HashMap::new()),
        };
    }

    fn snapshot(rng: &mut StdRng, last_price: Option<f64>, symbol: &str) -> MarketSnapshot {
        let price = match last_price {
            Some(last) => (last * (1.0 + rng.gen_range(-0.02..0.02))).max(0.01),
            None => rng.gen_range(10.0..500.0),
        };

        let mut news = vec![];
        if rng.gen_bool(0.3) {
            let sentiment = match rng.gen_range(0..3) {
                0 => Sentiment::Positive,
                1 => Sentiment::Negative,
                _ => Sentiment::Neutral,
            };
            let headline = HEADLINES[rng.gen_range(0..HEADLINES.len())];
            news.push(NewsItem {
                title: format!("{symbol} {headline}"),
                sentiment,
                published_at: Utc::now() - Duration::minutes(rng.gen_range(0..48 * 60)),
            });
        }

        let next_date = if rng.gen_bool(0.5) {
            Some(Utc::now() + Duration::days(rng.gen_range(0..60)))
        } else {
            None
        };

        return MarketSnapshot {
            price: (price * 100.0).round() / 100.0,
            volume: rng.gen_range(100_000.0..50_000_000.0_f64).round(),
            news,
            earnings: Earnings { next_date },
        };
    }
}

#[async_trait]
impl MarketDataProvider for SimulatedMarket {
    #[allow(clippy::implicit_return)]
    async fn fetch(&self, symbols: &[String]) -> DeskResult<HashMap<String, MarketSnapshot>> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|err| return DeskError::TransientNetwork(err.to_string()))?;
        let mut prices = self
            .prices
            .lock()
            .map_err(|err| return DeskError::TransientNetwork(err.to_string()))?;

        let mut res = HashMap::new();
        for symbol in symbols {
            let snapshot =
                SimulatedMarket::snapshot(&mut rng, prices.get(symbol).copied(), symbol);
            prices.insert(symbol.to_string(), snapshot.price);
            res.insert(symbol.to_string(), snapshot);
        }

        tracing::debug!(symbols = symbols.len(), "Simulated market fetch");
        return Ok(res);
    }
}
