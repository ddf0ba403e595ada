use std::collections::HashMap;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::DeskResult;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub title: String,
    pub sentiment: Sentiment,
    pub published_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Earnings {
    pub next_date: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub price: f64,
    pub volume: f64,
    pub news: Vec<NewsItem>,
    pub earnings: Earnings,
}

#[async_trait]
pub trait MarketDataProvider {
    /// Current snapshot per requested symbol. Symbols the provider knows
    /// nothing about are simply absent from the map.
    async fn fetch(&self, symbols: &[String]) -> DeskResult<HashMap<String, MarketSnapshot>>;
}

pub type MarketDataBox = Box<dyn MarketDataProvider + Send + Sync>;
