use serde_derive::Deserialize;
use serde_derive::Serialize;
use strum::EnumString;
use strum::EnumVariantNames;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum WidgetKind {
    StockChart,
    Watchlist,
    News,
    Filings,
    Alerts,
}

#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    EnumString,
    EnumVariantNames,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum WidgetSize {
    Small,
    Medium,
    Large,
}

impl WidgetSize {
    /// Declared pixel width and height.
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            WidgetSize::Small => return (320.0, 250.0),
            WidgetSize::Medium => return (640.0, 400.0),
            WidgetSize::Large => return (960.0, 500.0),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    pub id: String,
    pub content: WidgetKind,
    pub size: WidgetSize,
    pub x: u32,
    pub y: u32,
}
