use chrono::Duration;
use chrono::TimeZone;
use chrono::Utc;

use super::default_widgets;
use super::format_quote;
use super::summarize;
use crate::domain::models::Earnings;
use crate::domain::models::MarketSnapshot;
use crate::domain::models::NewsItem;
use crate::domain::models::Sentiment;

fn value<'a>(rows: &'a [(String, String)], label: &str) -> &'a str {
    return rows
        .iter()
        .find(|(row_label, _)| return row_label == label)
        .map(|(_, value)| return value.as_str())
        .unwrap();
}

#[test]
fn it_summarizes_price_series() {
    let rows = summarize(
        &[100.0, 110.0, 99.0, 120.0],
        Some(&[100.0, 105.0, 100.0, 110.0]),
        2,
        Some(1.0),
    );

    assert_eq!(value(&rows, "SMA(2)"), "109.50");
    assert_eq!(value(&rows, "EMA(2)"), "113.67");
    assert_eq!(value(&rows, "RSI(2)"), "82.54");
    assert_eq!(value(&rows, "Change"), "+20.00%");
    assert_eq!(value(&rows, "Max drawdown"), "-10.00%");
    assert_eq!(value(&rows, "CAGR"), "+20.00%");
    assert_ne!(value(&rows, "Sharpe"), "N/A");
    assert_ne!(value(&rows, "Beta"), "N/A");
}

#[test]
fn it_marks_short_series_as_unavailable() {
    let rows = summarize(&[100.0], None, 14, None);

    assert_eq!(value(&rows, "SMA(14)"), "N/A");
    assert_eq!(value(&rows, "RSI(14)"), "N/A");
    assert_eq!(value(&rows, "Sharpe"), "N/A");
    assert!(rows.iter().all(|(label, _)| return label != "Beta" && label != "CAGR"));
}

#[test]
fn it_formats_quotes() {
    let now = Utc.with_ymd_and_hms(2024, 1, 29, 15, 0, 0).unwrap();
    let snapshot = MarketSnapshot {
        price: 189.5,
        volume: 52_300_000.0,
        news: vec![NewsItem {
            title: "AAPL beats revenue expectations".to_string(),
            sentiment: Sentiment::Positive,
            published_at: now - Duration::hours(2),
        }],
        earnings: Earnings {
            next_date: Some(now + Duration::days(3)),
        },
    };

    insta::assert_snapshot!(format_quote("AAPL", &snapshot, now), @r###"
    AAPL  $189.50  Vol 52.3M  Earnings in 3d
        [positive] AAPL beats revenue expectations (2h ago)
    "###);
}

#[test]
fn it_lays_out_the_default_dashboard() {
    let layout = default_widgets()
        .iter()
        .map(|widget| return (widget.id.to_string(), widget.layout(1200.0)))
        .map(|(id, item)| return format!("{id}: {}x{} at {},{}", item.w, item.h, item.x, item.y))
        .collect::<Vec<String>>()
        .join("\n");

    insta::assert_snapshot!(layout, @r###"
    chart: 10x25 at 0,0
    watchlist: 3x13 at 8,0
    news: 6x20 at 0,25
    filings: 6x20 at 6,25
    alerts: 3x13 at 8,13
    "###);
}
