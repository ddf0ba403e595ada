#[cfg(test)]
#[path = "dashboard_test.rs"]
mod tests;

use std::str::FromStr;

use anyhow::bail;
use anyhow::Result;
use chrono::Utc;
use clap::ArgMatches;
use owo_colors::OwoColorize;

use crate::domain::models::FontSize;
use crate::domain::models::MarketDataProvider;
use crate::domain::models::MarketSnapshot;
use crate::domain::models::Preferences;
use crate::domain::models::ThemeMode;
use crate::domain::models::Widget;
use crate::domain::models::WidgetKind;
use crate::domain::models::WidgetSize;
use crate::domain::services::calculations;
use crate::domain::services::evaluation::days_until;
use crate::domain::services::formatters::format_currency;
use crate::domain::services::formatters::format_percentage;
use crate::domain::services::formatters::format_relative_time;
use crate::domain::services::formatters::format_volume;
use crate::domain::services::pixels_to_grid_units;
use crate::domain::services::pixels_to_grid_units_rounded;
use crate::domain::services::validation::validate_symbol;
use crate::infrastructure::market_data::SimulatedMarket;
use crate::infrastructure::storage::FileStorage;

fn widget(id: &str, content: WidgetKind, size: WidgetSize, x: u32, y: u32) -> Widget {
    return Widget {
        id: id.to_string(),
        content,
        size,
        x,
        y,
    };
}

/// The dashboard a new user starts with.
pub fn default_widgets() -> Vec<Widget> {
    return vec![
        widget("chart", WidgetKind::StockChart, WidgetSize::Large, 0, 0),
        widget("watchlist", WidgetKind::Watchlist, WidgetSize::Small, 8, 0),
        widget("news", WidgetKind::News, WidgetSize::Medium, 0, 25),
        widget("filings", WidgetKind::Filings, WidgetSize::Medium, 6, 25),
        widget("alerts", WidgetKind::Alerts, WidgetSize::Small, 8, 13),
    ];
}

fn run_grid(matches: &ArgMatches) -> Result<()> {
    let grid_width = matches.get_one::<f64>("grid-width").copied().unwrap_or(1200.0);

    if matches.get_flag("layout") {
        let layout = default_widgets()
            .iter()
            .map(|widget| return widget.layout(grid_width))
            .collect::<Vec<_>>();
        println!("{}", serde_json::to_string_pretty(&layout)?);
        return Ok(());
    }

    let (width, height) = match matches.get_one::<String>("size") {
        Some(size) => match WidgetSize::from_str(size) {
            Ok(size) => size.dimensions(),
            Err(_) => bail!(format!("Unknown widget size '{size}'")),
        },
        None => {
            let width = matches.get_one::<f64>("width").copied();
            let height = matches.get_one::<f64>("height").copied();
            match (width, height) {
                (Some(width), Some(height)) => (width, height),
                _ => bail!("Pass --width and --height, or --size"),
            }
        }
    };

    let units = if matches.get_flag("round") {
        pixels_to_grid_units_rounded(width, height, grid_width)
    } else {
        pixels_to_grid_units(width, height, grid_width)
    };
    println!("w = {}, h = {}", units.w, units.h);

    return Ok(());
}

pub fn format_quote(symbol: &str, snapshot: &MarketSnapshot, now: chrono::DateTime<Utc>) -> String {
    let mut line = format!(
        "{symbol}  {}  Vol {}",
        format_currency(snapshot.price),
        format_volume(snapshot.volume)
    );

    if let Some(next) = snapshot.earnings.next_date {
        let days = days_until(next, now);
        if days >= 0 {
            line = format!("{line}  Earnings in {days}d");
        }
    }

    for item in &snapshot.news {
        line = format!(
            "{line}\n    [{}] {} ({})",
            item.sentiment,
            item.title,
            format_relative_time(item.published_at, now)
        );
    }

    return line;
}

/// Indicator summary of a closing price series, as label and value pairs.
pub fn summarize(
    prices: &[f64],
    benchmark: Option<&[f64]>,
    period: usize,
    years: Option<f64>,
) -> Vec<(String, String)> {
    let na = || return "N/A".to_string();
    let last = |series: Option<Vec<f64>>| {
        return series
            .and_then(|values| return values.last().copied())
            .map(|value| return format!("{value:.2}"))
            .unwrap_or_else(na);
    };

    let mut rows = vec![
        (format!("SMA({period})"), last(calculations::sma(prices, period))),
        (format!("EMA({period})"), last(calculations::ema(prices, period))),
        (format!("RSI({period})"), last(calculations::rsi(prices, period))),
    ];

    let (first, final_price) = (prices.first().copied(), prices.last().copied());
    let change = match (first, final_price) {
        (Some(first), Some(final_price)) => calculations::percent_change(first, final_price)
            .map(|change| return format_percentage(change, 2))
            .unwrap_or_else(na),
        _ => na(),
    };
    rows.push(("Change".to_string(), change));

    rows.push((
        "Max drawdown".to_string(),
        calculations::max_drawdown(prices)
            .map(|drawdown| return format_percentage(-drawdown * 100.0, 2))
            .unwrap_or_else(na),
    ));

    let returns = calculations::returns(prices);
    rows.push((
        "Sharpe".to_string(),
        returns
            .as_deref()
            .and_then(|returns| return calculations::sharpe_ratio(returns, 0.0))
            .map(|sharpe| return format!("{sharpe:.2}"))
            .unwrap_or_else(na),
    ));

    if let Some(benchmark) = benchmark {
        let beta = match (returns.as_deref(), calculations::returns(benchmark)) {
            (Some(asset), Some(market)) => calculations::beta(asset, &market),
            _ => None,
        };
        rows.push((
            "Beta".to_string(),
            beta.map(|beta| return format!("{beta:.2}")).unwrap_or_else(na),
        ));
    }

    if let (Some(years), Some(first), Some(final_price)) = (years, first, final_price) {
        rows.push((
            "CAGR".to_string(),
            calculations::cagr(first, final_price, years)
                .map(|cagr| return format_percentage(cagr * 100.0, 2))
                .unwrap_or_else(na),
        ));
    }

    return rows;
}

async fn run_market(matches: &ArgMatches) -> Result<bool> {
    match matches.subcommand() {
        Some(("quote", quote_matches)) => {
            let symbols = quote_matches
                .get_many::<String>("symbols")
                .map(|symbols| return symbols.map(|symbol| return symbol.trim().to_uppercase()).collect::<Vec<String>>())
                .unwrap_or_default();
            for symbol in &symbols {
                validate_symbol(symbol)?;
            }

            let snapshots = SimulatedMarket::default().fetch(&symbols).await?;
            let now = Utc::now();
            for symbol in &symbols {
                if let Some(snapshot) = snapshots.get(symbol) {
                    println!("{}", format_quote(symbol, snapshot, now));
                }
            }
        }
        Some(("stats", stats_matches)) => {
            let prices = stats_matches
                .get_many::<f64>("prices")
                .map(|prices| return prices.copied().collect::<Vec<f64>>())
                .unwrap_or_default();
            let benchmark = stats_matches
                .get_many::<f64>("benchmark")
                .map(|prices| return prices.copied().collect::<Vec<f64>>());
            let period = stats_matches.get_one::<usize>("period").copied().unwrap_or(14);
            let years = stats_matches.get_one::<f64>("years").copied();

            for (label, value) in summarize(&prices, benchmark.as_deref(), period, years) {
                println!("{:<14}{value}", label.bold());
            }
        }
        _ => return Ok(false),
    }

    return Ok(true);
}

fn run_prefs(matches: &ArgMatches) -> Result<bool> {
    let storage = FileStorage::default();

    match matches.subcommand() {
        Some(("show", _)) => {
            let prefs = Preferences::load(&storage);
            println!(
                "theme = {}\nfont-size = {}\nhigh-contrast = {}",
                prefs.theme, prefs.font_size, prefs.high_contrast
            );
        }
        Some(("set", set_matches)) => {
            let mut prefs = Preferences::load(&storage);
            if let Some(theme) = set_matches.get_one::<String>("theme") {
                prefs.theme = match ThemeMode::from_str(theme) {
                    Ok(theme) => theme,
                    Err(_) => bail!(format!("Unknown theme '{theme}'")),
                };
            }
            if let Some(font_size) = set_matches.get_one::<String>("font-size") {
                prefs.font_size = match FontSize::from_str(font_size) {
                    Ok(font_size) => font_size,
                    Err(_) => bail!(format!("Unknown font size '{font_size}'")),
                };
            }
            if let Some(high_contrast) = set_matches.get_one::<bool>("high-contrast") {
                prefs.high_contrast = *high_contrast;
            }

            prefs.save(&storage)?;
            println!("Preferences saved.");
        }
        _ => return Ok(false),
    }

    return Ok(true);
}

pub async fn run(name: &str, matches: &ArgMatches) -> Result<bool> {
    match name {
        "grid" => {
            run_grid(matches)?;
            return Ok(true);
        }
        "market" => return run_market(matches).await,
        "prefs" => return run_prefs(matches),
        _ => return Ok(false),
    }
}
