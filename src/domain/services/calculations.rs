#[cfg(test)]
#[path = "calculations_test.rs"]
mod tests;

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

fn mean(values: &[f64]) -> f64 {
    return values.iter().sum::<f64>() / values.len() as f64;
}

/// Sample variance (n - 1). Callers guarantee at least two values.
fn variance(values: &[f64]) -> f64 {
    let avg = mean(values);
    return values.iter().map(|v| return (v - avg).powi(2)).sum::<f64>()
        / (values.len() - 1) as f64;
}

fn covariance(a: &[f64], b: &[f64]) -> f64 {
    let (mean_a, mean_b) = (mean(a), mean(b));
    return a
        .iter()
        .zip(b)
        .map(|(x, y)| return (x - mean_a) * (y - mean_b))
        .sum::<f64>()
        / (a.len() - 1) as f64;
}

/// Simple moving average, one value per full window.
pub fn sma(values: &[f64], period: usize) -> Option<Vec<f64>> {
    if period == 0 || period > values.len() {
        return None;
    }

    return Some(values.windows(period).map(mean).collect());
}

/// Exponential moving average seeded with the SMA of the first window.
pub fn ema(values: &[f64], period: usize) -> Option<Vec<f64>> {
    if period == 0 || period > values.len() {
        return None;
    }

    let alpha = 2.0 / (period as f64 + 1.0);
    let mut current = mean(&values[..period]);
    let mut out = Vec::with_capacity(values.len() - period + 1);
    out.push(current);

    for value in &values[period..] {
        current = alpha * value + (1.0 - alpha) * current;
        out.push(current);
    }

    return Some(out);
}

fn rsi_from(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    return 100.0 - 100.0 / (1.0 + rs);
}

/// Relative strength index with Wilder smoothing. The first value covers
/// the first `period` price changes.
pub fn rsi(values: &[f64], period: usize) -> Option<Vec<f64>> {
    if period == 0 || values.len() <= period {
        return None;
    }

    let changes = values
        .windows(2)
        .map(|pair| return pair[1] - pair[0])
        .collect::<Vec<f64>>();

    let p = period as f64;
    let mut avg_gain = changes[..period].iter().map(|c| return c.max(0.0)).sum::<f64>() / p;
    let mut avg_loss = changes[..period].iter().map(|c| return (-c).max(0.0)).sum::<f64>() / p;

    let mut out = vec![rsi_from(avg_gain, avg_loss)];
    for change in &changes[period..] {
        avg_gain = (avg_gain * (p - 1.0) + change.max(0.0)) / p;
        avg_loss = (avg_loss * (p - 1.0) + (-change).max(0.0)) / p;
        out.push(rsi_from(avg_gain, avg_loss));
    }

    return Some(out);
}

/// Change from `from` to `to` in percent.
pub fn percent_change(from: f64, to: f64) -> Option<f64> {
    if from == 0.0 || !from.is_finite() || !to.is_finite() {
        return None;
    }

    return Some((to - from) / from.abs() * 100.0);
}

/// Period over period simple returns as fractions.
pub fn returns(values: &[f64]) -> Option<Vec<f64>> {
    if values.len() < 2 {
        return None;
    }

    return values
        .windows(2)
        .map(|pair| {
            if pair[0] == 0.0 {
                return None;
            }
            return Some((pair[1] - pair[0]) / pair[0]);
        })
        .collect();
}

pub fn cagr(start_value: f64, end_value: f64, years: f64) -> Option<f64> {
    if start_value <= 0.0 || end_value < 0.0 || years <= 0.0 {
        return None;
    }

    return Some((end_value / start_value).powf(1.0 / years) - 1.0);
}

/// Annualised Sharpe ratio of per-period `returns`, with `risk_free_rate`
/// given as an annual fraction.
pub fn sharpe_ratio(returns: &[f64], risk_free_rate: f64) -> Option<f64> {
    if returns.len() < 2 {
        return None;
    }

    let period_rate = risk_free_rate / TRADING_DAYS_PER_YEAR;
    let excess = returns
        .iter()
        .map(|r| return r - period_rate)
        .collect::<Vec<f64>>();

    let deviation = variance(&excess).sqrt();
    if deviation == 0.0 || !deviation.is_finite() {
        return None;
    }

    return Some(mean(&excess) / deviation * TRADING_DAYS_PER_YEAR.sqrt());
}

pub fn beta(asset_returns: &[f64], market_returns: &[f64]) -> Option<f64> {
    if asset_returns.len() != market_returns.len() || asset_returns.len() < 2 {
        return None;
    }

    let market_variance = variance(market_returns);
    if market_variance == 0.0 {
        return None;
    }

    return Some(covariance(asset_returns, market_returns) / market_variance);
}

/// Largest peak to trough decline as a positive fraction (0.25 is 25%).
pub fn max_drawdown(values: &[f64]) -> Option<f64> {
    let first = *values.first()?;

    let mut peak = first;
    let mut worst: f64 = 0.0;
    for value in values {
        if *value > peak {
            peak = *value;
        }
        if peak > 0.0 {
            worst = worst.max((peak - value) / peak);
        }
    }

    return Some(worst);
}
