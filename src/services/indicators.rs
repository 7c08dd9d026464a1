//! Technical indicator computation over a snapshot window.
//!
//! RSI(14) with Wilder smoothing, MACD(12, 26, 9), Bollinger(20, 2.0) and
//! ATR(14). All pure functions of the window; recomputed each cycle.

use crate::error::{AppError, Result};
use crate::types::{IndicatorSet, PriceSnapshot};

pub const RSI_PERIOD: usize = 14;
pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;
pub const BOLLINGER_PERIOD: usize = 20;
pub const BOLLINGER_STD_DEV: f64 = 2.0;
pub const ATR_PERIOD: usize = 14;

/// Minimum bars required for a full indicator set. MACD is the slowest:
/// slow EMA plus its signal EMA.
pub const MIN_BARS: usize = MACD_SLOW + MACD_SIGNAL;

impl IndicatorSet {
    /// Compute the full indicator set from a window, oldest bar first.
    ///
    /// Fails with `InsufficientData` when the window is shorter than
    /// [`MIN_BARS`]; the caller skips classification for the symbol this
    /// cycle and keeps its prior signal.
    pub fn compute(window: &[PriceSnapshot]) -> Result<IndicatorSet> {
        let Some(last) = window.last() else {
            return Err(AppError::InsufficientData {
                symbol: String::new(),
                have: 0,
                need: MIN_BARS,
            });
        };

        if window.len() < MIN_BARS {
            return Err(AppError::InsufficientData {
                symbol: last.symbol.clone(),
                have: window.len(),
                need: MIN_BARS,
            });
        }

        let closes: Vec<f64> = window.iter().map(|s| s.close).collect();

        let rsi = rsi(&closes, RSI_PERIOD);
        let (macd_line, macd_signal) = macd(&closes, MACD_FAST, MACD_SLOW, MACD_SIGNAL);
        let (bollinger_upper, bollinger_mid, bollinger_lower) =
            bollinger(&closes, BOLLINGER_PERIOD, BOLLINGER_STD_DEV);
        let atr = atr(window, ATR_PERIOD);

        Ok(IndicatorSet {
            symbol: last.symbol.clone(),
            timestamp: last.timestamp,
            rsi,
            macd_line,
            macd_signal,
            bollinger_upper,
            bollinger_mid,
            bollinger_lower,
            atr,
        })
    }
}

/// RSI with Wilder smoothing. Assumes `closes.len() > period`.
fn rsi(closes: &[f64], period: usize) -> f64 {
    let mut gains = Vec::with_capacity(closes.len() - 1);
    let mut losses = Vec::with_capacity(closes.len() - 1);

    for pair in closes.windows(2) {
        let change = pair[1] - pair[0];
        if change > 0.0 {
            gains.push(change);
            losses.push(0.0);
        } else {
            gains.push(0.0);
            losses.push(-change);
        }
    }

    let mut avg_gain: f64 = gains.iter().take(period).sum::<f64>() / period as f64;
    let mut avg_loss: f64 = losses.iter().take(period).sum::<f64>() / period as f64;

    for i in period..gains.len() {
        avg_gain = (avg_gain * (period - 1) as f64 + gains[i]) / period as f64;
        avg_loss = (avg_loss * (period - 1) as f64 + losses[i]) / period as f64;
    }

    if avg_loss == 0.0 {
        return 100.0;
    }

    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}

/// EMA series for a value slice. First EMA is the SMA of the first
/// `period` values.
fn ema_series(values: &[f64], period: usize) -> Vec<f64> {
    if values.len() < period {
        return Vec::new();
    }

    let multiplier = 2.0 / (period as f64 + 1.0);
    let mut ema = Vec::with_capacity(values.len() - period + 1);

    let sma: f64 = values.iter().take(period).sum::<f64>() / period as f64;
    ema.push(sma);

    for value in &values[period..] {
        let prev = *ema.last().unwrap_or(&sma);
        ema.push((value - prev) * multiplier + prev);
    }

    ema
}

/// MACD line and its signal line. Assumes enough bars for both EMAs.
fn macd(closes: &[f64], fast: usize, slow: usize, signal: usize) -> (f64, f64) {
    let fast_ema = ema_series(closes, fast);
    let slow_ema = ema_series(closes, slow);

    // The fast EMA series starts earlier; align on the slow one.
    let offset = slow - fast;
    let macd_line: Vec<f64> = fast_ema
        .iter()
        .skip(offset)
        .zip(slow_ema.iter())
        .map(|(f, s)| f - s)
        .collect();

    let signal_line = ema_series(&macd_line, signal);

    let line = macd_line.last().copied().unwrap_or(0.0);
    let sig = signal_line.last().copied().unwrap_or(line);
    (line, sig)
}

/// Bollinger bands: (upper, middle, lower) over the trailing period.
fn bollinger(closes: &[f64], period: usize, std_dev_multiplier: f64) -> (f64, f64, f64) {
    let tail = &closes[closes.len() - period..];
    let middle = tail.iter().sum::<f64>() / period as f64;

    let variance = tail.iter().map(|c| (c - middle).powi(2)).sum::<f64>() / period as f64;
    let std_dev = variance.sqrt();

    (
        middle + std_dev_multiplier * std_dev,
        middle,
        middle - std_dev_multiplier * std_dev,
    )
}

/// Average true range with Wilder smoothing.
fn atr(window: &[PriceSnapshot], period: usize) -> f64 {
    let mut true_ranges = Vec::with_capacity(window.len() - 1);
    for pair in window.windows(2) {
        let (prev, cur) = (&pair[0], &pair[1]);
        let hl = cur.high - cur.low;
        let hc = (cur.high - prev.close).abs();
        let lc = (cur.low - prev.close).abs();
        true_ranges.push(hl.max(hc).max(lc));
    }

    let take = period.min(true_ranges.len());
    let mut atr = true_ranges.iter().take(take).sum::<f64>() / take as f64;
    for tr in true_ranges.iter().skip(take) {
        atr = (atr * (period - 1) as f64 + tr) / period as f64;
    }
    atr
}
