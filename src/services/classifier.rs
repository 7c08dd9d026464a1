//! Signal classifier: turns an indicator snapshot into a discrete
//! recommendation with ranked reasons.
//!
//! Three independent checks vote bullish/bearish/neutral: momentum (RSI),
//! trend (MACD crossover) and band position (Bollinger). A unanimous
//! bullish vote yields STRONG_BUY, a bullish majority BUY; the sell side
//! is symmetric and ties resolve to NEUTRAL. Deterministic for a given
//! indicator input: the timestamp comes from the indicator set, not the
//! clock, and no randomness is involved anywhere.

use crate::error::{AppError, Result};
use crate::services::indicators::MIN_BARS;
use crate::types::{IndicatorSet, PriceSnapshot, Recommendation, Signal, Vote};

pub const RSI_OVERSOLD: f64 = 30.0;
pub const RSI_OVERBOUGHT: f64 = 70.0;

/// One technical check's vote and its human-readable reason.
///
/// Reasons never contain ", " — the planner joins them with that
/// delimiter.
struct Check {
    vote: Vote,
    reason: String,
}

fn momentum_check(indicators: &IndicatorSet) -> Check {
    if indicators.rsi < RSI_OVERSOLD {
        Check {
            vote: Vote::Bullish,
            reason: format!("RSI indicates oversold conditions at {:.1}", indicators.rsi),
        }
    } else if indicators.rsi > RSI_OVERBOUGHT {
        Check {
            vote: Vote::Bearish,
            reason: format!(
                "RSI indicates overbought conditions at {:.1}",
                indicators.rsi
            ),
        }
    } else {
        Check {
            vote: Vote::Neutral,
            reason: format!("RSI in neutral territory at {:.1}", indicators.rsi),
        }
    }
}

fn trend_check(indicators: &IndicatorSet) -> Check {
    if indicators.macd_line > indicators.macd_signal {
        Check {
            vote: Vote::Bullish,
            reason: "MACD bullish crossover".to_string(),
        }
    } else if indicators.macd_line < indicators.macd_signal {
        Check {
            vote: Vote::Bearish,
            reason: "MACD bearish crossover".to_string(),
        }
    } else {
        Check {
            vote: Vote::Neutral,
            reason: "MACD flat against its signal line".to_string(),
        }
    }
}

fn band_check(indicators: &IndicatorSet, close: f64) -> Check {
    if close < indicators.bollinger_lower {
        Check {
            vote: Vote::Bullish,
            reason: "Price below lower Bollinger band".to_string(),
        }
    } else if close > indicators.bollinger_upper {
        Check {
            vote: Vote::Bearish,
            reason: "Price above upper Bollinger band".to_string(),
        }
    } else {
        Check {
            vote: Vote::Neutral,
            reason: "Price within Bollinger bands".to_string(),
        }
    }
}

/// Aggregate vote counts into a recommendation. Unanimity is required
/// for the strong variants; ties resolve to NEUTRAL.
fn aggregate(bullish: usize, bearish: usize, total: usize) -> Recommendation {
    if bullish == total {
        Recommendation::StrongBuy
    } else if bearish == total {
        Recommendation::StrongSell
    } else if bullish > bearish {
        Recommendation::Buy
    } else if bearish > bullish {
        Recommendation::Sell
    } else {
        Recommendation::Neutral
    }
}

fn synthesize_explanation(recommendation: Recommendation, bullish: usize, bearish: usize, total: usize) -> String {
    match recommendation {
        Recommendation::StrongBuy => {
            format!("All {} technical checks agree on bullish momentum.", total)
        }
        Recommendation::StrongSell => {
            format!("All {} technical checks agree on bearish pressure.", total)
        }
        Recommendation::Buy => format!(
            "{} of {} technical checks lean bullish against {} bearish.",
            bullish, total, bearish
        ),
        Recommendation::Sell => format!(
            "{} of {} technical checks lean bearish against {} bullish.",
            bearish, total, bullish
        ),
        Recommendation::Neutral => format!(
            "Mixed signals: {} bullish and {} bearish of {} checks.",
            bullish, bearish, total
        ),
    }
}

/// Classify the latest indicator snapshot into a trading signal.
pub fn classify(indicators: &IndicatorSet, window: &[PriceSnapshot]) -> Result<Signal> {
    if window.len() < MIN_BARS {
        return Err(AppError::InsufficientData {
            symbol: indicators.symbol.clone(),
            have: window.len(),
            need: MIN_BARS,
        });
    }
    // compute() guarantees the window is non-empty here.
    let close = window[window.len() - 1].close;

    let checks = [
        momentum_check(indicators),
        trend_check(indicators),
        band_check(indicators, close),
    ];

    let bullish = checks.iter().filter(|c| c.vote == Vote::Bullish).count();
    let bearish = checks.iter().filter(|c| c.vote == Vote::Bearish).count();
    let recommendation = aggregate(bullish, bearish, checks.len());

    // Reasons that agree with the final direction, in check order.
    // Neutral reasons are surfaced only when the result itself is NEUTRAL.
    let agreeing = match recommendation {
        Recommendation::Buy | Recommendation::StrongBuy => Vote::Bullish,
        Recommendation::Sell | Recommendation::StrongSell => Vote::Bearish,
        Recommendation::Neutral => Vote::Neutral,
    };
    let reasons: Vec<String> = checks
        .iter()
        .filter(|c| c.vote == agreeing)
        .map(|c| c.reason.clone())
        .collect();

    let explanation = synthesize_explanation(recommendation, bullish, bearish, checks.len());

    Ok(Signal {
        symbol: indicators.symbol.clone(),
        timestamp: indicators.timestamp,
        recommendation,
        reasons,
        explanation,
    })
}
