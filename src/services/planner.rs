//! Entry/exit calculator: turns a signal, the current price and a
//! volatility measure into a concrete trade setup.
//!
//! Offsets are the ATR-like volatility scaled by a conviction multiplier:
//! stronger recommendations get a tighter stop and a wider target. All
//! prices are rounded to the Naira minor unit (2 decimals) once, at
//! output.

use crate::error::{AppError, Result};
use crate::types::{EntryExitPlan, Recommendation, Signal};

/// Delimiter used to join reasons into the justification. The classifier
/// guarantees reasons never contain it.
pub const REASON_DELIMITER: &str = ", ";

/// (stop multiplier, take-profit multiplier) per recommendation strength.
fn multipliers(recommendation: Recommendation) -> Option<(f64, f64)> {
    match recommendation {
        Recommendation::StrongBuy | Recommendation::StrongSell => Some((0.8, 3.0)),
        Recommendation::Buy | Recommendation::Sell => Some((1.0, 2.0)),
        Recommendation::Neutral => None,
    }
}

/// Round to the Naira minor unit.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Compute an entry/exit plan for a signal at the current price.
///
/// NEUTRAL signals fail with `NoActionableSetup` — the caller represents
/// "no plan" as absence, never as a zeroed plan. A volatility that would
/// put the stop at the entry fails with `DegenerateRisk`.
pub fn plan(signal: &Signal, current_price: f64, volatility: f64) -> Result<EntryExitPlan> {
    let Some((stop_mult, target_mult)) = multipliers(signal.recommendation) else {
        return Err(AppError::NoActionableSetup(format!(
            "{}: neutral recommendation has no entry/exit setup",
            signal.symbol
        )));
    };

    if !current_price.is_finite() || current_price <= 0.0 {
        return Err(AppError::DegenerateRisk(format!(
            "{}: invalid current price {}",
            signal.symbol, current_price
        )));
    }

    if !volatility.is_finite() || volatility <= 0.0 {
        return Err(AppError::DegenerateRisk(format!(
            "{}: volatility {} leaves no room between stop-loss and entry",
            signal.symbol, volatility
        )));
    }

    // Bullish: risk below, reward above. Bearish is the short setup with
    // the inequality inverted.
    let (stop_loss, take_profit) = if signal.recommendation.is_bullish() {
        (
            current_price - volatility * stop_mult,
            current_price + volatility * target_mult,
        )
    } else {
        (
            current_price + volatility * stop_mult,
            current_price - volatility * target_mult,
        )
    };

    let price = round2(current_price);
    let stop_loss = round2(stop_loss);
    let take_profit = round2(take_profit);

    // Rounding must not collapse the risk to zero.
    if stop_loss == price {
        return Err(AppError::DegenerateRisk(format!(
            "{}: stop-loss equals entry at {}",
            signal.symbol, price
        )));
    }

    // Offsets are absolute ATR multiples; on a low-priced stock a large
    // ATR can push a level through zero. Naira prices are positive.
    if stop_loss <= 0.0 || take_profit <= 0.0 {
        return Err(AppError::DegenerateRisk(format!(
            "{}: volatility {} pushes a level below zero at price {}",
            signal.symbol, volatility, price
        )));
    }

    Ok(EntryExitPlan {
        symbol: signal.symbol.clone(),
        timestamp: signal.timestamp,
        recommendation: signal.recommendation,
        price,
        stop_loss,
        take_profit,
        justification: signal.reasons.join(REASON_DELIMITER),
    })
}
