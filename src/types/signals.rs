//! Trading signal types: recommendations, signals, entry/exit plans and
//! the accuracy log records behind the confidence figure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Discrete trading recommendation.
///
/// Ordered by bullishness: `StrongSell < Sell < Neutral < Buy < StrongBuy`.
/// Serialises as the uppercase wire tokens (`STRONG_BUY`, ...) the
/// presentation layer pattern-matches for badge colouring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    StrongSell,
    Sell,
    Neutral,
    Buy,
    StrongBuy,
}

impl Recommendation {
    /// Parse a wire token, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "STRONG_BUY" => Some(Self::StrongBuy),
            "BUY" => Some(Self::Buy),
            "NEUTRAL" => Some(Self::Neutral),
            "SELL" => Some(Self::Sell),
            "STRONG_SELL" => Some(Self::StrongSell),
            _ => None,
        }
    }

    /// The exact uppercase wire token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StrongBuy => "STRONG_BUY",
            Self::Buy => "BUY",
            Self::Neutral => "NEUTRAL",
            Self::Sell => "SELL",
            Self::StrongSell => "STRONG_SELL",
        }
    }

    pub fn is_bullish(&self) -> bool {
        matches!(self, Self::Buy | Self::StrongBuy)
    }

    pub fn is_bearish(&self) -> bool {
        matches!(self, Self::Sell | Self::StrongSell)
    }
}

/// Directional vote from a single technical check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vote {
    Bullish,
    Bearish,
    Neutral,
}

/// The current trading signal for a symbol.
///
/// Superseded, never mutated, by each new computation; prior signals feed
/// the accuracy log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub symbol: String,
    pub timestamp: DateTime<Utc>,
    pub recommendation: Recommendation,
    /// Ordered reasons from the checks that agree with the recommendation's
    /// direction. Reasons never contain the ", " delimiter the planner
    /// joins them with.
    pub reasons: Vec<String>,
    /// One synthesized sentence summarising the vote outcome.
    pub explanation: String,
}

/// A concrete trade setup with defined risk and reward levels.
///
/// Invariants: bullish plans satisfy `stop_loss < price < take_profit`,
/// bearish plans invert the inequality (short setup), and `stop_loss`
/// never equals `price`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryExitPlan {
    pub symbol: String,
    pub timestamp: DateTime<Utc>,
    pub recommendation: Recommendation,
    /// Entry price, rounded to the Naira minor unit.
    pub price: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    /// The signal's reasons joined with ", ".
    pub justification: String,
}

/// Realized outcome of an earlier signal's plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RealizedOutcome {
    /// Price touched the take-profit level first.
    HitTakeProfit,
    /// Price touched the stop-loss level first.
    HitStopLoss,
    /// Neither level was touched within the resolution window.
    ExpiredNeutral,
}

impl RealizedOutcome {
    /// Whether the outcome counts as favorable for the accuracy ratio.
    pub fn is_favorable(&self) -> bool {
        matches!(self, Self::HitTakeProfit)
    }
}

/// Append-only record of a resolved recommendation. Never mutated once
/// written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccuracyRecord {
    pub id: Uuid,
    pub symbol: String,
    /// When the originating signal was computed.
    pub signal_timestamp: DateTime<Utc>,
    pub recommendation: Recommendation,
    pub outcome: RealizedOutcome,
    /// When the outcome was resolved.
    pub resolved_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommendation_wire_tokens() {
        assert_eq!(
            serde_json::to_string(&Recommendation::StrongBuy).unwrap(),
            "\"STRONG_BUY\""
        );
        assert_eq!(
            serde_json::to_string(&Recommendation::Neutral).unwrap(),
            "\"NEUTRAL\""
        );
        assert_eq!(
            serde_json::to_string(&Recommendation::StrongSell).unwrap(),
            "\"STRONG_SELL\""
        );
    }

    #[test]
    fn test_recommendation_round_trip() {
        for rec in [
            Recommendation::StrongSell,
            Recommendation::Sell,
            Recommendation::Neutral,
            Recommendation::Buy,
            Recommendation::StrongBuy,
        ] {
            let json = serde_json::to_string(&rec).unwrap();
            let back: Recommendation = serde_json::from_str(&json).unwrap();
            assert_eq!(rec, back);
            assert_eq!(Recommendation::parse(rec.as_str()), Some(rec));
        }
    }

    #[test]
    fn test_recommendation_parse_case_insensitive() {
        assert_eq!(
            Recommendation::parse("strong_buy"),
            Some(Recommendation::StrongBuy)
        );
        assert_eq!(Recommendation::parse("Sell"), Some(Recommendation::Sell));
        assert_eq!(Recommendation::parse("HOLD"), None);
    }

    #[test]
    fn test_recommendation_total_order_by_bullishness() {
        assert!(Recommendation::StrongSell < Recommendation::Sell);
        assert!(Recommendation::Sell < Recommendation::Neutral);
        assert!(Recommendation::Neutral < Recommendation::Buy);
        assert!(Recommendation::Buy < Recommendation::StrongBuy);
    }

    #[test]
    fn test_outcome_favorability() {
        assert!(RealizedOutcome::HitTakeProfit.is_favorable());
        assert!(!RealizedOutcome::HitStopLoss.is_favorable());
        assert!(!RealizedOutcome::ExpiredNeutral.is_favorable());
    }
}
