//! Naive position sizing
//!
//! Size is a fixed risk budget divided by the distance to the stop. The result
//! is advisory text for a human, never an order parameter.

use serde::Serialize;

use crate::models::format_price;

/// Risk budget per trade, in USDT
pub const RISK_USDT: f64 = 15.0;

/// Suggested position size for one alert
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PositionSize {
    /// Risk budget used for the calculation
    pub risk: f64,
    /// `|close - stop|`, or 0 when either price is unknown
    pub distance: f64,
    /// `risk / distance`, or 0 when the distance is not positive
    pub size: f64,
}

impl PositionSize {
    /// Size a position with the fixed [`RISK_USDT`] budget.
    ///
    /// Unknown prices fall back to a zero size here, while the prompt still
    /// shows them as `?`.
    pub fn compute(close: f64, stop: f64) -> Self {
        Self::with_risk(RISK_USDT, close, stop)
    }

    /// Size a position with an explicit risk budget.
    pub fn with_risk(risk: f64, close: f64, stop: f64) -> Self {
        let distance = if close.is_finite() && stop.is_finite() {
            (close - stop).abs()
        } else {
            0.0
        };
        let size = if distance > 0.0 { risk / distance } else { 0.0 };

        Self {
            risk,
            distance,
            size,
        }
    }

    /// Size for display, `?` when the division overflowed
    pub fn display_size(&self) -> String {
        format_price(self.size)
    }

    /// Risk budget for display
    pub fn display_risk(&self) -> String {
        format_price(self.risk)
    }
}
