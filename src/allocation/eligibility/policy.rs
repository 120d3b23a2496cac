use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Rounds a currency amount to whole units, ties to the even neighbour.
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
}

/// Why a facility could not take a loan. Recorded for the decision trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectionReason {
    Unprofitable {
        expected_yield: Decimal,
    },
    InsufficientCapacity {
        requested: Decimal,
        remaining: Decimal,
    },
    RiskTolerance {
        default_chance: Decimal,
        tolerance: Decimal,
    },
    BannedState {
        state: String,
    },
    /// The yield, or the facility's running total, does not fit in a `Decimal`.
    YieldOutOfRange {
        amount: Decimal,
    },
}

impl RejectionReason {
    pub fn summary(&self) -> String {
        match self {
            RejectionReason::Unprofitable { expected_yield } => {
                format!("expected yield {expected_yield} is negative")
            }
            RejectionReason::InsufficientCapacity {
                requested,
                remaining,
            } => format!("requested {requested} exceeds remaining capacity {remaining}"),
            RejectionReason::RiskTolerance {
                default_chance,
                tolerance,
            } => format!("default likelihood {default_chance} above covenant tolerance {tolerance}"),
            RejectionReason::BannedState { state } => {
                format!("covenant bans lending in {state}")
            }
            RejectionReason::YieldOutOfRange { amount } => {
                format!("expected yield on {amount} is outside the decimal range")
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RejectionReason::Unprofitable { .. } => "profitability",
            RejectionReason::InsufficientCapacity { .. } => "capacity",
            RejectionReason::RiskTolerance { .. } => "risk",
            RejectionReason::BannedState { .. } => "state",
            RejectionReason::YieldOutOfRange { .. } => "yield_range",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn half_units_round_to_even() {
        assert_eq!(round_currency(dec!(0.5)), dec!(0));
        assert_eq!(round_currency(dec!(1.5)), dec!(2));
        assert_eq!(round_currency(dec!(2.5)), dec!(2));
        assert_eq!(round_currency(dec!(-0.5)), dec!(0));
        assert_eq!(round_currency(dec!(-1.5)), dec!(-2));
    }

    #[test]
    fn non_midpoints_round_to_nearest() {
        assert_eq!(round_currency(dec!(0.4999)), dec!(0));
        assert_eq!(round_currency(dec!(0.5001)), dec!(1));
        assert_eq!(round_currency(dec!(-0.5001)), dec!(-1));
    }

    #[test]
    fn summaries_name_the_failing_values() {
        let reason = RejectionReason::InsufficientCapacity {
            requested: dec!(60),
            remaining: dec!(50),
        };
        assert_eq!(
            reason.summary(),
            "requested 60 exceeds remaining capacity 50"
        );
        assert_eq!(reason.label(), "capacity");
    }
}
