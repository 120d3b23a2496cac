use rust_decimal::Decimal;

use super::super::domain::{Covenant, Facility, Loan};
use super::policy::{round_currency, RejectionReason};

/// Unrounded yield of `loan` when funded at `cost_rate`:
/// `(1 - p) * rate * amount - p * amount - cost_rate * amount`.
///
/// `None` when an intermediate product leaves the `Decimal` range.
pub fn expected_yield(loan: &Loan, cost_rate: Decimal) -> Option<Decimal> {
    let p = loan.default_chance;
    let amount = loan.amount;
    let interest = Decimal::ONE
        .checked_sub(p)?
        .checked_mul(loan.rate)?
        .checked_mul(amount)?;
    let losses = p.checked_mul(amount)?;
    let funding = cost_rate.checked_mul(amount)?;
    interest.checked_sub(losses)?.checked_sub(funding)
}

/// True when `remaining` can absorb `amount`; exact consumption is allowed.
pub fn check_amount(amount: Decimal, remaining: Decimal) -> bool {
    matches!(remaining.checked_sub(amount), Some(left) if left >= Decimal::ZERO)
}

/// Rounded yield of `loan` on `facility`. The facility's running yield must
/// still fit once this loan is booked.
pub(crate) fn profitability(loan: &Loan, facility: &Facility) -> Result<Decimal, RejectionReason> {
    let out_of_range = || RejectionReason::YieldOutOfRange {
        amount: loan.amount,
    };
    let raw = expected_yield(loan, facility.cost_rate).ok_or_else(out_of_range)?;
    let rounded = round_currency(raw);
    if rounded < Decimal::ZERO {
        return Err(RejectionReason::Unprofitable {
            expected_yield: rounded,
        });
    }
    facility
        .expected_yield()
        .checked_add(rounded)
        .ok_or_else(out_of_range)?;
    Ok(rounded)
}

pub(crate) fn capacity(loan: &Loan, facility: &Facility) -> Result<(), RejectionReason> {
    if check_amount(loan.amount, facility.remaining()) {
        Ok(())
    } else {
        Err(RejectionReason::InsufficientCapacity {
            requested: loan.amount,
            remaining: facility.remaining(),
        })
    }
}

pub(crate) fn risk<'a>(
    loan: &Loan,
    covenants: impl IntoIterator<Item = &'a Covenant>,
) -> Result<(), RejectionReason> {
    for covenant in covenants {
        if !covenant.tolerates(loan.default_chance) {
            return Err(RejectionReason::RiskTolerance {
                default_chance: loan.default_chance,
                tolerance: covenant.default_tolerance.unwrap_or_default(),
            });
        }
    }
    Ok(())
}

pub(crate) fn state_ban<'a>(
    loan: &Loan,
    covenants: impl IntoIterator<Item = &'a Covenant>,
) -> Result<(), RejectionReason> {
    let state = loan.state.trim();
    if covenants.into_iter().any(|covenant| covenant.bans(state)) {
        return Err(RejectionReason::BannedState {
            state: state.to_string(),
        });
    }
    Ok(())
}
