mod policy;
mod rules;

pub use policy::{round_currency, RejectionReason};
pub use rules::{check_amount, expected_yield};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::domain::{Facility, Loan};
use super::store::EntityStore;

/// Result of running every check for one (loan, facility) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Eligibility {
    /// All checks passed. Carries the rounded yield the commit will book.
    Eligible { expected_yield: Decimal },
    Rejected(RejectionReason),
}

impl Eligibility {
    pub fn is_eligible(&self) -> bool {
        matches!(self, Eligibility::Eligible { .. })
    }
}

/// Runs profitability, capacity, risk and state-ban checks in that order,
/// stopping at the first failure. Reads facility state, never writes it.
pub fn evaluate(store: &EntityStore, loan: &Loan, facility: &Facility) -> Eligibility {
    match run_checks(store, loan, facility) {
        Ok(expected_yield) => Eligibility::Eligible { expected_yield },
        Err(reason) => Eligibility::Rejected(reason),
    }
}

fn run_checks(
    store: &EntityStore,
    loan: &Loan,
    facility: &Facility,
) -> Result<Decimal, RejectionReason> {
    let expected_yield = rules::profitability(loan, facility)?;
    rules::capacity(loan, facility)?;
    rules::risk(loan, store.applicable_covenants(facility))?;
    rules::state_ban(loan, store.applicable_covenants(facility))?;
    Ok(expected_yield)
}
