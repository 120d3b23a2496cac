use std::collections::BTreeSet;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identifier of a lending bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BankId(pub u32);

/// Identifier of a credit facility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FacilityId(pub u32);

/// Identifier of a requested loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LoanId(pub u32);

impl fmt::Display for BankId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for FacilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for LoanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bank {
    pub id: BankId,
    pub name: String,
}

/// Credit line drawn down by committed loans.
///
/// `capacity` and `cost_rate` never change after load. `remaining`,
/// `loans` and `expected_yield` are only touched through [`Facility::commit`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facility {
    pub id: FacilityId,
    pub bank_id: BankId,
    pub capacity: Decimal,
    pub cost_rate: Decimal,
    remaining: Decimal,
    loans: Vec<LoanId>,
    expected_yield: Decimal,
}

impl Facility {
    pub fn new(id: FacilityId, bank_id: BankId, capacity: Decimal, cost_rate: Decimal) -> Self {
        Self {
            id,
            bank_id,
            capacity,
            cost_rate,
            remaining: capacity,
            loans: Vec::new(),
            expected_yield: Decimal::ZERO,
        }
    }

    pub fn remaining(&self) -> Decimal {
        self.remaining
    }

    pub fn loans(&self) -> &[LoanId] {
        &self.loans
    }

    pub fn expected_yield(&self) -> Decimal {
        self.expected_yield
    }

    /// Amount drawn so far (`capacity - remaining`).
    pub fn committed_amount(&self) -> Decimal {
        self.capacity - self.remaining
    }

    /// Applies a committed loan in one step so the three fields never disagree.
    pub(crate) fn commit(&mut self, loan: &Loan, expected_yield: Decimal) {
        self.loans.push(loan.id);
        self.remaining -= loan.amount;
        self.expected_yield += expected_yield;
    }
}

/// Lending restriction from a bank, scoped to one facility or to all of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Covenant {
    pub bank_id: BankId,
    pub facility_id: Option<FacilityId>,
    /// `None` means no limit on default likelihood.
    pub default_tolerance: Option<Decimal>,
    pub banned_states: BTreeSet<String>,
}

impl Covenant {
    pub fn is_general(&self) -> bool {
        self.facility_id.is_none()
    }

    pub fn tolerates(&self, default_chance: Decimal) -> bool {
        match self.default_tolerance {
            Some(tolerance) => default_chance <= tolerance,
            None => true,
        }
    }

    pub fn bans(&self, state: &str) -> bool {
        self.banned_states.contains(state.trim())
    }
}

/// Loan request evaluated once against the facility ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,
    pub state: String,
    pub amount: Decimal,
    pub rate: Decimal,
    pub default_chance: Decimal,
}
