use std::collections::BTreeSet;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::allocation::domain::{Bank, BankId, Covenant, Facility, FacilityId, Loan, LoanId};
use crate::allocation::store::EntityStore;

pub(super) fn bank(id: u32, name: &str) -> Bank {
    Bank {
        id: BankId(id),
        name: name.to_string(),
    }
}

pub(super) fn facility(id: u32, bank_id: u32, capacity: Decimal, cost_rate: Decimal) -> Facility {
    Facility::new(FacilityId(id), BankId(bank_id), capacity, cost_rate)
}

pub(super) fn loan(id: u32, amount: Decimal, state: &str) -> Loan {
    Loan {
        id: LoanId(id),
        state: state.to_string(),
        amount,
        rate: dec!(0.10),
        default_chance: dec!(0.01),
    }
}

pub(super) fn risky_loan(id: u32, amount: Decimal, default_chance: Decimal) -> Loan {
    Loan {
        default_chance,
        ..loan(id, amount, "CA")
    }
}

pub(super) fn general_covenant(
    bank_id: u32,
    tolerance: Option<Decimal>,
    banned: &[&str],
) -> Covenant {
    Covenant {
        bank_id: BankId(bank_id),
        facility_id: None,
        default_tolerance: tolerance,
        banned_states: banned.iter().map(|state| state.to_string()).collect::<BTreeSet<_>>(),
    }
}

pub(super) fn specific_covenant(
    bank_id: u32,
    facility_id: u32,
    tolerance: Option<Decimal>,
    banned: &[&str],
) -> Covenant {
    Covenant {
        facility_id: Some(FacilityId(facility_id)),
        ..general_covenant(bank_id, tolerance, banned)
    }
}

/// One facility, capacity 150 at cost 0.02, with no covenants.
pub(super) fn single_facility_store() -> EntityStore {
    EntityStore::build(
        vec![bank(1, "Chase")],
        vec![facility(1, 1, dec!(150), dec!(0.02))],
        Vec::new(),
    )
}

/// Two banks, three facilities, covenants at both scopes.
///
/// Ranking: facility 2 (0.01), facility 1 (0.03), facility 3 (0.06).
pub(super) fn two_bank_store() -> EntityStore {
    EntityStore::build(
        vec![bank(1, "Chase"), bank(2, "Bank of America")],
        vec![
            facility(1, 1, dec!(1000), dec!(0.03)),
            facility(2, 2, dec!(500), dec!(0.01)),
            facility(3, 1, dec!(5000), dec!(0.06)),
        ],
        vec![
            specific_covenant(2, 2, Some(dec!(0.05)), &[]),
            general_covenant(2, None, &["MT"]),
            general_covenant(1, Some(dec!(0.08)), &["TX"]),
        ],
    )
}
