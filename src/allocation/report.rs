use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::allocator::LoanDecision;
use super::domain::{FacilityId, LoanId};
use super::store::EntityStore;

/// One `assignments.csv` row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AssignmentRow {
    pub loan_id: LoanId,
    pub facility_id: Option<FacilityId>,
}

/// One `yields.csv` row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YieldRow {
    pub facility_id: FacilityId,
    pub expected_yield: Decimal,
}

/// Assignment rows in loan processing order.
pub fn assignments(decisions: &[LoanDecision]) -> Vec<AssignmentRow> {
    decisions
        .iter()
        .map(|decision| AssignmentRow {
            loan_id: decision.loan_id,
            facility_id: decision.facility_id(),
        })
        .collect()
}

/// Yield rows for every facility in ascending facility id.
pub fn yields(store: &EntityStore) -> Vec<YieldRow> {
    store
        .facilities()
        .map(|facility| YieldRow {
            facility_id: facility.id,
            expected_yield: whole_units(facility.expected_yield()),
        })
        .collect()
}

// Booked yields are already rounded, so the sum is integral. Printed without
// a scale and never as `-0`.
fn whole_units(value: Decimal) -> Decimal {
    let whole = value.trunc().normalize();
    if whole.is_zero() {
        Decimal::ZERO
    } else {
        whole
    }
}

fn checked_total(values: impl IntoIterator<Item = Decimal>) -> Option<Decimal> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |total, value| total.checked_add(value))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacilityUtilisation {
    pub facility_id: FacilityId,
    pub bank_name: Option<String>,
    pub capacity: Decimal,
    pub remaining: Decimal,
    pub loan_count: usize,
    pub expected_yield: Decimal,
}

/// Totals for a finished run, rendered as JSON by the CLI.
///
/// Run-wide totals are `None` when they do not fit in a `Decimal`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationSummary {
    pub generated_at: DateTime<Utc>,
    pub loans_processed: usize,
    pub loans_assigned: usize,
    pub loans_unassigned: usize,
    pub amount_assigned: Option<Decimal>,
    pub total_expected_yield: Option<Decimal>,
    pub facilities: Vec<FacilityUtilisation>,
}

impl AllocationSummary {
    pub fn build(store: &EntityStore, decisions: &[LoanDecision]) -> Self {
        let loans_assigned = decisions.iter().filter(|d| d.is_assigned()).count();
        let amount_assigned = checked_total(
            decisions
                .iter()
                .filter(|d| d.is_assigned())
                .map(|d| d.amount),
        );

        let facilities: Vec<FacilityUtilisation> = store
            .facilities()
            .map(|facility| FacilityUtilisation {
                facility_id: facility.id,
                bank_name: store.bank(facility.bank_id).map(|bank| bank.name.clone()),
                capacity: facility.capacity,
                remaining: facility.remaining(),
                loan_count: facility.loans().len(),
                expected_yield: whole_units(facility.expected_yield()),
            })
            .collect();

        Self {
            generated_at: Utc::now(),
            loans_processed: decisions.len(),
            loans_assigned,
            loans_unassigned: decisions.len() - loans_assigned,
            amount_assigned,
            total_expected_yield: checked_total(facilities.iter().map(|row| row.expected_yield)),
            facilities,
        }
    }
}
