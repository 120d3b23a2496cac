//! Greedy loan-to-facility allocation.
//!
//! Facilities are ranked once by cost, then every loan is offered to them in
//! that order until one passes the eligibility checks. The first passing
//! facility absorbs the whole loan; a loan no facility accepts stays
//! unassigned.

pub mod allocator;
pub mod domain;
pub mod eligibility;
pub mod ranking;
pub mod report;
pub mod store;

#[cfg(test)]
mod tests;

pub use allocator::{Allocator, FacilityRejection, LoanDecision, Placement};
pub use domain::{Bank, BankId, Covenant, Facility, FacilityId, Loan, LoanId};
pub use eligibility::{
    check_amount, evaluate, expected_yield, round_currency, Eligibility, RejectionReason,
};
pub use ranking::FacilityRanking;
pub use report::{AllocationSummary, AssignmentRow, FacilityUtilisation, YieldRow};
pub use store::EntityStore;
