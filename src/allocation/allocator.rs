use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use super::domain::{FacilityId, Loan, LoanId};
use super::eligibility::{self, Eligibility, RejectionReason};
use super::ranking::FacilityRanking;
use super::store::EntityStore;

/// Terminal state of a loan after the facility search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Placement {
    Committed {
        facility_id: FacilityId,
        expected_yield: Decimal,
    },
    Unassigned,
}

/// A facility that was tried and turned the loan down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilityRejection {
    pub facility_id: FacilityId,
    pub reason: RejectionReason,
}

/// Outcome recorded for every loan, in the order loans were allocated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanDecision {
    pub loan_id: LoanId,
    pub amount: Decimal,
    pub placement: Placement,
    pub rejections: Vec<FacilityRejection>,
}

impl LoanDecision {
    pub fn facility_id(&self) -> Option<FacilityId> {
        match self.placement {
            Placement::Committed { facility_id, .. } => Some(facility_id),
            Placement::Unassigned => None,
        }
    }

    pub fn is_assigned(&self) -> bool {
        matches!(self.placement, Placement::Committed { .. })
    }
}

/// Greedy single-pass allocator.
///
/// Each loan walks the cost ranking from the cheapest facility and is
/// committed to the first one that passes every eligibility check. Rejected
/// candidates are never revisited for that loan and committed loans are never
/// moved. The allocator is the only writer of facility state.
#[derive(Debug, Clone)]
pub struct Allocator {
    store: EntityStore,
    ranking: FacilityRanking,
    decisions: Vec<LoanDecision>,
}

impl Allocator {
    pub fn new(store: EntityStore) -> Self {
        let ranking = FacilityRanking::from_facilities(store.facilities());
        Self {
            store,
            ranking,
            decisions: Vec::new(),
        }
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn ranking(&self) -> &FacilityRanking {
        &self.ranking
    }

    pub fn decisions(&self) -> &[LoanDecision] {
        &self.decisions
    }

    /// Allocates loans in iteration order.
    pub fn allocate_all(&mut self, loans: impl IntoIterator<Item = Loan>) {
        for loan in loans {
            self.allocate(&loan);
        }
    }

    pub fn allocate(&mut self, loan: &Loan) -> &LoanDecision {
        let mut rejections = Vec::new();
        let mut placement = Placement::Unassigned;

        for &facility_id in self.ranking.ids() {
            // The ranking is built from the store's own facilities.
            let Some(facility) = self.store.facility(facility_id) else {
                continue;
            };

            match eligibility::evaluate(&self.store, loan, facility) {
                Eligibility::Eligible { expected_yield } => {
                    placement = Placement::Committed {
                        facility_id,
                        expected_yield,
                    };
                    break;
                }
                Eligibility::Rejected(reason) => {
                    trace!(
                        loan_id = %loan.id,
                        %facility_id,
                        check = reason.label(),
                        "facility rejected loan"
                    );
                    rejections.push(FacilityRejection {
                        facility_id,
                        reason,
                    });
                }
            }
        }

        match placement {
            Placement::Committed {
                facility_id,
                expected_yield,
            } => {
                if let Some(facility) = self.store.facility_mut(facility_id) {
                    facility.commit(loan, expected_yield);
                    debug!(
                        loan_id = %loan.id,
                        %facility_id,
                        %expected_yield,
                        remaining = %facility.remaining(),
                        "loan committed"
                    );
                }
            }
            Placement::Unassigned => {
                info!(
                    loan_id = %loan.id,
                    amount = %loan.amount,
                    candidates = rejections.len(),
                    "no facility eligible for loan"
                );
            }
        }

        self.decisions.push(LoanDecision {
            loan_id: loan.id,
            amount: loan.amount,
            placement,
            rejections,
        });
        &self.decisions[self.decisions.len() - 1]
    }

    /// Consumes the allocator, handing back final facility state and decisions.
    pub fn finish(self) -> (EntityStore, Vec<LoanDecision>) {
        (self.store, self.decisions)
    }
}
