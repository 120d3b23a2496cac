use rust_decimal_macros::dec;

use super::common::*;
use crate::allocation::{evaluate, Eligibility, EntityStore, FacilityId, RejectionReason};

#[test]
fn eligible_pair_carries_rounded_yield() {
    let store = single_facility_store();
    let facility = store.facility(FacilityId(1)).expect("facility");

    let verdict = evaluate(&store, &loan(1, dec!(100), "CA"), facility);

    assert_eq!(
        verdict,
        Eligibility::Eligible {
            expected_yield: dec!(7)
        }
    );
    assert!(verdict.is_eligible());
}

#[test]
fn profitability_is_checked_before_capacity() {
    let store = single_facility_store();
    let facility = store.facility(FacilityId(1)).expect("facility");

    let verdict = evaluate(&store, &risky_loan(1, dec!(1000), dec!(0.5)), facility);

    match verdict {
        Eligibility::Rejected(RejectionReason::Unprofitable { expected_yield }) => {
            assert!(expected_yield < dec!(0));
        }
        other => panic!("expected profitability rejection, got {other:?}"),
    }
}

#[test]
fn tolerance_boundary_is_inclusive() {
    let store = EntityStore::build(
        vec![bank(1, "Chase")],
        vec![facility(1, 1, dec!(1000), dec!(0.01))],
        vec![specific_covenant(1, 1, Some(dec!(0.02)), &[])],
    );
    let facility = store.facility(FacilityId(1)).expect("facility");

    assert!(evaluate(&store, &risky_loan(1, dec!(100), dec!(0.02)), facility).is_eligible());
    assert!(!evaluate(&store, &risky_loan(2, dec!(100), dec!(0.021)), facility).is_eligible());
}

#[test]
fn empty_tolerance_does_not_reject() {
    let store = EntityStore::build(
        vec![bank(1, "Chase")],
        vec![facility(1, 1, dec!(1000), dec!(0.01))],
        vec![general_covenant(1, None, &["VT"])],
    );
    let facility = store.facility(FacilityId(1)).expect("facility");

    assert!(evaluate(&store, &risky_loan(1, dec!(100), dec!(0.04)), facility).is_eligible());
}

#[test]
fn zero_tolerance_rejects_any_default_risk() {
    let store = EntityStore::build(
        vec![bank(1, "Chase")],
        vec![facility(1, 1, dec!(1000), dec!(0.01))],
        vec![general_covenant(1, Some(dec!(0)), &[])],
    );
    let facility = store.facility(FacilityId(1)).expect("facility");

    assert_eq!(
        evaluate(&store, &risky_loan(1, dec!(100), dec!(0.01)), facility),
        Eligibility::Rejected(RejectionReason::RiskTolerance {
            default_chance: dec!(0.01),
            tolerance: dec!(0),
        })
    );
}

#[test]
fn other_banks_covenants_do_not_apply() {
    let store = EntityStore::build(
        vec![bank(1, "Chase"), bank(2, "Wells Fargo")],
        vec![facility(1, 1, dec!(1000), dec!(0.01))],
        vec![
            general_covenant(2, Some(dec!(0)), &["CA"]),
            specific_covenant(2, 9, Some(dec!(0)), &["CA"]),
        ],
    );
    let facility = store.facility(FacilityId(1)).expect("facility");

    assert!(evaluate(&store, &loan(1, dec!(100), "CA"), facility).is_eligible());
}

#[test]
fn specific_ban_applies_only_to_its_facility() {
    let store = EntityStore::build(
        vec![bank(1, "Chase")],
        vec![
            facility(1, 1, dec!(1000), dec!(0.01)),
            facility(2, 1, dec!(1000), dec!(0.01)),
        ],
        vec![specific_covenant(1, 1, None, &["NY"])],
    );
    let banned = store.facility(FacilityId(1)).expect("facility 1");
    let open = store.facility(FacilityId(2)).expect("facility 2");
    let request = loan(1, dec!(100), "NY ");

    assert_eq!(
        evaluate(&store, &request, banned),
        Eligibility::Rejected(RejectionReason::BannedState {
            state: "NY".to_string()
        })
    );
    assert!(evaluate(&store, &request, open).is_eligible());
}
