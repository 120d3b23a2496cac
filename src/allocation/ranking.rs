use super::domain::{Facility, FacilityId};

/// Facility ids ordered by ascending cost rate, ties broken by ascending id.
///
/// Built once per run from static facility data; the order never changes
/// while loans are being allocated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacilityRanking {
    order: Vec<FacilityId>,
}

impl FacilityRanking {
    pub fn from_facilities<'a>(facilities: impl IntoIterator<Item = &'a Facility>) -> Self {
        let mut keyed: Vec<_> = facilities
            .into_iter()
            .map(|facility| (facility.cost_rate, facility.id))
            .collect();
        keyed.sort();

        Self {
            order: keyed.into_iter().map(|(_, id)| id).collect(),
        }
    }

    pub fn ids(&self) -> &[FacilityId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
