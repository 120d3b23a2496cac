use std::collections::{BTreeMap, HashMap};

use tracing::warn;

use super::domain::{Bank, BankId, Covenant, Facility, FacilityId};

/// Owns every facility and covenant for the lifetime of a run.
///
/// Covenants are indexed twice: by facility id for specific covenants and by
/// bank id for general ones. Each index keeps input order.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    banks: HashMap<BankId, Bank>,
    facilities: BTreeMap<FacilityId, Facility>,
    specific: HashMap<FacilityId, Vec<Covenant>>,
    general: HashMap<BankId, Vec<Covenant>>,
}

impl EntityStore {
    pub fn build(
        banks: impl IntoIterator<Item = Bank>,
        facilities: impl IntoIterator<Item = Facility>,
        covenants: impl IntoIterator<Item = Covenant>,
    ) -> Self {
        let banks: HashMap<BankId, Bank> = banks.into_iter().map(|bank| (bank.id, bank)).collect();
        let facilities: BTreeMap<FacilityId, Facility> = facilities
            .into_iter()
            .map(|facility| (facility.id, facility))
            .collect();

        let mut specific: HashMap<FacilityId, Vec<Covenant>> = HashMap::new();
        let mut general: HashMap<BankId, Vec<Covenant>> = HashMap::new();

        for covenant in covenants {
            match covenant.facility_id {
                Some(facility_id) => {
                    if !facilities.contains_key(&facility_id) {
                        warn!(%facility_id, "covenant references an unknown facility");
                    }
                    specific.entry(facility_id).or_default().push(covenant);
                }
                None => general.entry(covenant.bank_id).or_default().push(covenant),
            }
        }

        Self {
            banks,
            facilities,
            specific,
            general,
        }
    }

    pub fn bank(&self, id: BankId) -> Option<&Bank> {
        self.banks.get(&id)
    }

    pub fn facility(&self, id: FacilityId) -> Option<&Facility> {
        self.facilities.get(&id)
    }

    pub(crate) fn facility_mut(&mut self, id: FacilityId) -> Option<&mut Facility> {
        self.facilities.get_mut(&id)
    }

    /// Facilities in ascending id order.
    pub fn facilities(&self) -> impl Iterator<Item = &Facility> {
        self.facilities.values()
    }

    pub fn specific_covenants(&self, facility_id: FacilityId) -> &[Covenant] {
        self.specific
            .get(&facility_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn general_covenants(&self, bank_id: BankId) -> &[Covenant] {
        self.general.get(&bank_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Specific covenants of the facility followed by its bank's general ones.
    pub fn applicable_covenants<'a>(
        &'a self,
        facility: &Facility,
    ) -> impl Iterator<Item = &'a Covenant> + 'a {
        self.specific_covenants(facility.id)
            .iter()
            .chain(self.general_covenants(facility.bank_id))
    }
}
