//! Dashboard roster: one row per bed.

use super::aggregate::PatientView;
use crate::{Bed, BedStatus, Gender, SapsScore};
use serde::Serialize;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use ward_types::{BedId, NonEmptyText, PatientId};

/// Patient fields shown on a roster row. Problems and pending tasks are not included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterPatient {
    pub id: PatientId,
    pub name: NonEmptyText,
    pub age: u32,
    pub gender: Gender,
    pub main_diagnosis: NonEmptyText,
    pub diagnosis_code: Option<String>,
    pub days_hospitalized: u32,
    pub saps_score: Option<SapsScore>,
}

impl From<&PatientView> for RosterPatient {
    fn from(view: &PatientView) -> Self {
        Self {
            id: view.id,
            name: view.name.clone(),
            age: view.age,
            gender: view.gender,
            main_diagnosis: view.main_diagnosis.clone(),
            diagnosis_code: view.diagnosis_code.clone(),
            days_hospitalized: view.days_hospitalized,
            saps_score: view.saps_score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BedRow {
    pub id: BedId,
    pub bed_number: NonEmptyText,
    pub wing: NonEmptyText,
    pub floor: i32,
    pub status: BedStatus,
    pub patient: Option<RosterPatient>,
}

/// Lays out `active_views` over `all_beds`, ordered by bed number.
///
/// Every distinct bed yields exactly one row. A bed claimed by a view takes that view's status;
/// any other bed is `available` with no patient. Views that cannot be placed (bed unknown, or
/// bed already claimed by an earlier view) are dropped and logged.
pub fn build_roster(all_beds: &[Bed], active_views: &[PatientView]) -> Vec<BedRow> {
    let known: HashSet<BedId> = all_beds.iter().map(|b| b.id).collect();
    let mut occupants: HashMap<BedId, &PatientView> = HashMap::with_capacity(active_views.len());

    for view in active_views {
        let Some(bed) = &view.bed else {
            continue;
        };

        if !known.contains(&bed.id) {
            tracing::warn!(
                patient_id = %view.id,
                bed_id = %bed.id,
                "active patient assigned to unknown bed; omitted from roster"
            );
            continue;
        }

        match occupants.entry(bed.id) {
            Entry::Occupied(existing) => {
                tracing::warn!(
                    patient_id = %view.id,
                    occupant_id = %existing.get().id,
                    bed_id = %bed.id,
                    "bed already has an active occupant; omitted from roster"
                );
            }
            Entry::Vacant(slot) => {
                slot.insert(view);
            }
        }
    }

    let mut seen: HashSet<BedId> = HashSet::with_capacity(all_beds.len());
    let mut rows: Vec<BedRow> = all_beds
        .iter()
        .filter(|bed| seen.insert(bed.id))
        .map(|bed| match occupants.get(&bed.id) {
            Some(view) => BedRow {
                id: bed.id,
                bed_number: bed.bed_number.clone(),
                wing: bed.wing.clone(),
                floor: bed.floor,
                status: view.status,
                patient: Some(RosterPatient::from(*view)),
            },
            None => BedRow {
                id: bed.id,
                bed_number: bed.bed_number.clone(),
                wing: bed.wing.clone(),
                floor: bed.floor,
                status: BedStatus::Available,
                patient: None,
            },
        })
        .collect();

    rows.sort_by(|a, b| a.bed_number.cmp(&b.bed_number).then(a.id.cmp(&b.id)));
    rows
}
