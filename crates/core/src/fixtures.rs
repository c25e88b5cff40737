//! Record builders shared by unit tests.

use crate::{Bed, BedStatus, Gender, Patient, SapsScore};
use chrono::{DateTime, TimeZone, Utc};
use ward_types::{BedId, NonEmptyText, PatientId};

pub(crate) fn text(s: &str) -> NonEmptyText {
    NonEmptyText::new(s).unwrap()
}

pub(crate) fn admitted_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 1, 6, 0, 0).unwrap()
}

pub(crate) fn bed(id: u64, number: &str) -> Bed {
    Bed {
        id: BedId::new(id),
        bed_number: text(number),
        wing: text("North"),
        floor: 1,
        status: BedStatus::Available,
    }
}

pub(crate) fn patient(id: u64, bed_id: Option<u64>, saps: Option<u32>) -> Patient {
    Patient {
        id: PatientId::new(id),
        name: text(&format!("Patient {id}")),
        age: 64,
        gender: Gender::Female,
        medical_record_number: text(&format!("MRN-{id:04}")),
        main_diagnosis: text("Septic shock"),
        diagnosis_code: Some("A41.9".into()),
        secondary_diagnoses: vec!["Acute kidney injury".into()],
        bed_id: bed_id.map(BedId::new),
        admission_date: admitted_at(),
        discharge_date: None,
        saps_score: saps.map(SapsScore::new),
        active: true,
        created_at: admitted_at(),
        updated_at: admitted_at(),
    }
}
