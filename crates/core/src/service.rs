//! Ward service.
//!
//! The operations API front ends call. Reads fetch records from the store and run them through
//! the rules; writes go to the store and then keep each bed's cached status in step with its
//! occupant.

use crate::config::CoreConfig;
use crate::rules::{aggregate, build_roster, classify_occupant, BedRow, PatientView};
use crate::store::WardStore;
use crate::topology::Census;
use crate::{
    Bed, BedStatus, NewBed, NewPatient, NewPendingTask, NewProblem, Patient, PatientUpdate,
    PendingTask, Problem, WardError, WardResult,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use ward_types::{BedId, PatientId, PendingTaskId, ProblemId};

/// A patient view with its problems and pending tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatientDetail {
    #[serde(flatten)]
    pub view: PatientView,
    pub problems: Vec<Problem>,
    pub pending_tasks: Vec<PendingTask>,
}

#[derive(Clone)]
pub struct WardService {
    cfg: Arc<CoreConfig>,
    store: Arc<dyn WardStore>,
}

impl WardService {
    pub fn new(cfg: Arc<CoreConfig>, store: Arc<dyn WardStore>) -> Self {
        Self { cfg, store }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.cfg
    }

    /// One row per bed with the current computed status.
    pub fn dashboard(&self) -> WardResult<Vec<BedRow>> {
        self.dashboard_as_of(Utc::now())
    }

    /// [`WardService::dashboard`] with lengths of stay counted up to `as_of`.
    pub fn dashboard_as_of(&self, as_of: DateTime<Utc>) -> WardResult<Vec<BedRow>> {
        let beds = self.store.list_all_beds()?;
        let policy = self.cfg.unscored_occupant_policy();
        let views: Vec<PatientView> = self
            .store
            .list_active_patients_with_beds()?
            .iter()
            .inspect(|(patient, bed)| {
                if let (Some(bed_id), None) = (patient.bed_id, bed) {
                    tracing::warn!(
                        patient_id = %patient.id,
                        bed_id = %bed_id,
                        "active patient assigned to unknown bed; omitted from roster"
                    );
                }
            })
            .map(|(patient, bed)| aggregate(patient, bed.as_ref(), policy, as_of))
            .collect();

        Ok(build_roster(&beds, &views))
    }

    /// Full view of one patient, active or discharged.
    ///
    /// With `open_only`, resolved problems and completed tasks are left out.
    ///
    /// # Errors
    ///
    /// Returns [`WardError::PatientNotFound`] if no such patient exists.
    pub fn patient_detail(&self, id: PatientId, open_only: bool) -> WardResult<PatientDetail> {
        let patient = self.require_patient(id)?;
        let bed = match patient.bed_id {
            Some(bed_id) => self.store.bed(bed_id)?,
            None => None,
        };

        let view = aggregate(
            &patient,
            bed.as_ref(),
            self.cfg.unscored_occupant_policy(),
            Utc::now(),
        );

        let mut problems = self.store.problems_for(id)?;
        let mut pending_tasks = self.store.pending_tasks_for(id)?;
        if open_only {
            problems.retain(|p| !p.is_resolved);
            pending_tasks.retain(|t| !t.is_completed);
        }

        Ok(PatientDetail {
            view,
            problems,
            pending_tasks,
        })
    }

    /// Admits a patient and, if a bed was given, writes the bed's status.
    pub fn admit_patient(&self, patient: NewPatient) -> WardResult<Patient> {
        let admitted = self.store.create_patient(patient)?;
        self.sync_bed_status(&admitted)?;

        tracing::info!(
            patient_id = %admitted.id,
            bed_id = ?admitted.bed_id.map(BedId::get),
            "patient admitted"
        );
        Ok(admitted)
    }

    /// Applies a partial update.
    ///
    /// A new SAPS score is written through to the occupied bed. A bed change frees the old bed
    /// and writes the new one.
    pub fn update_patient(&self, id: PatientId, update: PatientUpdate) -> WardResult<Patient> {
        let rescored = update.saps_score.is_some();
        let change = self.store.update_patient(id, update)?;
        let moved = change.patient.bed_id != change.previous_bed;

        if moved {
            if let Some(old_bed) = change.previous_bed {
                self.store.update_bed_status(old_bed, BedStatus::Available)?;
            }
            tracing::info!(
                patient_id = %id,
                from = ?change.previous_bed.map(BedId::get),
                to = ?change.patient.bed_id.map(BedId::get),
                "patient transferred"
            );
        }
        if moved || rescored {
            self.sync_bed_status(&change.patient)?;
        }

        Ok(change.patient)
    }

    /// Discharges a patient and marks their bed `available`.
    ///
    /// # Errors
    ///
    /// - [`WardError::PatientNotFound`] if no such patient exists
    /// - [`WardError::PatientDischarged`] if the patient was already discharged
    pub fn discharge_patient(&self, id: PatientId) -> WardResult<Patient> {
        let change = self.store.discharge_patient(id)?;

        if let Some(bed_id) = change.previous_bed {
            self.store.update_bed_status(bed_id, BedStatus::Available)?;
        }

        tracing::info!(patient_id = %id, "patient discharged");
        Ok(change.patient)
    }

    pub fn add_problem(&self, patient_id: PatientId, problem: NewProblem) -> WardResult<Problem> {
        self.store.create_problem(patient_id, problem)
    }

    pub fn resolve_problem(&self, id: ProblemId) -> WardResult<Problem> {
        self.store.resolve_problem(id)
    }

    pub fn add_pending_task(
        &self,
        patient_id: PatientId,
        task: NewPendingTask,
    ) -> WardResult<PendingTask> {
        self.store.create_pending_task(patient_id, task)
    }

    pub fn complete_pending_task(&self, id: PendingTaskId) -> WardResult<PendingTask> {
        self.store.complete_pending_task(id)
    }

    /// Beds with their stored status cache, ordered by bed number.
    pub fn list_beds(&self) -> WardResult<Vec<Bed>> {
        self.store.list_all_beds()
    }

    pub fn create_bed(&self, bed: NewBed) -> WardResult<Bed> {
        let created = self.store.create_bed(bed)?;
        tracing::info!(bed_id = %created.id, bed_number = %created.bed_number, "bed created");
        Ok(created)
    }

    /// Overwrites a bed's stored status. The dashboard still recomputes occupied beds.
    pub fn set_bed_status(&self, id: BedId, status: BedStatus) -> WardResult<()> {
        self.store.update_bed_status(id, status)
    }

    /// Admits every census entry, resolving bed numbers against the stored beds.
    ///
    /// # Errors
    ///
    /// Returns [`WardError::Census`] for a bed number that names no bed, or any admission error.
    /// Entries before the failing one stay admitted.
    pub fn admit_census(&self, census: &Census) -> WardResult<Vec<Patient>> {
        let beds = self.store.list_all_beds()?;
        let mut admitted = Vec::with_capacity(census.patients().len());

        for (i, entry) in census.patients().iter().enumerate() {
            let bed_id = match &entry.bed_number {
                Some(number) => Some(
                    beds.iter()
                        .find(|b| &b.bed_number == number)
                        .map(|b| b.id)
                        .ok_or_else(|| {
                            WardError::Census(format!(
                                "at patients[{i}].bed_number: unknown bed number {number}"
                            ))
                        })?,
                ),
                None => None,
            };

            admitted.push(self.admit_patient(NewPatient {
                name: entry.name.clone(),
                age: entry.age,
                gender: entry.gender,
                medical_record_number: entry.medical_record_number.clone(),
                main_diagnosis: entry.main_diagnosis.clone(),
                diagnosis_code: entry.diagnosis_code.clone(),
                secondary_diagnoses: entry.secondary_diagnoses.clone(),
                bed_id,
                saps_score: entry.saps_score,
                admitted_at: entry.admitted_at,
            })?);
        }

        Ok(admitted)
    }

    fn require_patient(&self, id: PatientId) -> WardResult<Patient> {
        self.store
            .patient(id)?
            .ok_or(WardError::PatientNotFound(id))
    }

    fn sync_bed_status(&self, patient: &Patient) -> WardResult<()> {
        let Some(bed_id) = patient.bed_id.filter(|_| patient.active) else {
            return Ok(());
        };
        let status = classify_occupant(patient.saps_score, self.cfg.unscored_occupant_policy());
        self.store.update_bed_status(bed_id, status)?;
        tracing::debug!(bed_id = %bed_id, %status, "bed status written through");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::text;
    use crate::rules::UnscoredOccupantPolicy;
    use crate::store::{InMemoryWardStore, PatientChange};
    use crate::topology::BedTopology;
    use crate::{Gender, SapsScore};
    use chrono::Duration;
    use std::sync::Mutex;

    const TOPOLOGY: &str = r#"beds:
  - { bed_number: "101", wing: North, floor: 1 }
  - { bed_number: "102", wing: North, floor: 1 }
  - { bed_number: "103", wing: South, floor: 1 }
"#;

    fn service_with(policy: UnscoredOccupantPolicy) -> WardService {
        let topology = BedTopology::parse(TOPOLOGY).unwrap();
        let store = InMemoryWardStore::from_topology(&topology).unwrap();
        WardService::new(Arc::new(CoreConfig::new(policy, None)), Arc::new(store))
    }

    fn service() -> WardService {
        service_with(UnscoredOccupantPolicy::Stable)
    }

    fn bed_id(svc: &WardService, number: &str) -> BedId {
        svc.list_beds()
            .unwrap()
            .into_iter()
            .find(|b| b.bed_number.as_str() == number)
            .map(|b| b.id)
            .unwrap()
    }

    fn admission(mrn: &str, bed: Option<BedId>, saps: Option<u32>) -> NewPatient {
        NewPatient {
            name: text("Carlos Mendes"),
            age: 67,
            gender: Gender::Male,
            medical_record_number: text(mrn),
            main_diagnosis: text("Acute respiratory distress syndrome"),
            diagnosis_code: Some("J80".into()),
            secondary_diagnoses: vec!["Type 2 diabetes".into()],
            bed_id: bed,
            saps_score: saps.map(SapsScore::new),
            admitted_at: None,
        }
    }

    fn row<'a>(rows: &'a [BedRow], number: &str) -> &'a BedRow {
        rows.iter().find(|r| r.bed_number.as_str() == number).unwrap()
    }

    fn stored_status(svc: &WardService, number: &str) -> BedStatus {
        svc.list_beds()
            .unwrap()
            .into_iter()
            .find(|b| b.bed_number.as_str() == number)
            .map(|b| b.status)
            .unwrap()
    }

    #[test]
    fn rescoring_changes_only_the_occupied_bed() {
        let svc = service();
        let b101 = bed_id(&svc, "101");
        let p = svc.admit_patient(admission("MRN-1", Some(b101), Some(70))).unwrap();

        let rows = svc.dashboard().unwrap();
        assert_eq!(row(&rows, "101").status, BedStatus::Critical);
        assert_eq!(stored_status(&svc, "101"), BedStatus::Critical);

        svc.update_patient(
            p.id,
            PatientUpdate {
                saps_score: Some(SapsScore::new(35)),
                ..Default::default()
            },
        )
        .unwrap();

        let rows = svc.dashboard().unwrap();
        assert_eq!(row(&rows, "101").status, BedStatus::Stable);
        assert_eq!(stored_status(&svc, "101"), BedStatus::Stable);
        assert_eq!(row(&rows, "102").status, BedStatus::Available);
        assert_eq!(row(&rows, "103").status, BedStatus::Available);
    }

    #[test]
    fn discharged_patient_leaves_the_roster_but_stays_retrievable() {
        let svc = service();
        let b102 = bed_id(&svc, "102");
        let p = svc.admit_patient(admission("MRN-1", Some(b102), Some(45))).unwrap();

        svc.discharge_patient(p.id).unwrap();

        let rows = svc.dashboard().unwrap();
        let r = row(&rows, "102");
        assert_eq!(r.status, BedStatus::Available);
        assert!(r.patient.is_none());
        assert!(rows.iter().all(|r| r.patient.is_none()));
        assert_eq!(stored_status(&svc, "102"), BedStatus::Available);

        let detail = svc.patient_detail(p.id, false).unwrap();
        assert!(!detail.view.active);
        assert!(detail.view.discharge_date.is_some());
        assert!(detail.view.bed.is_none());
        assert_eq!(detail.view.status, BedStatus::Available);
    }

    #[test]
    fn stale_stored_status_does_not_leak_into_dashboard() {
        let svc = service();
        let b103 = bed_id(&svc, "103");
        svc.admit_patient(admission("MRN-1", Some(b103), Some(62))).unwrap();

        svc.set_bed_status(b103, BedStatus::Stable).unwrap();
        let rows = svc.dashboard().unwrap();
        assert_eq!(row(&rows, "103").status, BedStatus::Critical);

        let b101 = bed_id(&svc, "101");
        svc.set_bed_status(b101, BedStatus::Critical).unwrap();
        let rows = svc.dashboard().unwrap();
        assert_eq!(row(&rows, "101").status, BedStatus::Available);
    }

    #[test]
    fn unscored_admission_follows_policy() {
        let svc = service();
        let b101 = bed_id(&svc, "101");
        svc.admit_patient(admission("MRN-1", Some(b101), None)).unwrap();
        let rows = svc.dashboard().unwrap();
        assert_eq!(row(&rows, "101").status, BedStatus::Stable);
        assert!(row(&rows, "101").patient.is_some());

        let legacy = service_with(UnscoredOccupantPolicy::Available);
        let b101 = bed_id(&legacy, "101");
        legacy.admit_patient(admission("MRN-1", Some(b101), None)).unwrap();
        let rows = legacy.dashboard().unwrap();
        assert_eq!(row(&rows, "101").status, BedStatus::Available);
        assert!(row(&rows, "101").patient.is_some());
    }

    #[test]
    fn transfer_frees_old_bed_and_scores_new_one() {
        let svc = service();
        let b101 = bed_id(&svc, "101");
        let b103 = bed_id(&svc, "103");
        let p = svc.admit_patient(admission("MRN-1", Some(b101), Some(48))).unwrap();

        svc.update_patient(
            p.id,
            PatientUpdate {
                bed_id: Some(b103),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(stored_status(&svc, "101"), BedStatus::Available);
        assert_eq!(stored_status(&svc, "103"), BedStatus::Attention);
        let rows = svc.dashboard().unwrap();
        assert!(row(&rows, "101").patient.is_none());
        assert_eq!(row(&rows, "103").status, BedStatus::Attention);
    }

    #[test]
    fn detail_lists_everything_unless_open_only() {
        let svc = service();
        let p = svc.admit_patient(admission("MRN-1", None, Some(30))).unwrap();

        let fever = svc
            .add_problem(
                p.id,
                NewProblem {
                    description: text("Fever"),
                    is_resolved: false,
                },
            )
            .unwrap();
        svc.add_problem(
            p.id,
            NewProblem {
                description: text("Hypokalaemia"),
                is_resolved: false,
            },
        )
        .unwrap();
        let task = svc
            .add_pending_task(
                p.id,
                NewPendingTask {
                    description: text("Chest X-ray"),
                    deadline: Some(Utc::now() + Duration::hours(4)),
                    responsible: Some("Dr. Farias".into()),
                    is_completed: false,
                },
            )
            .unwrap();

        svc.resolve_problem(fever.id).unwrap();
        svc.complete_pending_task(task.id).unwrap();

        let full = svc.patient_detail(p.id, false).unwrap();
        assert_eq!(full.problems.len(), 2);
        assert_eq!(full.pending_tasks.len(), 1);

        let open = svc.patient_detail(p.id, true).unwrap();
        assert_eq!(open.problems.len(), 1);
        assert_eq!(open.problems[0].description.as_str(), "Hypokalaemia");
        assert!(open.pending_tasks.is_empty());
    }

    #[test]
    fn missing_patient_is_reported() {
        let svc = service();
        let err = svc.patient_detail(PatientId::new(77), false).unwrap_err();
        assert!(matches!(err, WardError::PatientNotFound(id) if id.get() == 77));

        let err = svc.discharge_patient(PatientId::new(77)).unwrap_err();
        assert!(matches!(err, WardError::PatientNotFound(_)));
    }

    #[test]
    fn census_entries_land_in_their_beds() {
        let svc = service();
        let census = Census::parse(
            r#"patients:
  - name: Joao Lima
    age: 71
    gender: male
    medical_record_number: MRN-0001
    main_diagnosis: Cardiogenic shock
    bed_number: "103"
    saps_score: 68
  - name: Maria Reis
    age: 49
    gender: female
    medical_record_number: MRN-0002
    main_diagnosis: Post-operative monitoring
"#,
        )
        .unwrap();

        let admitted = svc.admit_census(&census).unwrap();
        assert_eq!(admitted.len(), 2);

        let rows = svc.dashboard().unwrap();
        assert_eq!(row(&rows, "103").status, BedStatus::Critical);
        assert_eq!(rows.iter().filter(|r| r.patient.is_some()).count(), 1);
    }

    #[test]
    fn census_with_unknown_bed_number_fails() {
        let svc = service();
        let census = Census::parse(
            r#"patients:
  - name: Joao Lima
    age: 71
    gender: male
    medical_record_number: MRN-0001
    main_diagnosis: Cardiogenic shock
    bed_number: "999"
"#,
        )
        .unwrap();

        let err = svc.admit_census(&census).unwrap_err();
        assert!(matches!(err, WardError::Census(msg) if msg.contains("999")));
    }

    #[test]
    fn dashboard_counts_days_up_to_as_of() {
        let svc = service();
        let b102 = bed_id(&svc, "102");
        let admitted_at = Utc::now() - Duration::days(10);
        let mut new = admission("MRN-1", Some(b102), Some(10));
        new.admitted_at = Some(admitted_at);
        svc.admit_patient(new).unwrap();

        let rows = svc.dashboard_as_of(admitted_at + Duration::days(3)).unwrap();
        let shown = row(&rows, "102").patient.as_ref().unwrap();
        assert_eq!(shown.days_hospitalized, 3);
    }

    /// Delegates to an in-memory store. It can hide one bed as if it had been removed, and it
    /// can land another writer's transfer just before the next `update_patient`.
    struct InterleavedStore {
        inner: Arc<InMemoryWardStore>,
        hidden_bed: Option<BedId>,
        cut_in: Mutex<Option<(PatientId, BedId)>>,
    }

    impl InterleavedStore {
        fn over(inner: Arc<InMemoryWardStore>, hidden_bed: Option<BedId>) -> Arc<Self> {
            Arc::new(Self {
                inner,
                hidden_bed,
                cut_in: Mutex::new(None),
            })
        }

        fn visible(&self, bed: Option<Bed>) -> Option<Bed> {
            bed.filter(|b| Some(b.id) != self.hidden_bed)
        }
    }

    impl WardStore for InterleavedStore {
        fn list_all_beds(&self) -> WardResult<Vec<Bed>> {
            let mut beds = self.inner.list_all_beds()?;
            beds.retain(|b| Some(b.id) != self.hidden_bed);
            Ok(beds)
        }

        fn bed(&self, id: BedId) -> WardResult<Option<Bed>> {
            Ok(self.visible(self.inner.bed(id)?))
        }

        fn create_bed(&self, bed: NewBed) -> WardResult<Bed> {
            self.inner.create_bed(bed)
        }

        fn update_bed_status(&self, id: BedId, status: BedStatus) -> WardResult<()> {
            self.inner.update_bed_status(id, status)
        }

        fn patient(&self, id: PatientId) -> WardResult<Option<Patient>> {
            self.inner.patient(id)
        }

        fn list_active_patients_with_beds(&self) -> WardResult<Vec<(Patient, Option<Bed>)>> {
            Ok(self
                .inner
                .list_active_patients_with_beds()?
                .into_iter()
                .map(|(patient, bed)| (patient, self.visible(bed)))
                .collect())
        }

        fn create_patient(&self, patient: NewPatient) -> WardResult<Patient> {
            self.inner.create_patient(patient)
        }

        fn update_patient(
            &self,
            id: PatientId,
            update: PatientUpdate,
        ) -> WardResult<PatientChange> {
            let cut_in = self.cut_in.lock().unwrap().take();
            if let Some((patient_id, bed_id)) = cut_in {
                let other_writer = WardService::new(
                    Arc::new(CoreConfig::default()),
                    self.inner.clone() as Arc<dyn WardStore>,
                );
                other_writer.update_patient(
                    patient_id,
                    PatientUpdate {
                        bed_id: Some(bed_id),
                        ..Default::default()
                    },
                )?;
            }
            self.inner.update_patient(id, update)
        }

        fn discharge_patient(&self, id: PatientId) -> WardResult<PatientChange> {
            self.inner.discharge_patient(id)
        }

        fn problems_for(&self, patient_id: PatientId) -> WardResult<Vec<Problem>> {
            self.inner.problems_for(patient_id)
        }

        fn create_problem(
            &self,
            patient_id: PatientId,
            problem: NewProblem,
        ) -> WardResult<Problem> {
            self.inner.create_problem(patient_id, problem)
        }

        fn resolve_problem(&self, id: ProblemId) -> WardResult<Problem> {
            self.inner.resolve_problem(id)
        }

        fn pending_tasks_for(&self, patient_id: PatientId) -> WardResult<Vec<PendingTask>> {
            self.inner.pending_tasks_for(patient_id)
        }

        fn create_pending_task(
            &self,
            patient_id: PatientId,
            task: NewPendingTask,
        ) -> WardResult<PendingTask> {
            self.inner.create_pending_task(patient_id, task)
        }

        fn complete_pending_task(&self, id: PendingTaskId) -> WardResult<PendingTask> {
            self.inner.complete_pending_task(id)
        }
    }

    fn topology_store() -> Arc<InMemoryWardStore> {
        let topology = BedTopology::parse(TOPOLOGY).unwrap();
        Arc::new(InMemoryWardStore::from_topology(&topology).unwrap())
    }

    #[test]
    fn transfer_frees_the_bed_held_when_the_write_lands() {
        let store = InterleavedStore::over(topology_store(), None);
        let svc = WardService::new(Arc::new(CoreConfig::default()), store.clone());
        let b101 = bed_id(&svc, "101");
        let b102 = bed_id(&svc, "102");
        let b103 = bed_id(&svc, "103");
        let p = svc.admit_patient(admission("MRN-1", Some(b101), Some(70))).unwrap();

        // another writer moves the patient 101 -> 102 between our request and our write
        *store.cut_in.lock().unwrap() = Some((p.id, b102));
        svc.update_patient(
            p.id,
            PatientUpdate {
                bed_id: Some(b103),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(stored_status(&svc, "101"), BedStatus::Available);
        assert_eq!(stored_status(&svc, "102"), BedStatus::Available);
        assert_eq!(stored_status(&svc, "103"), BedStatus::Critical);

        let rows = svc.dashboard().unwrap();
        assert_eq!(row(&rows, "103").status, BedStatus::Critical);
        assert_eq!(rows.iter().filter(|r| r.patient.is_some()).count(), 1);
    }

    #[test]
    fn patient_in_unknown_bed_is_left_off_the_roster() {
        let inner = topology_store();
        let setup = WardService::new(Arc::new(CoreConfig::default()), inner.clone());
        let b101 = bed_id(&setup, "101");
        let b102 = bed_id(&setup, "102");
        setup.admit_patient(admission("MRN-1", Some(b101), Some(20))).unwrap();
        setup.admit_patient(admission("MRN-2", Some(b102), Some(65))).unwrap();

        let svc = WardService::new(
            Arc::new(CoreConfig::default()),
            InterleavedStore::over(inner, Some(b102)),
        );
        let rows = svc.dashboard().unwrap();

        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.bed_number.as_str() != "102"));
        assert_eq!(row(&rows, "101").status, BedStatus::Stable);
        assert_eq!(row(&rows, "103").status, BedStatus::Available);
        assert_eq!(rows.iter().filter(|r| r.patient.is_some()).count(), 1);
    }
}
