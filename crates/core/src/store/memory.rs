//! In-memory [`WardStore`].
//!
//! Tables live behind a single `RwLock`, so every trait call is atomic with respect to the
//! others. Identifiers are assigned sequentially per table starting at 1.

use super::{PatientChange, WardStore};
use crate::topology::BedTopology;
use crate::{
    Bed, BedStatus, NewBed, NewPatient, NewPendingTask, NewProblem, Patient, PatientUpdate,
    PendingTask, Problem, WardError, WardResult,
};
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use ward_types::{BedId, PatientId, PendingTaskId, ProblemId};

#[derive(Debug, Default)]
struct Tables {
    beds: BTreeMap<BedId, Bed>,
    patients: BTreeMap<PatientId, Patient>,
    problems: BTreeMap<ProblemId, Problem>,
    pending_tasks: BTreeMap<PendingTaskId, PendingTask>,
    last_bed_id: u64,
    last_patient_id: u64,
    last_problem_id: u64,
    last_pending_task_id: u64,
}

impl Tables {
    fn occupant_of(&self, bed_id: BedId) -> Option<&Patient> {
        self.patients
            .values()
            .find(|p| p.active && p.bed_id == Some(bed_id))
    }

    /// The bed must exist and have no active occupant other than `except`.
    fn ensure_bed_free(&self, bed_id: BedId, except: Option<PatientId>) -> WardResult<()> {
        if !self.beds.contains_key(&bed_id) {
            return Err(WardError::BedNotFound(bed_id));
        }
        match self.occupant_of(bed_id) {
            Some(occupant) if Some(occupant.id) != except => Err(WardError::BedOccupied(bed_id)),
            _ => Ok(()),
        }
    }

    fn bed_number_of(&self, bed_id: Option<BedId>) -> Option<&str> {
        bed_id
            .and_then(|id| self.beds.get(&id))
            .map(|b| b.bed_number.as_str())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryWardStore {
    tables: RwLock<Tables>,
}

impl InMemoryWardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the beds listed in `topology`, in file order.
    ///
    /// # Errors
    ///
    /// Returns [`WardError::DuplicateBedNumber`] if the topology repeats a bed number.
    pub fn from_topology(topology: &BedTopology) -> WardResult<Self> {
        let store = Self::new();
        for bed in topology.beds() {
            store.create_bed(bed.clone())?;
        }
        Ok(store)
    }

    fn read(&self) -> WardResult<RwLockReadGuard<'_, Tables>> {
        self.tables.read().map_err(|_| WardError::StorePoisoned)
    }

    fn write(&self) -> WardResult<RwLockWriteGuard<'_, Tables>> {
        self.tables.write().map_err(|_| WardError::StorePoisoned)
    }
}

impl WardStore for InMemoryWardStore {
    fn list_all_beds(&self) -> WardResult<Vec<Bed>> {
        let tables = self.read()?;
        let mut beds: Vec<Bed> = tables.beds.values().cloned().collect();
        beds.sort_by(|a, b| a.bed_number.cmp(&b.bed_number).then(a.id.cmp(&b.id)));
        Ok(beds)
    }

    fn bed(&self, id: BedId) -> WardResult<Option<Bed>> {
        Ok(self.read()?.beds.get(&id).cloned())
    }

    fn create_bed(&self, bed: NewBed) -> WardResult<Bed> {
        let mut tables = self.write()?;
        if tables.beds.values().any(|b| b.bed_number == bed.bed_number) {
            return Err(WardError::DuplicateBedNumber(bed.bed_number.into_string()));
        }

        tables.last_bed_id += 1;
        let created = Bed {
            id: BedId::new(tables.last_bed_id),
            bed_number: bed.bed_number,
            wing: bed.wing,
            floor: bed.floor,
            status: bed.status.unwrap_or(BedStatus::Available),
        };
        tables.beds.insert(created.id, created.clone());
        Ok(created)
    }

    fn update_bed_status(&self, id: BedId, status: BedStatus) -> WardResult<()> {
        let mut tables = self.write()?;
        let bed = tables
            .beds
            .get_mut(&id)
            .ok_or(WardError::BedNotFound(id))?;
        bed.status = status;
        Ok(())
    }

    fn patient(&self, id: PatientId) -> WardResult<Option<Patient>> {
        Ok(self.read()?.patients.get(&id).cloned())
    }

    fn list_active_patients_with_beds(&self) -> WardResult<Vec<(Patient, Option<Bed>)>> {
        let tables = self.read()?;
        let mut active: Vec<&Patient> = tables.patients.values().filter(|p| p.active).collect();
        // `None` sorts before `Some`, so compare presence first to put unassigned patients last.
        active.sort_by(|a, b| {
            let a_number = tables.bed_number_of(a.bed_id);
            let b_number = tables.bed_number_of(b.bed_id);
            a_number
                .is_none()
                .cmp(&b_number.is_none())
                .then(a_number.cmp(&b_number))
                .then(a.id.cmp(&b.id))
        });

        Ok(active
            .into_iter()
            .map(|p| {
                let bed = p.bed_id.and_then(|id| tables.beds.get(&id)).cloned();
                (p.clone(), bed)
            })
            .collect())
    }

    fn create_patient(&self, patient: NewPatient) -> WardResult<Patient> {
        let mut tables = self.write()?;
        if tables
            .patients
            .values()
            .any(|p| p.medical_record_number == patient.medical_record_number)
        {
            return Err(WardError::DuplicateMedicalRecordNumber(
                patient.medical_record_number.into_string(),
            ));
        }
        if let Some(bed_id) = patient.bed_id {
            tables.ensure_bed_free(bed_id, None)?;
        }

        let now = Utc::now();
        tables.last_patient_id += 1;
        let created = Patient {
            id: PatientId::new(tables.last_patient_id),
            name: patient.name,
            age: patient.age,
            gender: patient.gender,
            medical_record_number: patient.medical_record_number,
            main_diagnosis: patient.main_diagnosis,
            diagnosis_code: patient.diagnosis_code,
            secondary_diagnoses: patient.secondary_diagnoses,
            bed_id: patient.bed_id,
            admission_date: patient.admitted_at.unwrap_or(now),
            discharge_date: None,
            saps_score: patient.saps_score,
            active: true,
            created_at: now,
            updated_at: now,
        };
        tables.patients.insert(created.id, created.clone());
        Ok(created)
    }

    fn update_patient(&self, id: PatientId, update: PatientUpdate) -> WardResult<PatientChange> {
        let mut tables = self.write()?;
        let current = tables
            .patients
            .get(&id)
            .ok_or(WardError::PatientNotFound(id))?;

        if let Some(bed_id) = update.bed_id {
            if current.bed_id != Some(bed_id) {
                if !current.active {
                    return Err(WardError::PatientDischarged(id));
                }
                tables.ensure_bed_free(bed_id, Some(id))?;
            }
        }

        let patient = tables
            .patients
            .get_mut(&id)
            .ok_or(WardError::PatientNotFound(id))?;
        let previous_bed = patient.bed_id;
        if let Some(name) = update.name {
            patient.name = name;
        }
        if let Some(age) = update.age {
            patient.age = age;
        }
        if let Some(gender) = update.gender {
            patient.gender = gender;
        }
        if let Some(main_diagnosis) = update.main_diagnosis {
            patient.main_diagnosis = main_diagnosis;
        }
        if let Some(diagnosis_code) = update.diagnosis_code {
            patient.diagnosis_code = Some(diagnosis_code);
        }
        if let Some(secondary_diagnoses) = update.secondary_diagnoses {
            patient.secondary_diagnoses = secondary_diagnoses;
        }
        if let Some(saps_score) = update.saps_score {
            patient.saps_score = Some(saps_score);
        }
        if let Some(bed_id) = update.bed_id {
            patient.bed_id = Some(bed_id);
        }
        patient.updated_at = Utc::now();

        Ok(PatientChange {
            patient: patient.clone(),
            previous_bed,
        })
    }

    fn discharge_patient(&self, id: PatientId) -> WardResult<PatientChange> {
        let mut tables = self.write()?;
        let patient = tables
            .patients
            .get_mut(&id)
            .ok_or(WardError::PatientNotFound(id))?;
        if !patient.active {
            return Err(WardError::PatientDischarged(id));
        }

        let now = Utc::now();
        let previous_bed = patient.bed_id.take();
        patient.active = false;
        patient.discharge_date = Some(now);
        patient.updated_at = now;
        Ok(PatientChange {
            patient: patient.clone(),
            previous_bed,
        })
    }

    fn problems_for(&self, patient_id: PatientId) -> WardResult<Vec<Problem>> {
        let tables = self.read()?;
        let mut problems: Vec<Problem> = tables
            .problems
            .values()
            .filter(|p| p.patient_id == patient_id)
            .cloned()
            .collect();
        problems.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(problems)
    }

    fn create_problem(&self, patient_id: PatientId, problem: NewProblem) -> WardResult<Problem> {
        let mut tables = self.write()?;
        if !tables.patients.contains_key(&patient_id) {
            return Err(WardError::PatientNotFound(patient_id));
        }

        let now = Utc::now();
        tables.last_problem_id += 1;
        let created = Problem {
            id: ProblemId::new(tables.last_problem_id),
            patient_id,
            description: problem.description,
            is_resolved: problem.is_resolved,
            created_at: now,
            updated_at: now,
        };
        tables.problems.insert(created.id, created.clone());
        Ok(created)
    }

    fn resolve_problem(&self, id: ProblemId) -> WardResult<Problem> {
        let mut tables = self.write()?;
        let problem = tables
            .problems
            .get_mut(&id)
            .ok_or(WardError::ProblemNotFound(id))?;
        problem.is_resolved = true;
        problem.updated_at = Utc::now();
        Ok(problem.clone())
    }

    fn pending_tasks_for(&self, patient_id: PatientId) -> WardResult<Vec<PendingTask>> {
        let tables = self.read()?;
        let mut tasks: Vec<PendingTask> = tables
            .pending_tasks
            .values()
            .filter(|t| t.patient_id == patient_id)
            .cloned()
            .collect();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(tasks)
    }

    fn create_pending_task(
        &self,
        patient_id: PatientId,
        task: NewPendingTask,
    ) -> WardResult<PendingTask> {
        let mut tables = self.write()?;
        if !tables.patients.contains_key(&patient_id) {
            return Err(WardError::PatientNotFound(patient_id));
        }

        let now = Utc::now();
        tables.last_pending_task_id += 1;
        let created = PendingTask {
            id: PendingTaskId::new(tables.last_pending_task_id),
            patient_id,
            description: task.description,
            deadline: task.deadline,
            responsible: task.responsible,
            is_completed: task.is_completed,
            created_at: now,
            updated_at: now,
        };
        tables.pending_tasks.insert(created.id, created.clone());
        Ok(created)
    }

    fn complete_pending_task(&self, id: PendingTaskId) -> WardResult<PendingTask> {
        let mut tables = self.write()?;
        let task = tables
            .pending_tasks
            .get_mut(&id)
            .ok_or(WardError::PendingTaskNotFound(id))?;
        task.is_completed = true;
        task.updated_at = Utc::now();
        Ok(task.clone())
    }
}
