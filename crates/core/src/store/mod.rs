//! Persistence boundary for ward records.
//!
//! The rules engine never talks to a store; [`crate::WardService`] fetches records through
//! [`WardStore`] and hands them to the rules. Implementations are responsible for:
//! - unique bed numbers and unique medical record numbers
//! - at most one active patient per bed
//! - stamping `created_at`/`updated_at` and the discharge instant

pub mod memory;

pub use memory::InMemoryWardStore;

use crate::{
    Bed, BedStatus, NewBed, NewPatient, NewPendingTask, NewProblem, Patient, PatientUpdate,
    PendingTask, Problem, WardResult,
};
use ward_types::{BedId, PatientId, PendingTaskId, ProblemId};

/// A patient after a write, with the bed they held just before it.
///
/// `previous_bed` is read under the same lock as the write, so callers can free it without
/// racing another transfer of the same patient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientChange {
    pub patient: Patient,
    pub previous_bed: Option<BedId>,
}

/// Store of beds, patients, problems and pending tasks.
pub trait WardStore: Send + Sync {
    /// All beds, ordered by bed number.
    fn list_all_beds(&self) -> WardResult<Vec<Bed>>;

    fn bed(&self, id: BedId) -> WardResult<Option<Bed>>;

    /// # Errors
    ///
    /// [`crate::WardError::DuplicateBedNumber`] if the bed number is taken.
    fn create_bed(&self, bed: NewBed) -> WardResult<Bed>;

    /// Overwrites the stored status cache of a bed.
    fn update_bed_status(&self, id: BedId, status: BedStatus) -> WardResult<()>;

    /// Any patient, active or discharged.
    fn patient(&self, id: PatientId) -> WardResult<Option<Patient>>;

    /// Active patients paired with their bed, ordered by bed number with unassigned patients
    /// last. A patient whose bed id does not resolve is paired with `None`.
    fn list_active_patients_with_beds(&self) -> WardResult<Vec<(Patient, Option<Bed>)>>;

    /// Admits a patient.
    ///
    /// # Errors
    ///
    /// - [`crate::WardError::BedNotFound`] if the requested bed does not exist
    /// - [`crate::WardError::BedOccupied`] if it already has an active occupant
    /// - [`crate::WardError::DuplicateMedicalRecordNumber`] if the MRN is taken
    fn create_patient(&self, patient: NewPatient) -> WardResult<Patient>;

    /// Applies a partial update and returns the updated patient with their previous bed.
    ///
    /// # Errors
    ///
    /// Same bed checks as [`WardStore::create_patient`] when `bed_id` changes, plus
    /// [`crate::WardError::PatientDischarged`] when assigning a bed to a discharged patient.
    fn update_patient(&self, id: PatientId, update: PatientUpdate) -> WardResult<PatientChange>;

    /// Marks the patient inactive, stamps the discharge instant and clears the bed.
    ///
    /// # Errors
    ///
    /// - [`crate::WardError::PatientNotFound`] if no such patient exists
    /// - [`crate::WardError::PatientDischarged`] if the patient was already discharged
    fn discharge_patient(&self, id: PatientId) -> WardResult<PatientChange>;

    /// Problems for a patient, newest first.
    fn problems_for(&self, patient_id: PatientId) -> WardResult<Vec<Problem>>;

    fn create_problem(&self, patient_id: PatientId, problem: NewProblem) -> WardResult<Problem>;

    fn resolve_problem(&self, id: ProblemId) -> WardResult<Problem>;

    /// Pending tasks for a patient, newest first.
    fn pending_tasks_for(&self, patient_id: PatientId) -> WardResult<Vec<PendingTask>>;

    fn create_pending_task(
        &self,
        patient_id: PatientId,
        task: NewPendingTask,
    ) -> WardResult<PendingTask>;

    fn complete_pending_task(&self, id: PendingTaskId) -> WardResult<PendingTask>;
}
