//! Request and response bodies for the ward APIs.
//!
//! Field names are camelCase on the wire. Timestamps are RFC 3339 strings, statuses and genders
//! are lowercase strings.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageRes {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BedRes {
    pub id: u64,
    pub bed_number: String,
    pub wing: String,
    pub floor: i32,
    pub status: String,
}

/// Patient fields shown on a dashboard row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RosterPatientRes {
    pub id: u64,
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub main_diagnosis: String,
    pub diagnosis_code: Option<String>,
    pub days_hospitalized: u32,
    pub saps_score: Option<u32>,
}

/// One dashboard row. `patient` is null for an empty bed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BedRowRes {
    pub id: u64,
    pub bed_number: String,
    pub wing: String,
    pub floor: i32,
    pub status: String,
    pub patient: Option<RosterPatientRes>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientViewRes {
    pub id: u64,
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub medical_record_number: String,
    pub main_diagnosis: String,
    pub diagnosis_code: Option<String>,
    pub secondary_diagnoses: Vec<String>,
    pub admission_date: String,
    pub discharge_date: Option<String>,
    pub days_hospitalized: u32,
    pub saps_score: Option<u32>,
    pub status: String,
    pub active: bool,
    pub bed: Option<BedRes>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProblemRes {
    pub id: u64,
    pub patient_id: u64,
    pub description: String,
    pub is_resolved: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PendingTaskRes {
    pub id: u64,
    pub patient_id: u64,
    pub description: String,
    pub deadline: Option<String>,
    pub responsible: Option<String>,
    pub is_completed: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// A patient view with its problems and pending tasks, flattened into one object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientDetailRes {
    #[serde(flatten)]
    pub patient: PatientViewRes,
    pub problems: Vec<ProblemRes>,
    pub pending_tasks: Vec<PendingTaskRes>,
}

/// Stored patient record, as returned by writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientRes {
    pub id: u64,
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub medical_record_number: String,
    pub main_diagnosis: String,
    pub diagnosis_code: Option<String>,
    pub secondary_diagnoses: Vec<String>,
    pub bed_id: Option<u64>,
    pub admission_date: String,
    pub discharge_date: Option<String>,
    pub saps_score: Option<u32>,
    pub active: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBedReq {
    pub bed_number: String,
    pub wing: String,
    pub floor: i32,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UpdateBedStatusReq {
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdmitPatientReq {
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub medical_record_number: String,
    pub main_diagnosis: String,
    #[serde(default)]
    pub diagnosis_code: Option<String>,
    #[serde(default)]
    pub secondary_diagnoses: Vec<String>,
    #[serde(default)]
    pub bed_id: Option<u64>,
    #[serde(default)]
    pub saps_score: Option<u32>,
    /// RFC 3339 admission instant; defaults to now.
    #[serde(default)]
    pub admission_date: Option<String>,
}

/// Partial patient update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePatientReq {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub main_diagnosis: Option<String>,
    #[serde(default)]
    pub diagnosis_code: Option<String>,
    #[serde(default)]
    pub secondary_diagnoses: Option<Vec<String>>,
    #[serde(default)]
    pub saps_score: Option<u32>,
    #[serde(default)]
    pub bed_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewProblemReq {
    pub description: String,
    #[serde(default)]
    pub is_resolved: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewPendingTaskReq {
    pub description: String,
    /// RFC 3339 deadline.
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub responsible: Option<String>,
    #[serde(default)]
    pub is_completed: bool,
}
