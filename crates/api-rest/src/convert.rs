//! Conversions between wire types and core records.
//!
//! Inbound conversions validate text and timestamps and fail with
//! [`WardError::InvalidInput`]; outbound conversions are infallible.

use api_shared::{
    AdmitPatientReq, BedRes, BedRowRes, CreateBedReq, NewPendingTaskReq, NewProblemReq,
    PatientDetailRes, PatientRes, PatientViewRes, PendingTaskRes, ProblemRes, RosterPatientRes,
    UpdatePatientReq,
};
use chrono::{DateTime, Utc};
use ward_core::rules::{BedRow, BedSummary, PatientView, RosterPatient};
use ward_core::{
    Bed, BedId, BedStatus, Gender, NewBed, NewPatient, NewPendingTask, NewProblem, NonEmptyText,
    Patient, PatientDetail, PatientUpdate, PendingTask, Problem, SapsScore, WardError,
    WardResult,
};

fn timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339()
}

fn parse_timestamp(field: &str, value: &str) -> WardResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| WardError::InvalidInput(format!("{field}: {e}")))
}

fn text(field: &str, value: String) -> WardResult<NonEmptyText> {
    NonEmptyText::new(value).map_err(|e| WardError::InvalidInput(format!("{field}: {e}")))
}

/// Blank optional strings are treated as absent.
fn optional(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub(crate) fn bed_res(bed: &Bed) -> BedRes {
    BedRes {
        id: bed.id.get(),
        bed_number: bed.bed_number.to_string(),
        wing: bed.wing.to_string(),
        floor: bed.floor,
        status: bed.status.to_string(),
    }
}

fn bed_summary_res(bed: &BedSummary) -> BedRes {
    BedRes {
        id: bed.id.get(),
        bed_number: bed.bed_number.to_string(),
        wing: bed.wing.to_string(),
        floor: bed.floor,
        status: bed.status.to_string(),
    }
}

fn roster_patient_res(patient: &RosterPatient) -> RosterPatientRes {
    RosterPatientRes {
        id: patient.id.get(),
        name: patient.name.to_string(),
        age: patient.age,
        gender: patient.gender.to_string(),
        main_diagnosis: patient.main_diagnosis.to_string(),
        diagnosis_code: patient.diagnosis_code.clone(),
        days_hospitalized: patient.days_hospitalized,
        saps_score: patient.saps_score.map(SapsScore::value),
    }
}

pub(crate) fn bed_row_res(row: &BedRow) -> BedRowRes {
    BedRowRes {
        id: row.id.get(),
        bed_number: row.bed_number.to_string(),
        wing: row.wing.to_string(),
        floor: row.floor,
        status: row.status.to_string(),
        patient: row.patient.as_ref().map(roster_patient_res),
    }
}

fn patient_view_res(view: &PatientView) -> PatientViewRes {
    PatientViewRes {
        id: view.id.get(),
        name: view.name.to_string(),
        age: view.age,
        gender: view.gender.to_string(),
        medical_record_number: view.medical_record_number.to_string(),
        main_diagnosis: view.main_diagnosis.to_string(),
        diagnosis_code: view.diagnosis_code.clone(),
        secondary_diagnoses: view.secondary_diagnoses.clone(),
        admission_date: timestamp(view.admission_date),
        discharge_date: view.discharge_date.map(timestamp),
        days_hospitalized: view.days_hospitalized,
        saps_score: view.saps_score.map(SapsScore::value),
        status: view.status.to_string(),
        active: view.active,
        bed: view.bed.as_ref().map(bed_summary_res),
    }
}

pub(crate) fn problem_res(problem: &Problem) -> ProblemRes {
    ProblemRes {
        id: problem.id.get(),
        patient_id: problem.patient_id.get(),
        description: problem.description.to_string(),
        is_resolved: problem.is_resolved,
        created_at: timestamp(problem.created_at),
        updated_at: timestamp(problem.updated_at),
    }
}

pub(crate) fn pending_task_res(task: &PendingTask) -> PendingTaskRes {
    PendingTaskRes {
        id: task.id.get(),
        patient_id: task.patient_id.get(),
        description: task.description.to_string(),
        deadline: task.deadline.map(timestamp),
        responsible: task.responsible.clone(),
        is_completed: task.is_completed,
        created_at: timestamp(task.created_at),
        updated_at: timestamp(task.updated_at),
    }
}

pub(crate) fn patient_detail_res(detail: &PatientDetail) -> PatientDetailRes {
    PatientDetailRes {
        patient: patient_view_res(&detail.view),
        problems: detail.problems.iter().map(problem_res).collect(),
        pending_tasks: detail.pending_tasks.iter().map(pending_task_res).collect(),
    }
}

pub(crate) fn patient_res(patient: &Patient) -> PatientRes {
    PatientRes {
        id: patient.id.get(),
        name: patient.name.to_string(),
        age: patient.age,
        gender: patient.gender.to_string(),
        medical_record_number: patient.medical_record_number.to_string(),
        main_diagnosis: patient.main_diagnosis.to_string(),
        diagnosis_code: patient.diagnosis_code.clone(),
        secondary_diagnoses: patient.secondary_diagnoses.clone(),
        bed_id: patient.bed_id.map(BedId::get),
        admission_date: timestamp(patient.admission_date),
        discharge_date: patient.discharge_date.map(timestamp),
        saps_score: patient.saps_score.map(SapsScore::value),
        active: patient.active,
        created_at: timestamp(patient.created_at),
        updated_at: timestamp(patient.updated_at),
    }
}

pub(crate) fn new_bed(req: CreateBedReq) -> WardResult<NewBed> {
    Ok(NewBed {
        bed_number: text("bedNumber", req.bed_number)?,
        wing: text("wing", req.wing)?,
        floor: req.floor,
        status: req.status.as_deref().map(str::parse::<BedStatus>).transpose()?,
    })
}

pub(crate) fn new_patient(req: AdmitPatientReq) -> WardResult<NewPatient> {
    Ok(NewPatient {
        name: text("name", req.name)?,
        age: req.age,
        gender: req.gender.parse::<Gender>()?,
        medical_record_number: text("medicalRecordNumber", req.medical_record_number)?,
        main_diagnosis: text("mainDiagnosis", req.main_diagnosis)?,
        diagnosis_code: optional(req.diagnosis_code),
        secondary_diagnoses: req.secondary_diagnoses,
        bed_id: req.bed_id.map(BedId::new),
        saps_score: req.saps_score.map(SapsScore::new),
        admitted_at: optional(req.admission_date)
            .map(|v| parse_timestamp("admissionDate", &v))
            .transpose()?,
    })
}

pub(crate) fn patient_update(req: UpdatePatientReq) -> WardResult<PatientUpdate> {
    Ok(PatientUpdate {
        name: req.name.map(|v| text("name", v)).transpose()?,
        age: req.age,
        gender: req.gender.as_deref().map(str::parse::<Gender>).transpose()?,
        main_diagnosis: req
            .main_diagnosis
            .map(|v| text("mainDiagnosis", v))
            .transpose()?,
        diagnosis_code: optional(req.diagnosis_code),
        secondary_diagnoses: req.secondary_diagnoses,
        saps_score: req.saps_score.map(SapsScore::new),
        bed_id: req.bed_id.map(BedId::new),
    })
}

pub(crate) fn new_problem(req: NewProblemReq) -> WardResult<NewProblem> {
    Ok(NewProblem {
        description: text("description", req.description)?,
        is_resolved: req.is_resolved,
    })
}

pub(crate) fn new_pending_task(req: NewPendingTaskReq) -> WardResult<NewPendingTask> {
    Ok(NewPendingTask {
        description: text("description", req.description)?,
        deadline: optional(req.deadline)
            .map(|v| parse_timestamp("deadline", &v))
            .transpose()?,
        responsible: optional(req.responsible),
        is_completed: req.is_completed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admission() -> AdmitPatientReq {
        AdmitPatientReq {
            name: "Ana Souza".into(),
            age: 58,
            gender: "female".into(),
            medical_record_number: "MRN-0042".into(),
            main_diagnosis: "Pneumonia".into(),
            diagnosis_code: Some(" ".into()),
            secondary_diagnoses: vec![],
            bed_id: Some(2),
            saps_score: Some(41),
            admission_date: Some("2026-10-01T09:00:00-03:00".into()),
        }
    }

    #[test]
    fn admission_is_validated_and_normalised() {
        let new = new_patient(admission()).unwrap();
        assert_eq!(new.gender, Gender::Female);
        assert_eq!(new.diagnosis_code, None);
        assert_eq!(new.bed_id, Some(BedId::new(2)));
        assert_eq!(
            new.admitted_at.map(|ts| ts.to_rfc3339()),
            Some("2026-10-01T12:00:00+00:00".to_string())
        );
    }

    #[test]
    fn admission_rejects_blank_name_and_bad_timestamp() {
        let mut req = admission();
        req.name = "   ".into();
        assert!(matches!(
            new_patient(req),
            Err(WardError::InvalidInput(msg)) if msg.contains("name")
        ));

        let mut req = admission();
        req.admission_date = Some("yesterday".into());
        assert!(matches!(
            new_patient(req),
            Err(WardError::InvalidInput(msg)) if msg.contains("admissionDate")
        ));
    }

    #[test]
    fn bed_request_parses_optional_status() {
        let bed = new_bed(CreateBedReq {
            bed_number: "104".into(),
            wing: "East".into(),
            floor: 2,
            status: Some("critical".into()),
        })
        .unwrap();
        assert_eq!(bed.status, Some(BedStatus::Critical));

        let err = new_bed(CreateBedReq {
            bed_number: "104".into(),
            wing: "East".into(),
            floor: 2,
            status: Some("busy".into()),
        })
        .unwrap_err();
        assert!(matches!(err, WardError::InvalidInput(_)));
    }

    #[test]
    fn blank_diagnosis_code_in_update_is_ignored() {
        let update = patient_update(UpdatePatientReq {
            diagnosis_code: Some("   ".into()),
            saps_score: Some(12),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(update.diagnosis_code, None);
        assert_eq!(update.saps_score, Some(SapsScore::new(12)));

        let update = patient_update(UpdatePatientReq {
            diagnosis_code: Some("J18.9".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(update.diagnosis_code.as_deref(), Some("J18.9"));
    }
}
