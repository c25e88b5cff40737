//! HTTP handlers.
//!
//! Each handler converts the wire request, calls [`ward_core::WardService`] and converts the
//! result back. Core errors are mapped by [`ward_error`].

use axum::{
    extract::{rejection::JsonRejection, Path as AxumPath, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::convert;
use crate::AppState;
use api_shared::{
    AdmitPatientReq, BedRes, BedRowRes, CreateBedReq, HealthRes, HealthService, MessageRes,
    NewPendingTaskReq, NewProblemReq, PatientDetailRes, PatientRes, PendingTaskRes, ProblemRes,
    UpdateBedStatusReq, UpdatePatientReq,
};
use ward_core::{BedId, BedStatus, PatientId, PendingTaskId, ProblemId, WardError};

type ApiError = (StatusCode, &'static str);

/// Maps a core error to a status code and a fixed message.
///
/// Internal failures are logged with `context`; client errors are not.
pub(crate) fn ward_error(context: &str, err: WardError) -> ApiError {
    match err {
        WardError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "Invalid input"),
        WardError::BedNotFound(_) => (StatusCode::NOT_FOUND, "Bed not found"),
        WardError::PatientNotFound(_) => (StatusCode::NOT_FOUND, "Patient not found"),
        WardError::ProblemNotFound(_) => (StatusCode::NOT_FOUND, "Problem not found"),
        WardError::PendingTaskNotFound(_) => (StatusCode::NOT_FOUND, "Pending task not found"),
        WardError::BedOccupied(_) => (StatusCode::CONFLICT, "Bed is not available"),
        WardError::DuplicateBedNumber(_) => (StatusCode::CONFLICT, "Bed number already exists"),
        WardError::DuplicateMedicalRecordNumber(_) => {
            (StatusCode::CONFLICT, "Medical record number already exists")
        }
        WardError::PatientDischarged(_) => {
            (StatusCode::CONFLICT, "Patient has already been discharged")
        }
        e @ (WardError::StorePoisoned
        | WardError::FileRead(_)
        | WardError::Topology(_)
        | WardError::Census(_)) => {
            tracing::error!("{context} error: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
        }
    }
}

/// Logs a rejected request body at debug level and maps it.
fn invalid(context: &str, err: WardError) -> ApiError {
    tracing::debug!("{context} rejected: {err}");
    ward_error(context, err)
}

/// Unwraps a JSON body, answering any rejection with 400.
///
/// Covers malformed JSON, a missing field and out-of-range numbers such as a negative score.
fn body<T>(context: &str, payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match payload {
        Ok(Json(req)) => Ok(req),
        Err(rejection) => {
            tracing::debug!("{context} rejected: {}", rejection.body_text());
            Err((StatusCode::BAD_REQUEST, "Invalid input"))
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct DetailQuery {
    /// Leave out resolved problems and completed pending tasks.
    #[serde(default)]
    open_only: bool,
}

#[utoipa::path(
    get,
    path = "/health",
    security(()),
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks. Does not require an API key.
pub(crate) async fn health() -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/dashboard",
    responses(
        (status = 200, description = "One row per bed, ordered by bed number", body = [BedRowRes]),
        (status = 401, description = "Missing or invalid API key"),
        (status = 500, description = "Internal server error")
    )
)]
/// Bed roster for the dashboard
///
/// Every bed appears exactly once. Occupied beds carry the status computed from the occupant's
/// SAPS score and a reduced patient record; empty beds are `available`.
#[axum::debug_handler]
pub(crate) async fn dashboard(
    State(state): State<AppState>,
) -> Result<Json<Vec<BedRowRes>>, ApiError> {
    let rows = state
        .service()
        .dashboard()
        .map_err(|e| ward_error("Dashboard", e))?;
    Ok(Json(rows.iter().map(convert::bed_row_res).collect()))
}

#[utoipa::path(
    get,
    path = "/beds",
    responses(
        (status = 200, description = "Beds with their stored status", body = [BedRes]),
        (status = 401, description = "Missing or invalid API key"),
        (status = 500, description = "Internal server error")
    )
)]
#[axum::debug_handler]
pub(crate) async fn list_beds(
    State(state): State<AppState>,
) -> Result<Json<Vec<BedRes>>, ApiError> {
    let beds = state
        .service()
        .list_beds()
        .map_err(|e| ward_error("List beds", e))?;
    Ok(Json(beds.iter().map(convert::bed_res).collect()))
}

#[utoipa::path(
    post,
    path = "/beds",
    request_body = CreateBedReq,
    responses(
        (status = 201, description = "Bed created", body = BedRes),
        (status = 400, description = "Bad request"),
        (status = 401, description = "Missing or invalid API key"),
        (status = 409, description = "Bed number already exists")
    )
)]
#[axum::debug_handler]
pub(crate) async fn create_bed(
    State(state): State<AppState>,
    payload: Result<Json<CreateBedReq>, JsonRejection>,
) -> Result<(StatusCode, Json<BedRes>), ApiError> {
    let req = body("Create bed", payload)?;
    let new = convert::new_bed(req).map_err(|e| invalid("Create bed", e))?;
    let bed = state
        .service()
        .create_bed(new)
        .map_err(|e| ward_error("Create bed", e))?;
    Ok((StatusCode::CREATED, Json(convert::bed_res(&bed))))
}

#[utoipa::path(
    patch,
    path = "/beds/{id}/status",
    params(("id" = u64, Path, description = "Bed id")),
    request_body = UpdateBedStatusReq,
    responses(
        (status = 200, description = "Bed status updated", body = MessageRes),
        (status = 400, description = "Invalid status"),
        (status = 401, description = "Missing or invalid API key"),
        (status = 404, description = "Bed not found")
    )
)]
/// Overwrite a bed's stored status
///
/// The dashboard still recomputes the status of occupied beds.
#[axum::debug_handler]
pub(crate) async fn update_bed_status(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<u64>,
    payload: Result<Json<UpdateBedStatusReq>, JsonRejection>,
) -> Result<Json<MessageRes>, ApiError> {
    let req = body("Update bed status", payload)?;
    let status = req
        .status
        .parse::<BedStatus>()
        .map_err(|e| invalid("Update bed status", e))?;
    state
        .service()
        .set_bed_status(BedId::new(id), status)
        .map_err(|e| ward_error("Update bed status", e))?;
    Ok(Json(MessageRes {
        message: "Bed status updated successfully".into(),
    }))
}

#[utoipa::path(
    post,
    path = "/patients",
    request_body = AdmitPatientReq,
    responses(
        (status = 201, description = "Patient admitted", body = PatientRes),
        (status = 400, description = "Bad request"),
        (status = 401, description = "Missing or invalid API key"),
        (status = 404, description = "Bed not found"),
        (status = 409, description = "Bed occupied or medical record number taken")
    )
)]
/// Admit a patient
///
/// When a bed is given it must exist and have no active occupant. The bed's stored status is
/// set from the patient's SAPS score.
#[axum::debug_handler]
pub(crate) async fn admit_patient(
    State(state): State<AppState>,
    payload: Result<Json<AdmitPatientReq>, JsonRejection>,
) -> Result<(StatusCode, Json<PatientRes>), ApiError> {
    let req = body("Admit patient", payload)?;
    let new = convert::new_patient(req).map_err(|e| invalid("Admit patient", e))?;
    let patient = state
        .service()
        .admit_patient(new)
        .map_err(|e| ward_error("Admit patient", e))?;
    Ok((StatusCode::CREATED, Json(convert::patient_res(&patient))))
}

#[utoipa::path(
    get,
    path = "/patients/{id}",
    params(("id" = u64, Path, description = "Patient id"), DetailQuery),
    responses(
        (status = 200, description = "Patient detail", body = PatientDetailRes),
        (status = 401, description = "Missing or invalid API key"),
        (status = 404, description = "Patient not found")
    )
)]
/// Patient detail
///
/// Works for discharged patients too. Problems and pending tasks are listed newest first.
#[axum::debug_handler]
pub(crate) async fn get_patient(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<u64>,
    Query(query): Query<DetailQuery>,
) -> Result<Json<PatientDetailRes>, ApiError> {
    let detail = state
        .service()
        .patient_detail(PatientId::new(id), query.open_only)
        .map_err(|e| ward_error("Get patient", e))?;
    Ok(Json(convert::patient_detail_res(&detail)))
}

#[utoipa::path(
    patch,
    path = "/patients/{id}",
    params(("id" = u64, Path, description = "Patient id")),
    request_body = UpdatePatientReq,
    responses(
        (status = 200, description = "Patient updated", body = PatientRes),
        (status = 400, description = "Bad request"),
        (status = 401, description = "Missing or invalid API key"),
        (status = 404, description = "Patient or bed not found"),
        (status = 409, description = "Target bed occupied or patient discharged")
    )
)]
/// Partially update a patient
///
/// A new SAPS score or bed is written through to the bed's stored status.
#[axum::debug_handler]
pub(crate) async fn update_patient(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<u64>,
    payload: Result<Json<UpdatePatientReq>, JsonRejection>,
) -> Result<Json<PatientRes>, ApiError> {
    let req = body("Update patient", payload)?;
    let update = convert::patient_update(req).map_err(|e| invalid("Update patient", e))?;
    let patient = state
        .service()
        .update_patient(PatientId::new(id), update)
        .map_err(|e| ward_error("Update patient", e))?;
    Ok(Json(convert::patient_res(&patient)))
}

#[utoipa::path(
    post,
    path = "/patients/{id}/discharge",
    params(("id" = u64, Path, description = "Patient id")),
    responses(
        (status = 200, description = "Patient discharged", body = PatientRes),
        (status = 401, description = "Missing or invalid API key"),
        (status = 404, description = "Patient not found"),
        (status = 409, description = "Patient already discharged")
    )
)]
#[axum::debug_handler]
pub(crate) async fn discharge_patient(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<u64>,
) -> Result<Json<PatientRes>, ApiError> {
    let patient = state
        .service()
        .discharge_patient(PatientId::new(id))
        .map_err(|e| ward_error("Discharge patient", e))?;
    Ok(Json(convert::patient_res(&patient)))
}

#[utoipa::path(
    post,
    path = "/patients/{id}/problems",
    params(("id" = u64, Path, description = "Patient id")),
    request_body = NewProblemReq,
    responses(
        (status = 201, description = "Problem recorded", body = ProblemRes),
        (status = 400, description = "Bad request"),
        (status = 401, description = "Missing or invalid API key"),
        (status = 404, description = "Patient not found")
    )
)]
#[axum::debug_handler]
pub(crate) async fn add_problem(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<u64>,
    payload: Result<Json<NewProblemReq>, JsonRejection>,
) -> Result<(StatusCode, Json<ProblemRes>), ApiError> {
    let req = body("Add problem", payload)?;
    let new = convert::new_problem(req).map_err(|e| invalid("Add problem", e))?;
    let problem = state
        .service()
        .add_problem(PatientId::new(id), new)
        .map_err(|e| ward_error("Add problem", e))?;
    Ok((StatusCode::CREATED, Json(convert::problem_res(&problem))))
}

#[utoipa::path(
    patch,
    path = "/patients/problems/{id}/resolve",
    params(("id" = u64, Path, description = "Problem id")),
    responses(
        (status = 200, description = "Problem resolved", body = ProblemRes),
        (status = 401, description = "Missing or invalid API key"),
        (status = 404, description = "Problem not found")
    )
)]
#[axum::debug_handler]
pub(crate) async fn resolve_problem(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<u64>,
) -> Result<Json<ProblemRes>, ApiError> {
    let problem = state
        .service()
        .resolve_problem(ProblemId::new(id))
        .map_err(|e| ward_error("Resolve problem", e))?;
    Ok(Json(convert::problem_res(&problem)))
}

#[utoipa::path(
    post,
    path = "/patients/{id}/pending",
    params(("id" = u64, Path, description = "Patient id")),
    request_body = NewPendingTaskReq,
    responses(
        (status = 201, description = "Pending task recorded", body = PendingTaskRes),
        (status = 400, description = "Bad request"),
        (status = 401, description = "Missing or invalid API key"),
        (status = 404, description = "Patient not found")
    )
)]
#[axum::debug_handler]
pub(crate) async fn add_pending_task(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<u64>,
    payload: Result<Json<NewPendingTaskReq>, JsonRejection>,
) -> Result<(StatusCode, Json<PendingTaskRes>), ApiError> {
    let req = body("Add pending task", payload)?;
    let new = convert::new_pending_task(req).map_err(|e| invalid("Add pending task", e))?;
    let task = state
        .service()
        .add_pending_task(PatientId::new(id), new)
        .map_err(|e| ward_error("Add pending task", e))?;
    Ok((StatusCode::CREATED, Json(convert::pending_task_res(&task))))
}

#[utoipa::path(
    patch,
    path = "/patients/pending/{id}/complete",
    params(("id" = u64, Path, description = "Pending task id")),
    responses(
        (status = 200, description = "Pending task completed", body = PendingTaskRes),
        (status = 401, description = "Missing or invalid API key"),
        (status = 404, description = "Pending task not found")
    )
)]
#[axum::debug_handler]
pub(crate) async fn complete_pending_task(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<u64>,
) -> Result<Json<PendingTaskRes>, ApiError> {
    let task = state
        .service()
        .complete_pending_task(PendingTaskId::new(id))
        .map_err(|e| ward_error("Complete pending task", e))?;
    Ok(Json(convert::pending_task_res(&task)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_4xx() {
        let cases = [
            (WardError::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (WardError::BedNotFound(BedId::new(1)), StatusCode::NOT_FOUND),
            (WardError::PatientNotFound(PatientId::new(1)), StatusCode::NOT_FOUND),
            (WardError::BedOccupied(BedId::new(1)), StatusCode::CONFLICT),
            (WardError::DuplicateMedicalRecordNumber("M".into()), StatusCode::CONFLICT),
            (WardError::PatientDischarged(PatientId::new(1)), StatusCode::CONFLICT),
        ];
        for (err, status) in cases {
            assert_eq!(ward_error("test", err).0, status);
        }
    }

    #[test]
    fn internal_errors_hide_details() {
        let (status, message) = ward_error("test", WardError::StorePoisoned);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "Internal error");
    }
}
