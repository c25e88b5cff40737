use ward_types::{BedId, PatientId, PendingTaskId, ProblemId, TextError};

#[derive(Debug, thiserror::Error)]
pub enum WardError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("bed {0} not found")]
    BedNotFound(BedId),
    #[error("patient {0} not found")]
    PatientNotFound(PatientId),
    #[error("problem {0} not found")]
    ProblemNotFound(ProblemId),
    #[error("pending task {0} not found")]
    PendingTaskNotFound(PendingTaskId),

    #[error("bed {0} already has an active occupant")]
    BedOccupied(BedId),
    #[error("bed number {0} already exists")]
    DuplicateBedNumber(String),
    #[error("medical record number {0} already exists")]
    DuplicateMedicalRecordNumber(String),
    #[error("patient {0} has already been discharged")]
    PatientDischarged(PatientId),

    #[error("ward store lock poisoned")]
    StorePoisoned,

    #[error("failed to read file: {0}")]
    FileRead(std::io::Error),
    #[error("bed topology schema mismatch: {0}")]
    Topology(String),
    #[error("census schema mismatch: {0}")]
    Census(String),
}

impl From<TextError> for WardError {
    fn from(err: TextError) -> Self {
        WardError::InvalidInput(err.to_string())
    }
}

pub type WardResult<T> = std::result::Result<T, WardError>;
