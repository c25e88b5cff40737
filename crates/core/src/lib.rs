//! # Ward Core
//!
//! Core logic for the ICU bed-monitoring dashboard.
//!
//! This crate contains:
//! - the rules engine: severity classification, length of stay, patient-bed aggregation and the
//!   bed roster
//! - the ward records and the [`WardStore`] boundary, with an in-memory implementation
//! - [`WardService`], the operations front ends call
//! - bed topology and census file parsing
//!
//! **No API concerns**: authentication and HTTP servers belong in `api-rest` and `api-shared`.

pub mod config;
pub mod constants;
mod error;
pub mod model;
pub mod rules;
pub mod service;
pub mod store;
pub mod topology;

#[cfg(test)]
pub(crate) mod fixtures;

pub use config::CoreConfig;
pub use error::{WardError, WardResult};
pub use model::{
    Bed, BedStatus, Gender, NewBed, NewPatient, NewPendingTask, NewProblem, Patient,
    PatientUpdate, PendingTask, Problem, SapsScore,
};
pub use service::{PatientDetail, WardService};
pub use store::{InMemoryWardStore, PatientChange, WardStore};
pub use topology::{BedTopology, Census, CensusEntry};

pub use ward_types::{BedId, NonEmptyText, PatientId, PendingTaskId, ProblemId, TextError};
