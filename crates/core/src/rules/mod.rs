//! Bed/patient status rules.
//!
//! Everything in here is a pure projection over records fetched by the caller:
//! - [`severity`] maps a SAPS score to a [`crate::BedStatus`]
//! - [`duration`] counts whole days in hospital
//! - [`aggregate`] combines a patient and its bed into a [`PatientView`]
//! - [`roster`] lays the views out as one row per bed
//!
//! None of these functions touch the store.

pub mod aggregate;
pub mod duration;
pub mod roster;
pub mod severity;

pub use aggregate::{aggregate, BedSummary, PatientView};
pub use duration::{days_hospitalized, days_hospitalized_as_of};
pub use roster::{build_roster, BedRow, RosterPatient};
pub use severity::{classify, classify_occupant, UnscoredOccupantPolicy};
