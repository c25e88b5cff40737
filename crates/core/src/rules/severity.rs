//! SAPS score banding.

use crate::constants::{ATTENTION_SAPS_THRESHOLD, CRITICAL_SAPS_THRESHOLD};
use crate::{BedStatus, SapsScore, WardError};
use std::str::FromStr;

/// Maps a SAPS score to a bed status.
///
/// Lower bounds are inclusive: 60 and above is critical, 40 to 59 needs attention, anything
/// lower (including 0) is stable. An absent score maps to `available`.
pub fn classify(score: Option<SapsScore>) -> BedStatus {
    match score.map(SapsScore::value) {
        None => BedStatus::Available,
        Some(s) if s >= CRITICAL_SAPS_THRESHOLD => BedStatus::Critical,
        Some(s) if s >= ATTENTION_SAPS_THRESHOLD => BedStatus::Attention,
        Some(_) => BedStatus::Stable,
    }
}

/// Status for a bed that is known to be occupied.
///
/// Scored occupants are banded by [`classify`]; unscored occupants get the status chosen by
/// `policy`.
pub fn classify_occupant(score: Option<SapsScore>, policy: UnscoredOccupantPolicy) -> BedStatus {
    match score {
        Some(_) => classify(score),
        None => policy.status(),
    }
}

/// What an occupied bed shows before its patient has been scored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum UnscoredOccupantPolicy {
    /// Occupied but unscored beds show as `stable`.
    #[default]
    Stable,
    /// Occupied but unscored beds show as `available`, the same as an empty bed.
    Available,
}

impl UnscoredOccupantPolicy {
    pub fn status(self) -> BedStatus {
        match self {
            UnscoredOccupantPolicy::Stable => BedStatus::Stable,
            UnscoredOccupantPolicy::Available => BedStatus::Available,
        }
    }
}

impl FromStr for UnscoredOccupantPolicy {
    type Err = WardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stable" => Ok(UnscoredOccupantPolicy::Stable),
            "available" => Ok(UnscoredOccupantPolicy::Available),
            other => Err(WardError::InvalidInput(format!(
                "unscored occupant status must be 'stable' or 'available', got '{other}'"
            ))),
        }
    }
}
