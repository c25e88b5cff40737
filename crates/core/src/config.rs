//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services, so
//! request handling never reads process-wide environment variables.

use crate::rules::UnscoredOccupantPolicy;
use crate::{WardError, WardResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoreConfig {
    unscored_occupant_policy: UnscoredOccupantPolicy,
    bed_topology: Option<PathBuf>,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    pub fn new(
        unscored_occupant_policy: UnscoredOccupantPolicy,
        bed_topology: Option<PathBuf>,
    ) -> Self {
        Self {
            unscored_occupant_policy,
            bed_topology,
        }
    }

    /// Status policy applied to occupied beds whose patient has no SAPS score yet.
    pub fn unscored_occupant_policy(&self) -> UnscoredOccupantPolicy {
        self.unscored_occupant_policy
    }

    /// Bed topology file used to seed the store, if any.
    pub fn bed_topology(&self) -> Option<&Path> {
        self.bed_topology.as_deref()
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self::new(UnscoredOccupantPolicy::default(), None)
    }
}

/// Parse the unscored occupant policy from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default policy (`stable`).
///
/// # Errors
///
/// Returns [`WardError::InvalidInput`] if the value is neither `stable` nor `available`.
pub fn unscored_policy_from_env_value(value: Option<String>) -> WardResult<UnscoredOccupantPolicy> {
    let value = value
        .map(|v| v.trim().to_ascii_lowercase())
        .filter(|v| !v.is_empty());
    let parsed = value.map(|v| v.parse::<UnscoredOccupantPolicy>()).transpose()?;

    Ok(parsed.unwrap_or_default())
}

/// Resolve the bed topology file without reading environment variables.
///
/// An empty override is treated as unset.
///
/// # Errors
///
/// Returns [`WardError::InvalidInput`] if the override is set but is not a regular file.
pub fn resolve_bed_topology(override_path: Option<PathBuf>) -> WardResult<Option<PathBuf>> {
    let Some(path) = override_path.filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(None);
    };

    if !path.is_file() {
        return Err(WardError::InvalidInput(format!(
            "bed topology file does not exist: {}",
            path.display()
        )));
    }

    Ok(Some(path))
}
