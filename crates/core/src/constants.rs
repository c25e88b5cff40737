//! Constants used throughout the ward core crate.
//!
//! Severity banding thresholds and configuration defaults live here so the rules engine, the
//! configuration layer and the binaries agree on them.

/// SAPS score at or above which an occupied bed is `critical`.
pub const CRITICAL_SAPS_THRESHOLD: u32 = 60;

/// SAPS score at or above which an occupied bed is `attention` (below the critical threshold).
pub const ATTENTION_SAPS_THRESHOLD: u32 = 40;

/// Default REST bind address when `WARD_REST_ADDR` is not set.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:3000";

/// Environment variable naming the REST bind address.
pub const REST_ADDR_ENV: &str = "WARD_REST_ADDR";

/// Environment variable holding the API key expected by the REST layer.
pub const API_KEY_ENV: &str = "WARD_API_KEY";

/// Environment variable pointing at the bed topology YAML file.
pub const BED_TOPOLOGY_ENV: &str = "WARD_BED_TOPOLOGY";

/// Environment variable selecting the status shown for occupied beds without a SAPS score.
pub const UNSCORED_OCCUPANT_STATUS_ENV: &str = "WARD_UNSCORED_OCCUPANT_STATUS";
