//! Bed topology and census files.
//!
//! The topology is the static list of beds in the unit and seeds the store at startup. A census
//! is a snapshot of admitted patients, keyed by bed number, used by offline tooling.
//!
//! Both formats are YAML and strict: unknown keys are rejected and errors name the failing path
//! (for example `beds[2].floor`).

use crate::{Gender, NewBed, SapsScore, WardError, WardResult};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::Path;
use ward_types::NonEmptyText;

/// Beds to create, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BedTopology {
    beds: Vec<NewBed>,
}

impl BedTopology {
    /// Parse a topology from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`WardError::Topology`] if the YAML does not match the schema.
    pub fn parse(yaml_text: &str) -> WardResult<Self> {
        let wire: TopologyWire = parse_strict(yaml_text).map_err(WardError::Topology)?;
        Ok(Self {
            beds: wire
                .beds
                .into_iter()
                .map(|b| NewBed {
                    bed_number: b.bed_number,
                    wing: b.wing,
                    floor: b.floor,
                    status: None,
                })
                .collect(),
        })
    }

    /// Read and parse a topology file.
    pub fn load(path: &Path) -> WardResult<Self> {
        let text = std::fs::read_to_string(path).map_err(WardError::FileRead)?;
        Self::parse(&text)
    }

    pub fn beds(&self) -> &[NewBed] {
        &self.beds
    }
}

/// One admitted patient in a census file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CensusEntry {
    pub name: NonEmptyText,
    pub age: u32,
    pub gender: Gender,
    pub medical_record_number: NonEmptyText,
    pub main_diagnosis: NonEmptyText,
    #[serde(default)]
    pub diagnosis_code: Option<String>,
    #[serde(default)]
    pub secondary_diagnoses: Vec<String>,
    #[serde(default)]
    pub bed_number: Option<NonEmptyText>,
    #[serde(default)]
    pub saps_score: Option<SapsScore>,
    #[serde(default)]
    pub admitted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Census {
    patients: Vec<CensusEntry>,
}

impl Census {
    /// Parse a census from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`WardError::Census`] if the YAML does not match the schema.
    pub fn parse(yaml_text: &str) -> WardResult<Self> {
        let wire: CensusWire = parse_strict(yaml_text).map_err(WardError::Census)?;
        Ok(Self {
            patients: wire.patients,
        })
    }

    pub fn load(path: &Path) -> WardResult<Self> {
        let text = std::fs::read_to_string(path).map_err(WardError::FileRead)?;
        Self::parse(&text)
    }

    pub fn patients(&self) -> &[CensusEntry] {
        &self.patients
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TopologyWire {
    beds: Vec<BedWire>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BedWire {
    bed_number: NonEmptyText,
    wing: NonEmptyText,
    floor: i32,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CensusWire {
    #[serde(default)]
    patients: Vec<CensusEntry>,
}

fn parse_strict<T: DeserializeOwned>(yaml_text: &str) -> Result<T, String> {
    let deserializer = serde_yaml::Deserializer::from_str(yaml_text);
    serde_path_to_error::deserialize::<_, T>(deserializer).map_err(|err| {
        let path = err.path().to_string();
        let source = err.into_inner();
        let path = if path.is_empty() || path == "." {
            "<root>".to_string()
        } else {
            path
        };
        format!("at {path}: {source}")
    })
}
