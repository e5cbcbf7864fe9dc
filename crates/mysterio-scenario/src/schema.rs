//! Scenario-schema definition: which phase tags exist and in what order.
//!
//! The definition is loaded once at startup, either from a JSON file or from
//! the bundled standard definition, and is then shared read-only.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::model::Phase;

/// The standard definition, as shipped in `schema/standard.json`.
pub const STANDARD_DEFINITION: &str = include_str!("../schema/standard.json");

/// Errors raised while loading a scenario-schema definition.
#[derive(Debug, Error)]
pub enum SchemaDefinitionError {
    /// The definition file could not be read.
    #[error("failed to read scenario schema {path}: {source}")]
    Io {
        /// Path of the definition file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The definition is not valid JSON or has the wrong shape.
    #[error("failed to parse scenario schema: {0}")]
    Parse(#[from] serde_json::Error),

    /// The definition parsed but is inconsistent.
    #[error("invalid scenario schema: {0}")]
    Invalid(String),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct SchemaDefinition {
    phase_order: Vec<Phase>,
    #[serde(default)]
    required_phases: Vec<Phase>,
}

/// The fixed phase order every scenario must follow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioSchema {
    phase_order: Vec<Phase>,
    required_phases: Vec<Phase>,
}

impl ScenarioSchema {
    /// The standard schema: every phase tag in declaration order, with the
    /// introduction and voting phases mandatory.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            phase_order: Phase::ALL.to_vec(),
            required_phases: vec![Phase::Introduction, Phase::Voting],
        }
    }

    /// Builds a schema from explicit parts.
    ///
    /// # Errors
    ///
    /// Returns `SchemaDefinitionError::Invalid` if the order is empty or
    /// repeats a tag, or if a required phase is not part of the order.
    pub fn new(
        phase_order: Vec<Phase>,
        required_phases: Vec<Phase>,
    ) -> Result<Self, SchemaDefinitionError> {
        if phase_order.is_empty() {
            return Err(SchemaDefinitionError::Invalid(
                "phase order must not be empty".to_owned(),
            ));
        }

        let mut seen = HashSet::new();
        if let Some(duplicate) = phase_order.iter().find(|phase| !seen.insert(**phase)) {
            return Err(SchemaDefinitionError::Invalid(format!(
                "phase `{duplicate}` appears more than once in the phase order"
            )));
        }

        if let Some(missing) = required_phases.iter().find(|phase| !seen.contains(*phase)) {
            return Err(SchemaDefinitionError::Invalid(format!(
                "required phase `{missing}` is not part of the phase order"
            )));
        }

        Ok(Self {
            phase_order,
            required_phases,
        })
    }

    /// Parses a JSON definition.
    ///
    /// # Errors
    ///
    /// Returns `SchemaDefinitionError::Parse` for malformed JSON and
    /// `SchemaDefinitionError::Invalid` for an inconsistent definition.
    pub fn from_json_str(json: &str) -> Result<Self, SchemaDefinitionError> {
        let definition: SchemaDefinition = serde_json::from_str(json)?;
        Self::new(definition.phase_order, definition.required_phases)
    }

    /// Reads and parses a JSON definition file.
    ///
    /// # Errors
    ///
    /// Returns `SchemaDefinitionError::Io` if the file cannot be read, or any
    /// error of [`ScenarioSchema::from_json_str`].
    pub fn from_path(path: &Path) -> Result<Self, SchemaDefinitionError> {
        let json = std::fs::read_to_string(path).map_err(|source| SchemaDefinitionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Phase tags in their only valid progression order.
    #[must_use]
    pub fn phase_order(&self) -> &[Phase] {
        &self.phase_order
    }

    /// Phase tags every scenario must contain.
    #[must_use]
    pub fn required_phases(&self) -> &[Phase] {
        &self.required_phases
    }

    /// Position of `phase` in the phase order, or `None` if undeclared.
    #[must_use]
    pub fn position(&self, phase: Phase) -> Option<usize> {
        self.phase_order.iter().position(|declared| *declared == phase)
    }
}

impl Default for ScenarioSchema {
    fn default() -> Self {
        Self::standard()
    }
}
