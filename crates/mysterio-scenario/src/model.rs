//! Typed representation of a mystery scenario.
//!
//! Every type here mirrors one level of the scenario document. Values are
//! only ever built from a document that passed [`crate::validator::validate`],
//! see [`ValidatedScenario`].

use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::ScenarioSchema;
use crate::validator::{self, SchemaError};

/// One step of the closed phase progression.
///
/// Which phases a scenario uses, and in which order, is fixed by the
/// [`ScenarioSchema`]; the enum only names the tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Case overview and role briefing.
    Introduction,
    /// First investigation stage.
    Investigation1,
    /// Second investigation stage.
    Investigation2,
    /// Third investigation stage.
    Investigation3,
    /// Fourth investigation stage.
    Investigation4,
    /// Open discussion.
    Discussion,
    /// Players accuse a suspect.
    Voting,
    /// The truth is revealed.
    Reveal,
}

impl Phase {
    /// Every phase tag, in declaration order.
    pub const ALL: [Phase; 8] = [
        Phase::Introduction,
        Phase::Investigation1,
        Phase::Investigation2,
        Phase::Investigation3,
        Phase::Investigation4,
        Phase::Discussion,
        Phase::Voting,
        Phase::Reveal,
    ];

    /// Returns the wire tag of this phase.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Introduction => "introduction",
            Phase::Investigation1 => "investigation1",
            Phase::Investigation2 => "investigation2",
            Phase::Investigation3 => "investigation3",
            Phase::Investigation4 => "investigation4",
            Phase::Discussion => "discussion",
            Phase::Voting => "voting",
            Phase::Reveal => "reveal",
        }
    }

    /// Parses a wire tag.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Phase> {
        Phase::ALL.into_iter().find(|phase| phase.as_str() == tag)
    }

    /// The `n`-th investigation stage (1-based), if the schema names one.
    #[must_use]
    pub fn investigation(stage: usize) -> Option<Phase> {
        match stage {
            1 => Some(Phase::Investigation1),
            2 => Some(Phase::Investigation2),
            3 => Some(Phase::Investigation3),
            4 => Some(Phase::Investigation4),
            _ => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of a role, unique within one scenario.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(String);

impl RoleId {
    /// Creates a role identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Scenario metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ScenarioMeta {
    /// Scenario title.
    pub title: String,
    /// Target play time in minutes.
    pub duration_minutes: u32,
    /// Number of players the scenario was written for.
    pub player_count: u32,
}

/// A piece of hidden knowledge held by a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Secret {
    /// The role this secret is about, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_role_id: Option<RoleId>,
    /// Free-text content.
    pub content: String,
}

/// A character identity within the scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Role {
    /// Role identifier.
    pub id: RoleId,
    /// Display name of the character.
    pub name: String,
    /// Public description of the character.
    pub description: String,
    /// Secrets known only to the holder of this role.
    #[serde(default)]
    pub secrets: Vec<Secret>,
}

/// Content of a phase visible to everyone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PublicBlock {
    /// Short description of the phase.
    pub description: String,
    /// Longer narrative text read to all players.
    #[serde(default)]
    pub text: String,
    /// Actions the authors suggest for this phase.
    #[serde(default)]
    pub actions: Vec<String>,
}

/// Content of a phase visible only to the holder of one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PrivateBlock {
    /// The role allowed to see these hints.
    pub role_id: RoleId,
    /// Hint strings, in authored order.
    pub hints: Vec<String>,
}

/// Public and private content of one phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PhaseContent {
    /// Phase tag.
    pub phase: Phase,
    /// Content shown to every player.
    pub public: PublicBlock,
    /// Role-gated content.
    #[serde(default)]
    pub private: Vec<PrivateBlock>,
}

/// An authored mystery: metadata, roles, and ordered phases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Scenario {
    /// Scenario metadata.
    pub meta: ScenarioMeta,
    /// The solution, revealed with the result.
    pub truth: String,
    /// Roles in declaration order.
    pub roles: Vec<Role>,
    /// Phases in progression order.
    pub phases: Vec<PhaseContent>,
}

impl Scenario {
    /// Looks up a role by identifier.
    #[must_use]
    pub fn role(&self, id: &RoleId) -> Option<&Role> {
        self.roles.iter().find(|role| &role.id == id)
    }

    /// Returns the content of the phase at `index` in progression order.
    #[must_use]
    pub fn phase_at(&self, index: usize) -> Option<&PhaseContent> {
        self.phases.get(index)
    }

    /// Returns the progression index of `phase`, if the scenario uses it.
    #[must_use]
    pub fn position_of(&self, phase: Phase) -> Option<usize> {
        self.phases.iter().position(|content| content.phase == phase)
    }

    /// Index of the final phase.
    #[must_use]
    pub fn last_phase_index(&self) -> usize {
        self.phases.len().saturating_sub(1)
    }
}

/// A [`Scenario`] that is known to conform to the scenario schema.
///
/// The only way to obtain one is [`ValidatedScenario::parse`], so holding a
/// value proves the content crossed the trust boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedScenario(Scenario);

impl ValidatedScenario {
    /// Validates a raw scenario document and builds the typed model from it.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] locating the first non-conforming value.
    pub fn parse(raw: &Value, schema: &ScenarioSchema) -> Result<Self, SchemaError> {
        validator::validate(raw, schema)?;
        let scenario = Scenario::deserialize(raw)
            .map_err(|e| SchemaError::new("", format!("document does not map onto the model: {e}")))?;
        Ok(Self(scenario))
    }

    /// Unwraps the validated scenario.
    #[must_use]
    pub fn into_inner(self) -> Scenario {
        self.0
    }
}

impl Deref for ValidatedScenario {
    type Target = Scenario;

    fn deref(&self) -> &Scenario {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_tags_round_trip_through_from_tag() {
        for phase in Phase::ALL {
            assert_eq!(Phase::from_tag(phase.as_str()), Some(phase));
        }
        assert_eq!(Phase::from_tag("epilogue"), None);
    }

    #[test]
    fn test_phase_serializes_as_lowercase_tag() {
        let json = serde_json::to_value(Phase::Investigation2).unwrap();
        assert_eq!(json, "investigation2");
    }

    #[test]
    fn test_investigation_stage_lookup_is_one_based() {
        assert_eq!(Phase::investigation(1), Some(Phase::Investigation1));
        assert_eq!(Phase::investigation(4), Some(Phase::Investigation4));
        assert_eq!(Phase::investigation(0), None);
        assert_eq!(Phase::investigation(5), None);
    }
}
