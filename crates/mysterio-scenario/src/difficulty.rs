//! Difficulty tiers used to tune generated content.

use std::fmt;
use std::str::FromStr;

use mysterio_core::error::DomainError;
use serde::{Deserialize, Serialize};

/// The supported difficulty tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Short game, one investigation stage.
    Easy,
    /// Regular game, two investigation stages.
    Medium,
    /// Long game, three investigation stages.
    Hard,
}

impl Difficulty {
    /// Returns the wire name of this tier.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Target play time in minutes.
    #[must_use]
    pub fn duration_minutes(self) -> u32 {
        match self {
            Difficulty::Easy => 60,
            Difficulty::Medium => 90,
            Difficulty::Hard => 120,
        }
    }

    /// Number of investigation stages between the introduction and the
    /// discussion.
    #[must_use]
    pub fn investigation_stages(self) -> usize {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(DomainError::InvalidDifficulty(other.to_owned())),
        }
    }
}
