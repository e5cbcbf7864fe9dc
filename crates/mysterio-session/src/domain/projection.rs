//! Role-scoped projection of phase content.
//!
//! Private content is partitioned by role, never by player: every player
//! holding a role sees exactly the hints authored for that role and nothing
//! authored for any other.

use mysterio_scenario::{Phase, PhaseContent, RoleId};

/// What one role may see of a phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseProjection {
    /// The phase tag.
    pub phase: Phase,
    /// Public description.
    pub description: String,
    /// Public narrative text, possibly empty.
    pub public_text: String,
    /// Authored public actions.
    pub public_actions: Vec<String>,
    /// Hints of every private block tagged for the role, in authored order.
    pub hints: Vec<String>,
}

/// Projects `content` for a player holding `role`.
#[must_use]
pub fn project(content: &PhaseContent, role: &RoleId) -> PhaseProjection {
    let hints = content
        .private
        .iter()
        .filter(|block| &block.role_id == role)
        .flat_map(|block| block.hints.iter().cloned())
        .collect();

    PhaseProjection {
        phase: content.phase,
        description: content.public.description.clone(),
        public_text: content.public.text.clone(),
        public_actions: content.public.actions.clone(),
        hints,
    }
}
