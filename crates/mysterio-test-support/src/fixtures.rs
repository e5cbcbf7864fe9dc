//! Scenario fixtures.
//!
//! Role `k` (1-based) has the id `role-k` and the display name `Suspect k`.
//! Phases, in order: introduction, investigation1, discussion, voting,
//! reveal. Every role gets the hint `role-k intro hint` in the introduction
//! and `role-k clue a` in the first investigation; `role-1` additionally
//! gets a second block `role-1 clue b`, `role-1 clue c` there.

use mysterio_scenario::{ScenarioSchema, ValidatedScenario};
use serde_json::{Value, json};

/// Builds a raw scenario document declaring `role_count` roles.
#[must_use]
pub fn scenario_document(role_count: usize) -> Value {
    let role_ids: Vec<String> = (1..=role_count).map(|k| format!("role-{k}")).collect();

    let roles: Vec<Value> = role_ids
        .iter()
        .enumerate()
        .map(|(index, id)| {
            let k = index + 1;
            let mut secrets = vec![json!({ "content": format!("secret of {id}") })];
            if k > 1 {
                secrets.push(json!({
                    "targetRoleId": "role-1",
                    "content": format!("{id} saw role-1 near the cabin")
                }));
            }
            json!({
                "id": id,
                "name": format!("Suspect {k}"),
                "description": format!("Description {k}"),
                "secrets": secrets
            })
        })
        .collect();

    let intro_hints: Vec<Value> = role_ids
        .iter()
        .map(|id| json!({ "roleId": id, "hints": [format!("{id} intro hint")] }))
        .collect();

    let mut clue_blocks: Vec<Value> = role_ids
        .iter()
        .map(|id| json!({ "roleId": id, "hints": [format!("{id} clue a")] }))
        .collect();
    clue_blocks.push(json!({ "roleId": "role-1", "hints": ["role-1 clue b", "role-1 clue c"] }));

    json!({
        "meta": {
            "title": "The Fixture Affair",
            "durationMinutes": 60,
            "playerCount": role_count
        },
        "truth": "Suspect 1 did it.",
        "roles": roles,
        "phases": [
            {
                "phase": "introduction",
                "public": { "description": "Introduction", "text": "A body was found.", "actions": ["read_role"] },
                "private": intro_hints
            },
            {
                "phase": "investigation1",
                "public": { "description": "Investigation", "text": "A knife.", "actions": ["share_evidence"] },
                "private": clue_blocks
            },
            {
                "phase": "discussion",
                "public": { "description": "Discussion" }
            },
            {
                "phase": "voting",
                "public": { "description": "Voting", "actions": ["vote"] }
            },
            {
                "phase": "reveal",
                "public": { "description": "Reveal", "text": "The truth." }
            }
        ]
    })
}

/// The fixture document for `role_count` roles, validated against the
/// standard schema.
///
/// # Panics
///
/// Panics if `role_count` is zero.
#[must_use]
pub fn validated_scenario(role_count: usize) -> ValidatedScenario {
    ValidatedScenario::parse(&scenario_document(role_count), &ScenarioSchema::standard())
        .expect("fixture scenario conforms to the standard schema")
}
