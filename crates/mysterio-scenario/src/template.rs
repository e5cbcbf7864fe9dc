//! Built-in scenario generator backed by a hand-written template.
//!
//! Produces the "Ocean Star" cruise-ship murder for two to five players. Every
//! character is always written as a role so that latecomers have a seat to
//! join; `meta.playerCount` carries the requested table size. The output is a
//! raw document like any other generator's and still goes through validation.

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::difficulty::Difficulty;
use crate::generator::{GenerationError, ScenarioGenerator};
use crate::model::Phase;

struct Character {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    secret: &'static str,
    /// Index of the character the second secret is about, and its content.
    rumour: (usize, &'static str),
    /// Intro, investigation 1..=3, discussion.
    hints: [&'static str; 5],
}

const CHARACTERS: [Character; 5] = [
    Character {
        id: "partner",
        name: "Alex Crawford",
        description: "The victim's business partner of twenty years. On the surface, on good terms.",
        secret: "You owe the victim a fortune and he demanded repayment tonight. You are the murderer.",
        rumour: (1, "The secretary argued loudly with the victim in the lounge."),
        hints: [
            "You took the service corridor to the victim's cabin so nobody would see you.",
            "The paper knife came from the lounge; you picked it up on your way out.",
            "The note 'A.C. 2:00' in the diary is your appointment with the victim.",
            "You erased part of the corridor camera footage from the security office.",
            "Steer suspicion toward anyone with a louder motive than yours.",
        ],
    },
    Character {
        id: "secretary",
        name: "Emily Hartwell",
        description: "The victim's secretary for five years. Serious and meticulous.",
        secret: "The victim treated you badly and was about to dismiss you.",
        rumour: (0, "The partner left the party early without saying goodbye."),
        hints: [
            "You argued with the victim in the lounge around midnight.",
            "You know the victim kept his diary appointments to the minute.",
            "You saw someone in a dark jacket near the service corridor.",
            "The victim told you he expected a payment tonight.",
            "Your argument makes you look guilty; explain it before someone else does.",
        ],
    },
    Character {
        id: "rival",
        name: "Daniel Vancleef",
        description: "A fellow jeweller, known to be the victim's sworn rival.",
        secret: "You boarded under a false name; you were not invited.",
        rumour: (3, "The ex-wife was following the victim all evening."),
        hints: [
            "The victim stole your biggest deal and your company is close to bankruptcy.",
            "You were on the deck at 1:30, but nobody can confirm it.",
            "You recognise the paper knife: the partner admired it earlier.",
            "Your false name will come out; decide when to admit it.",
            "Point out who had access to the security office.",
        ],
    },
    Character {
        id: "ex_wife",
        name: "Sophia Blackwood",
        description: "The victim's ex-wife, divorced three years ago, attending as a guest.",
        secret: "You suspect the victim hid assets during the divorce.",
        rumour: (2, "The rival jeweller is not on the guest list."),
        hints: [
            "You followed the victim to his cabin corridor at 1:15 and then lost him.",
            "You heard two voices in the cabin; one sounded like a business talk.",
            "The diary belongs to the victim; 'A.C.' is not anyone's first name you know.",
            "You saw the partner coming back from the crew area.",
            "Your following him looks bad; share what you heard.",
        ],
    },
    Character {
        id: "security",
        name: "Marcus Raines",
        description: "The ship's head of security, a veteran known for strictness.",
        secret: "You once took a bribe from the victim and he was blackmailing you.",
        rumour: (0, "The partner asked you where the camera recorders are kept."),
        hints: [
            "The corridor camera footage between 1:20 and 1:50 has been erased.",
            "The security office door was left unlocked tonight.",
            "Only someone who knew the ship's layout would use the service corridor.",
            "Your own log shows you were on the bridge during the murder.",
            "Keep your past with the victim out of the discussion if you can.",
        ],
    },
];

/// Generates the built-in cruise-ship scenario.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateScenarioGenerator;

impl TemplateScenarioGenerator {
    /// Creates a template generator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn document(player_count: usize, difficulty: Difficulty) -> Value {
        let cast = &CHARACTERS[..];
        let stages = difficulty.investigation_stages();

        let mut phases = vec![phase(
            Phase::Introduction,
            "Case overview: confirm everyone's position",
            "Victim: Samuel Goldstein, 65, renowned jeweller. Estimated time of death: 1:30 am. \
             Cause of death: a stab wound from a sharp blade. Found in his own cabin.",
            &["read_role"],
            cast,
            0,
        )];
        let evidence = [
            "Evidence found: a bloodstained paper knife, the victim's diary, and partly erased \
             corridor camera footage.",
            "The diary's last page reads 'A.C. 2:00'. The service corridor door was unlocked.",
            "The security office recorder shows manual deletion at 1:52 am.",
        ];
        for stage in 1..=stages {
            if let Some(tag) = Phase::investigation(stage) {
                phases.push(phase(
                    tag,
                    "Examine the evidence",
                    evidence[stage - 1],
                    &["share_evidence"],
                    cast,
                    stage,
                ));
            }
        }
        phases.push(phase(
            Phase::Discussion,
            "Discuss motives and contradictions",
            "Given the evidence, who had the strongest motive? Point out anything inconsistent.",
            &["discuss"],
            cast,
            4,
        ));
        phases.push(json!({
            "phase": Phase::Voting,
            "public": {
                "description": "Final vote: name the murderer",
                "text": "Vote for the person you believe is the murderer. The most votes decides the accusation.",
                "actions": ["vote"]
            }
        }));
        phases.push(json!({
            "phase": Phase::Reveal,
            "public": {
                "description": "The truth is revealed",
                "text": "The truth comes to light."
            }
        }));

        let roles: Vec<Value> = cast
            .iter()
            .map(|character| {
                let mut secrets = vec![json!({ "content": character.secret })];
                let (about, content) = character.rumour;
                if let Some(target) = cast.get(about) {
                    secrets.push(json!({ "targetRoleId": target.id, "content": content }));
                }
                json!({
                    "id": character.id,
                    "name": character.name,
                    "description": character.description,
                    "secrets": secrets
                })
            })
            .collect();

        let culprit = cast.first().map_or("nobody", |character| character.name);

        json!({
            "meta": {
                "title": "Murder on the Ocean Star",
                "durationMinutes": difficulty.duration_minutes(),
                "playerCount": player_count.min(cast.len())
            },
            "truth": format!(
                "The murderer is {culprit}. The motive was a betrayal in an old deal. \
                 The weapon was the paper knife from the lounge: the victim was called to his \
                 cabin and stabbed after an argument."
            ),
            "roles": roles,
            "phases": phases
        })
    }
}

fn phase(
    tag: Phase,
    description: &str,
    text: &str,
    actions: &[&str],
    cast: &[Character],
    hint_slot: usize,
) -> Value {
    let private: Vec<Value> = cast
        .iter()
        .map(|character| json!({ "roleId": character.id, "hints": [character.hints[hint_slot]] }))
        .collect();
    json!({
        "phase": tag,
        "public": { "description": description, "text": text, "actions": actions },
        "private": private
    })
}

#[async_trait]
impl ScenarioGenerator for TemplateScenarioGenerator {
    async fn generate(
        &self,
        player_count: usize,
        difficulty: Difficulty,
    ) -> Result<Value, GenerationError> {
        Ok(Self::document(player_count, difficulty))
    }
}
