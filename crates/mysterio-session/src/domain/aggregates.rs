//! Aggregate root for a game session.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use mysterio_core::aggregate::Aggregate;
use mysterio_core::clock::Clock;
use mysterio_core::error::DomainError;
use mysterio_scenario::{Phase, PhaseContent, Role, RoleId, Scenario, ValidatedScenario};
use serde::Serialize;
use uuid::Uuid;

/// Smallest supported number of players.
pub const MIN_PLAYERS: usize = 2;
/// Largest supported number of players.
pub const MAX_PLAYERS: usize = 5;

/// Checks that `requested` lies within `[MIN_PLAYERS, MAX_PLAYERS]`.
///
/// # Errors
///
/// Returns `DomainError::InvalidPlayerCount` when it does not.
pub fn check_player_count(requested: usize) -> Result<(), DomainError> {
    if (MIN_PLAYERS..=MAX_PLAYERS).contains(&requested) {
        Ok(())
    } else {
        Err(DomainError::InvalidPlayerCount {
            requested,
            min: MIN_PLAYERS,
            max: MAX_PLAYERS,
        })
    }
}

/// Lifecycle status of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// The game is being played.
    Active,
    /// The owner advanced past the last phase. Terminal.
    Finished,
}

/// A participant, bound to one role for the lifetime of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    /// Player identifier.
    pub id: Uuid,
    /// The role this player plays.
    pub role_id: RoleId,
    /// Zero-based join order. The owner sits at seat 0.
    pub seat: usize,
}

/// Engine-computed actions a player may take right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerAction {
    /// Cast a vote.
    Vote,
    /// Move the session to its next phase.
    AdvancePhase,
}

/// Outcome of an advance request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhaseTransition {
    /// The phase the session is in afterwards.
    pub phase: Phase,
    /// Zero-based index of that phase in the scenario's order.
    pub phase_number: usize,
    /// Status afterwards.
    pub status: SessionStatus,
    /// `false` when the session was already finished and nothing moved.
    pub changed: bool,
}

/// The aggregate root for one game.
#[derive(Debug, Clone)]
pub struct GameSession {
    /// Aggregate identifier.
    pub id: Uuid,
    pub(crate) owner_player_id: Uuid,
    pub(crate) scenario: Arc<Scenario>,
    pub(crate) players: BTreeMap<Uuid, Player>,
    /// Voter id to target id.
    pub(crate) votes: BTreeMap<Uuid, Uuid>,
    /// Always a valid index into `scenario.phases`.
    pub(crate) phase_index: usize,
    pub(crate) status: SessionStatus,
    pub(crate) created_at: DateTime<Utc>,
}

impl GameSession {
    /// Starts a session with `player_count` players, binding them to the
    /// scenario's roles in declaration order. The first player owns the
    /// session.
    ///
    /// # Errors
    ///
    /// - `DomainError::InvalidPlayerCount` if `player_count` is out of range.
    /// - `DomainError::InsufficientRoles` if the scenario has fewer roles.
    pub fn start(
        id: Uuid,
        scenario: ValidatedScenario,
        player_count: usize,
        clock: &dyn Clock,
    ) -> Result<Self, DomainError> {
        check_player_count(player_count)?;
        let scenario = scenario.into_inner();
        if scenario.roles.len() < player_count {
            return Err(DomainError::InsufficientRoles {
                requested: player_count,
                available: scenario.roles.len(),
            });
        }

        let seated: Vec<Player> = scenario
            .roles
            .iter()
            .take(player_count)
            .enumerate()
            .map(|(seat, role)| Player {
                id: Uuid::new_v4(),
                role_id: role.id.clone(),
                seat,
            })
            .collect();
        let owner_player_id = seated[0].id;

        Ok(Self {
            id,
            owner_player_id,
            scenario: Arc::new(scenario),
            players: seated.into_iter().map(|player| (player.id, player)).collect(),
            votes: BTreeMap::new(),
            phase_index: 0,
            status: SessionStatus::Active,
            created_at: clock.now(),
        })
    }

    /// Seats one more player on the next unassigned role.
    ///
    /// # Errors
    ///
    /// - `DomainError::InvalidPhase` once the game has left its first phase.
    /// - `DomainError::SessionFull` when no role or seat is left.
    pub fn join(&mut self) -> Result<Player, DomainError> {
        if self.status == SessionStatus::Finished || self.phase_index != 0 {
            return Err(DomainError::InvalidPhase(format!(
                "players can only join during `{}`",
                self.scenario.phases[0].phase
            )));
        }
        let seat = self.players.len();
        if seat >= MAX_PLAYERS {
            return Err(DomainError::SessionFull(self.id));
        }
        let role = self
            .scenario
            .roles
            .get(seat)
            .ok_or(DomainError::SessionFull(self.id))?;

        let player = Player {
            id: Uuid::new_v4(),
            role_id: role.id.clone(),
            seat,
        };
        self.players.insert(player.id, player.clone());
        Ok(player)
    }

    /// Moves to the next phase, or finishes the game when already at the last
    /// one. A finished session stays as it is.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Unauthorized` unless `acting_player_id` owns the
    /// session.
    pub fn advance_phase(&mut self, acting_player_id: Uuid) -> Result<PhaseTransition, DomainError> {
        if acting_player_id != self.owner_player_id {
            return Err(DomainError::Unauthorized(acting_player_id));
        }

        let changed = match self.status {
            SessionStatus::Finished => false,
            SessionStatus::Active if self.is_last_phase() => {
                self.status = SessionStatus::Finished;
                true
            }
            SessionStatus::Active => {
                self.phase_index += 1;
                true
            }
        };

        Ok(PhaseTransition {
            phase: self.current_phase(),
            phase_number: self.phase_index,
            status: self.status,
            changed,
        })
    }

    /// Records `voter`'s vote for `target`. The first vote is final.
    ///
    /// # Errors
    ///
    /// - `DomainError::PlayerNotFound` if `voter` is not a participant.
    /// - `DomainError::InvalidPhase` outside the voting phase or once finished.
    /// - `DomainError::AlreadyVoted` on a second vote.
    /// - `DomainError::InvalidTarget` if `target` is not a participant.
    pub fn cast_vote(&mut self, voter: Uuid, target: Uuid) -> Result<(), DomainError> {
        if !self.players.contains_key(&voter) {
            return Err(DomainError::PlayerNotFound(voter));
        }
        if self.status == SessionStatus::Finished {
            return Err(DomainError::InvalidPhase("the game is finished".to_owned()));
        }
        let phase = self.current_phase();
        if phase != Phase::Voting {
            return Err(DomainError::InvalidPhase(format!(
                "votes are only accepted during `voting`, not `{phase}`"
            )));
        }
        if self.votes.contains_key(&voter) {
            return Err(DomainError::AlreadyVoted(voter));
        }
        if !self.players.contains_key(&target) {
            return Err(DomainError::InvalidTarget(target));
        }

        self.votes.insert(voter, target);
        Ok(())
    }

    /// Actions available to `player_id` in the current state.
    #[must_use]
    pub fn available_actions(&self, player_id: Uuid) -> Vec<PlayerAction> {
        let mut actions = Vec::new();
        if self.status == SessionStatus::Active
            && self.current_phase() == Phase::Voting
            && !self.votes.contains_key(&player_id)
        {
            actions.push(PlayerAction::Vote);
        }
        if player_id == self.owner_player_id && !self.is_last_phase() {
            actions.push(PlayerAction::AdvancePhase);
        }
        actions
    }

    /// Votes received per target.
    #[must_use]
    pub fn tally(&self) -> BTreeMap<Uuid, usize> {
        let mut counts = BTreeMap::new();
        for target in self.votes.values() {
            *counts.entry(*target).or_insert(0) += 1;
        }
        counts
    }

    /// The target with the most votes. Ties go to the smallest player id;
    /// `None` when nobody voted.
    #[must_use]
    pub fn winner(&self) -> Option<Uuid> {
        let mut best: Option<(Uuid, usize)> = None;
        // Ascending key order, so only a strictly higher count displaces.
        for (target, count) in self.tally() {
            if best.is_none_or(|(_, top)| count > top) {
                best = Some((target, count));
            }
        }
        best.map(|(target, _)| target)
    }

    /// Results are readable once the last phase is reached, finished or not.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::GameNotFinished` before the last phase.
    pub fn ensure_result_available(&self) -> Result<(), DomainError> {
        if self.is_last_phase() {
            Ok(())
        } else {
            Err(DomainError::GameNotFinished)
        }
    }

    /// The player `player_id`, if seated here.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::PlayerNotFound` otherwise.
    pub fn player(&self, player_id: Uuid) -> Result<&Player, DomainError> {
        self.players
            .get(&player_id)
            .ok_or(DomainError::PlayerNotFound(player_id))
    }

    /// The role bound to `player`.
    #[must_use]
    pub fn role_of(&self, player: &Player) -> Option<&Role> {
        self.scenario.role(&player.role_id)
    }

    /// A player's display name: the name of their role.
    #[must_use]
    pub fn display_name(&self, player: &Player) -> String {
        self.role_of(player)
            .map_or_else(|| player.role_id.to_string(), |role| role.name.clone())
    }

    /// Players in seat order.
    #[must_use]
    pub fn players_by_seat(&self) -> Vec<&Player> {
        let mut players: Vec<&Player> = self.players.values().collect();
        players.sort_by_key(|player| player.seat);
        players
    }

    /// The player who created the session and drives its phases.
    #[must_use]
    pub fn owner_player_id(&self) -> Uuid {
        self.owner_player_id
    }

    /// The scenario this session plays.
    #[must_use]
    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    /// Recorded votes, keyed by voter.
    #[must_use]
    pub fn votes(&self) -> &BTreeMap<Uuid, Uuid> {
        &self.votes
    }

    /// Zero-based index of the current phase.
    #[must_use]
    pub fn phase_index(&self) -> usize {
        self.phase_index
    }

    /// Authored content of the current phase.
    #[must_use]
    pub fn current_content(&self) -> &PhaseContent {
        &self.scenario.phases[self.phase_index]
    }

    /// Tag of the current phase.
    #[must_use]
    pub fn current_phase(&self) -> Phase {
        self.current_content().phase
    }

    /// Returns `true` once the session sits on its final phase.
    #[must_use]
    pub fn is_last_phase(&self) -> bool {
        self.phase_index == self.scenario.last_phase_index()
    }

    /// Lifecycle status.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// When the session was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Aggregate for GameSession {
    fn aggregate_id(&self) -> Uuid {
        self.id
    }
}
