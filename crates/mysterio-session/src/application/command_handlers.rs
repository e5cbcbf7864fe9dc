//! Command handlers for game sessions.
//!
//! This module contains application-level command handler functions that
//! orchestrate domain logic: lock the session, load it, execute the command,
//! and write it back.

use mysterio_core::clock::Clock;
use mysterio_core::command::Command;
use mysterio_core::error::DomainError;
use mysterio_core::repository::Repository;
use mysterio_scenario::{Difficulty, ScenarioSource};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::application::locks::SessionLocks;
use crate::application::query_handlers::{PlayerView, SessionView, player_view, session_view};
use crate::domain::aggregates::{GameSession, PhaseTransition, SessionStatus, check_player_count};
use crate::domain::commands::{AdvancePhase, CastVote, CreateSession, JoinSession};

/// Acknowledgement of an accepted vote.
#[derive(Debug, Clone, Serialize)]
pub struct VoteRecorded {
    /// The session voted in.
    pub session_id: Uuid,
    /// The player who voted.
    pub voter_player_id: Uuid,
    /// The player voted for.
    pub target_player_id: Uuid,
    /// Votes cast so far.
    pub votes_cast: usize,
}

/// Handles the `CreateSession` command: checks the request, generates and
/// validates a scenario, and saves the new session.
///
/// Creation is all-or-nothing: nothing is saved unless every step succeeds.
///
/// # Errors
///
/// - `DomainError::InvalidPlayerCount` / `DomainError::InvalidDifficulty` for
///   a bad request, checked before the generator is called.
/// - Any generation error surfaced by [`ScenarioSource::produce`].
/// - `DomainError::InsufficientRoles` if the scenario has too few roles.
/// - `DomainError::Infrastructure` if saving fails.
pub async fn handle_create_session(
    command: &CreateSession,
    scenarios: &ScenarioSource,
    clock: &dyn Clock,
    repo: &dyn Repository<GameSession>,
) -> Result<SessionView, DomainError> {
    check_player_count(command.player_count)?;
    let difficulty: Difficulty = command.difficulty.parse()?;

    let scenario = scenarios
        .produce(command.player_count, difficulty, &command.cancellation)
        .await?;
    let session = GameSession::start(Uuid::now_v7(), scenario, command.player_count, clock)?;
    repo.save(session.clone()).await?;

    info!(
        command = command.command_type(),
        correlation_id = %command.correlation_id(),
        session_id = %session.id,
        player_count = command.player_count,
        %difficulty,
        "session created"
    );
    Ok(session_view(&session))
}

/// Handles the `JoinSession` command.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound`, `DomainError::InvalidPhase`, or
/// `DomainError::SessionFull`.
pub async fn handle_join_session(
    command: &JoinSession,
    locks: &SessionLocks,
    repo: &dyn Repository<GameSession>,
) -> Result<PlayerView, DomainError> {
    let _guard = locks.acquire(command.session_id).await;
    let mut session = repo.find_by_id(command.session_id).await?;

    let player = session.join()?;
    repo.update(session.clone()).await?;

    info!(
        command = command.command_type(),
        correlation_id = %command.correlation_id(),
        session_id = %session.id,
        player_id = %player.id,
        role_id = %player.role_id,
        "player joined"
    );
    Ok(player_view(&session, &player))
}

/// Handles the `AdvancePhase` command. A finished session is left untouched.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` or `DomainError::Unauthorized`.
pub async fn handle_advance_phase(
    command: &AdvancePhase,
    locks: &SessionLocks,
    repo: &dyn Repository<GameSession>,
) -> Result<PhaseTransition, DomainError> {
    let _guard = locks.acquire(command.session_id).await;
    let mut session = repo.find_by_id(command.session_id).await?;

    let transition = session.advance_phase(command.acting_player_id)?;
    if transition.changed {
        repo.update(session).await?;
    }

    info!(
        command = command.command_type(),
        correlation_id = %command.correlation_id(),
        session_id = %command.session_id,
        phase = %transition.phase,
        status = ?transition.status,
        changed = transition.changed,
        "phase advanced"
    );
    if transition.changed && transition.status == SessionStatus::Finished {
        info!(session_id = %command.session_id, "session finished");
    }
    Ok(transition)
}

/// Handles the `CastVote` command.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound`, `DomainError::PlayerNotFound`,
/// `DomainError::InvalidPhase`, `DomainError::AlreadyVoted`, or
/// `DomainError::InvalidTarget`.
pub async fn handle_cast_vote(
    command: &CastVote,
    locks: &SessionLocks,
    repo: &dyn Repository<GameSession>,
) -> Result<VoteRecorded, DomainError> {
    let _guard = locks.acquire(command.session_id).await;
    let mut session = repo.find_by_id(command.session_id).await?;

    session.cast_vote(command.voter_player_id, command.target_player_id)?;
    let votes_cast = session.votes().len();
    repo.update(session).await?;

    info!(
        command = command.command_type(),
        correlation_id = %command.correlation_id(),
        session_id = %command.session_id,
        voter = %command.voter_player_id,
        target = %command.target_player_id,
        "vote recorded"
    );
    Ok(VoteRecorded {
        session_id: command.session_id,
        voter_player_id: command.voter_player_id,
        target_player_id: command.target_player_id,
        votes_cast,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use mysterio_core::error::DomainError;
    use mysterio_core::repository::Repository;
    use mysterio_scenario::{Phase, ScenarioSchema, ScenarioSource, TemplateScenarioGenerator};
    use mysterio_store::InMemoryRepository;
    use mysterio_test_support::{
        FailingRepository, FailingScenarioGenerator, FixedClock, StallingScenarioGenerator,
        StaticScenarioGenerator, scenario_document,
    };
    use serde_json::json;
    use tokio_util::sync::CancellationToken;
    use uuid::Uuid;

    use crate::application::command_handlers::{
        handle_advance_phase, handle_cast_vote, handle_create_session, handle_join_session,
    };
    use crate::application::locks::SessionLocks;
    use crate::application::query_handlers::{SessionView, get_game_result};
    use crate::domain::aggregates::{GameSession, SessionStatus};
    use crate::domain::commands::{AdvancePhase, CastVote, CreateSession, JoinSession};

    fn source_with(generator: Arc<dyn mysterio_scenario::ScenarioGenerator>) -> ScenarioSource {
        ScenarioSource::new(
            generator,
            Arc::new(ScenarioSchema::standard()),
            Duration::from_secs(5),
        )
    }

    fn create(player_count: usize, difficulty: &str) -> CreateSession {
        CreateSession {
            correlation_id: Uuid::new_v4(),
            player_count,
            difficulty: difficulty.to_owned(),
            cancellation: CancellationToken::new(),
        }
    }

    async fn created(
        repo: &InMemoryRepository<GameSession>,
        player_count: usize,
    ) -> SessionView {
        let source = source_with(Arc::new(StaticScenarioGenerator::new(scenario_document(5))));
        handle_create_session(&create(player_count, "easy"), &source, &FixedClock::default(), repo)
            .await
            .unwrap()
    }

    async fn advance(
        repo: &InMemoryRepository<GameSession>,
        locks: &SessionLocks,
        session_id: Uuid,
        acting_player_id: Uuid,
    ) -> Result<crate::domain::aggregates::PhaseTransition, DomainError> {
        let command = AdvancePhase {
            correlation_id: Uuid::new_v4(),
            session_id,
            acting_player_id,
        };
        handle_advance_phase(&command, locks, repo).await
    }

    async fn vote(
        repo: &InMemoryRepository<GameSession>,
        locks: &SessionLocks,
        session_id: Uuid,
        voter: Uuid,
        target: Uuid,
    ) -> Result<super::VoteRecorded, DomainError> {
        let command = CastVote {
            correlation_id: Uuid::new_v4(),
            session_id,
            voter_player_id: voter,
            target_player_id: target,
        };
        handle_cast_vote(&command, locks, repo).await
    }

    #[tokio::test]
    async fn test_handle_create_session_saves_session() {
        // Arrange
        let repo = InMemoryRepository::new();

        // Act
        let view = created(&repo, 3).await;

        // Assert
        assert_eq!(repo.len().await, 1);
        let stored = repo.find_by_id(view.session_id).await.unwrap();
        assert_eq!(stored.owner_player_id(), view.owner_player_id);
        assert_eq!(view.players.len(), 3);
        assert_eq!(view.current_phase, Phase::Introduction);
        assert_eq!(view.status, SessionStatus::Active);
    }

    #[tokio::test]
    async fn test_handle_create_session_rejects_bad_count_before_generating() {
        // Arrange
        let repo = InMemoryRepository::<GameSession>::new();
        let generator = Arc::new(StaticScenarioGenerator::new(scenario_document(5)));
        let source = source_with(generator.clone());

        for player_count in [0, 1, 6] {
            // Act
            let result = handle_create_session(
                &create(player_count, "easy"),
                &source,
                &FixedClock::default(),
                &repo,
            )
            .await;

            // Assert
            assert!(matches!(result, Err(DomainError::InvalidPlayerCount { .. })));
        }
        assert_eq!(generator.calls(), 0);
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_handle_create_session_rejects_unknown_difficulty() {
        let repo = InMemoryRepository::<GameSession>::new();
        let generator = Arc::new(StaticScenarioGenerator::new(scenario_document(5)));
        let source = source_with(generator.clone());

        let result =
            handle_create_session(&create(3, "extreme"), &source, &FixedClock::default(), &repo)
                .await;

        assert!(matches!(result, Err(DomainError::InvalidDifficulty(value)) if value == "extreme"));
        assert_eq!(generator.calls(), 0);
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_handle_create_session_saves_nothing_when_generation_fails() {
        let repo = InMemoryRepository::<GameSession>::new();
        let source = source_with(Arc::new(FailingScenarioGenerator));

        let result =
            handle_create_session(&create(3, "easy"), &source, &FixedClock::default(), &repo)
                .await;

        assert!(matches!(result, Err(DomainError::GenerationFailed(_))));
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_handle_create_session_saves_nothing_when_cancelled() {
        // Arrange
        let repo = InMemoryRepository::<GameSession>::new();
        let source = source_with(Arc::new(StallingScenarioGenerator));
        let command = create(3, "easy");
        command.cancellation.cancel();

        // Act
        let result = handle_create_session(&command, &source, &FixedClock::default(), &repo).await;

        // Assert
        assert!(matches!(result, Err(DomainError::GenerationCancelled)));
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_handle_create_session_saves_nothing_for_invalid_scenario() {
        let repo = InMemoryRepository::<GameSession>::new();
        let source = source_with(Arc::new(StaticScenarioGenerator::new(json!({
            "meta": { "title": "Broken", "durationMinutes": 60, "playerCount": 3 },
            "truth": "",
            "roles": [],
            "phases": []
        }))));

        let result =
            handle_create_session(&create(3, "easy"), &source, &FixedClock::default(), &repo)
                .await;

        assert!(matches!(result, Err(DomainError::SchemaViolation { .. })));
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_handle_create_session_with_too_few_roles_is_rejected() {
        let repo = InMemoryRepository::<GameSession>::new();
        let source = source_with(Arc::new(StaticScenarioGenerator::new(scenario_document(2))));

        let result =
            handle_create_session(&create(4, "easy"), &source, &FixedClock::default(), &repo)
                .await;

        assert!(matches!(result, Err(DomainError::InsufficientRoles { .. })));
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_handle_create_session_propagates_store_failure() {
        let source = source_with(Arc::new(StaticScenarioGenerator::new(scenario_document(5))));

        let result = handle_create_session(
            &create(3, "easy"),
            &source,
            &FixedClock::default(),
            &FailingRepository,
        )
        .await;

        assert!(matches!(result, Err(DomainError::Infrastructure(_))));
    }

    #[tokio::test]
    async fn test_handle_join_session_seats_next_role() {
        // Arrange
        let repo = InMemoryRepository::new();
        let locks = SessionLocks::new();
        let view = created(&repo, 2).await;
        let command = JoinSession {
            correlation_id: Uuid::new_v4(),
            session_id: view.session_id,
        };

        // Act
        let player = handle_join_session(&command, &locks, &repo).await.unwrap();

        // Assert
        assert_eq!(player.role_id.as_str(), "role-3");
        assert_eq!(player.name, "Suspect 3");
        assert_eq!(player.seat, 2);
        let stored = repo.find_by_id(view.session_id).await.unwrap();
        assert!(stored.player(player.player_id).is_ok());
    }

    #[tokio::test]
    async fn test_handle_join_session_unknown_session_is_not_found() {
        let repo = InMemoryRepository::<GameSession>::new();
        let command = JoinSession {
            correlation_id: Uuid::new_v4(),
            session_id: Uuid::new_v4(),
        };

        let result = handle_join_session(&command, &SessionLocks::new(), &repo).await;

        assert!(matches!(result, Err(DomainError::AggregateNotFound(_))));
    }

    #[tokio::test]
    async fn test_handle_advance_phase_by_non_owner_leaves_session_unchanged() {
        // Arrange
        let repo = InMemoryRepository::new();
        let locks = SessionLocks::new();
        let view = created(&repo, 3).await;
        let guest = view.players[1].player_id;

        // Act
        let result = advance(&repo, &locks, view.session_id, guest).await;

        // Assert
        assert!(matches!(result, Err(DomainError::Unauthorized(id)) if id == guest));
        let stored = repo.find_by_id(view.session_id).await.unwrap();
        assert_eq!(stored.phase_index(), 0);
    }

    #[tokio::test]
    async fn test_handle_advance_phase_drives_session_to_finished() {
        // Arrange
        let repo = InMemoryRepository::new();
        let locks = SessionLocks::new();
        let view = created(&repo, 3).await;
        let owner = view.owner_player_id;

        // Act
        for _ in 0..view.phase_count - 1 {
            advance(&repo, &locks, view.session_id, owner).await.unwrap();
        }
        let finishing = advance(&repo, &locks, view.session_id, owner).await.unwrap();
        let again = advance(&repo, &locks, view.session_id, owner).await.unwrap();

        // Assert
        assert_eq!(finishing.status, SessionStatus::Finished);
        assert!(!again.changed);
        let stored = repo.find_by_id(view.session_id).await.unwrap();
        assert_eq!(stored.status(), SessionStatus::Finished);
        assert_eq!(stored.phase_index(), view.phase_count - 1);
    }

    #[tokio::test]
    async fn test_handle_advance_phase_by_non_owner_after_finish_is_unauthorized() {
        // Arrange
        let repo = InMemoryRepository::new();
        let locks = SessionLocks::new();
        let view = created(&repo, 3).await;
        let owner = view.owner_player_id;
        let guest = view.players[2].player_id;
        for _ in 0..view.phase_count {
            advance(&repo, &locks, view.session_id, owner).await.unwrap();
        }

        // Act
        let result = advance(&repo, &locks, view.session_id, guest).await;

        // Assert
        assert!(matches!(result, Err(DomainError::Unauthorized(id)) if id == guest));
        let stored = repo.find_by_id(view.session_id).await.unwrap();
        assert_eq!(stored.status(), SessionStatus::Finished);
        assert_eq!(stored.phase_index(), view.phase_count - 1);
    }

    #[tokio::test]
    async fn test_handle_cast_vote_after_finish_is_rejected_and_tally_kept() {
        // Arrange
        let repo = InMemoryRepository::new();
        let locks = SessionLocks::new();
        let view = created(&repo, 3).await;
        let owner = view.owner_player_id;
        let target = view.players[1].player_id;
        let latecomer = view.players[2].player_id;
        for _ in 0..3 {
            advance(&repo, &locks, view.session_id, owner).await.unwrap();
        }
        vote(&repo, &locks, view.session_id, owner, target).await.unwrap();
        while repo.find_by_id(view.session_id).await.unwrap().status() != SessionStatus::Finished {
            advance(&repo, &locks, view.session_id, owner).await.unwrap();
        }

        // Act
        let result = vote(&repo, &locks, view.session_id, latecomer, target).await;

        // Assert
        assert!(matches!(result, Err(DomainError::InvalidPhase(_))));
        let stored = repo.find_by_id(view.session_id).await.unwrap();
        assert_eq!(stored.votes().len(), 1);
        assert_eq!(stored.tally()[&target], 1);
    }

    #[tokio::test]
    async fn test_commands_on_unknown_session_leave_no_lock_behind() {
        // Arrange
        let repo = InMemoryRepository::<GameSession>::new();
        let locks = SessionLocks::new();

        // Act
        for _ in 0..100 {
            let session_id = Uuid::new_v4();
            let joined = handle_join_session(
                &JoinSession {
                    correlation_id: Uuid::new_v4(),
                    session_id,
                },
                &locks,
                &repo,
            )
            .await;
            let advanced = advance(&repo, &locks, session_id, Uuid::new_v4()).await;
            let voted = vote(&repo, &locks, session_id, Uuid::new_v4(), Uuid::new_v4()).await;

            assert!(matches!(joined, Err(DomainError::AggregateNotFound(_))));
            assert!(matches!(advanced, Err(DomainError::AggregateNotFound(_))));
            assert!(matches!(voted, Err(DomainError::AggregateNotFound(_))));
        }

        // Assert
        assert!(locks.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_votes_are_all_recorded() {
        // Arrange
        let repo = Arc::new(InMemoryRepository::new());
        let locks = Arc::new(SessionLocks::new());
        let view = created(&repo, 5).await;
        for _ in 0..3 {
            advance(&repo, &locks, view.session_id, view.owner_player_id)
                .await
                .unwrap();
        }
        let target = view.players[0].player_id;

        // Act
        let mut handles = Vec::new();
        for player in &view.players {
            let repo = Arc::clone(&repo);
            let locks = Arc::clone(&locks);
            let (session_id, voter) = (view.session_id, player.player_id);
            handles.push(tokio::spawn(async move {
                vote(&repo, &locks, session_id, voter, target).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        // Assert
        let stored = repo.find_by_id(view.session_id).await.unwrap();
        assert_eq!(stored.votes().len(), 5);
        assert_eq!(stored.tally()[&target], 5);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_double_vote_records_exactly_one() {
        // Arrange
        let repo = Arc::new(InMemoryRepository::new());
        let locks = Arc::new(SessionLocks::new());
        let view = created(&repo, 3).await;
        for _ in 0..3 {
            advance(&repo, &locks, view.session_id, view.owner_player_id)
                .await
                .unwrap();
        }
        let voter = view.players[1].player_id;

        // Act
        let mut handles = Vec::new();
        for player in &view.players {
            let repo = Arc::clone(&repo);
            let locks = Arc::clone(&locks);
            let (session_id, target) = (view.session_id, player.player_id);
            handles.push(tokio::spawn(async move {
                vote(&repo, &locks, session_id, voter, target).await
            }));
        }
        let mut accepted = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => accepted += 1,
                Err(DomainError::AlreadyVoted(id)) => assert_eq!(id, voter),
                Err(other) => panic!("unexpected error {other:?}"),
            }
        }

        // Assert
        assert_eq!(accepted, 1);
        let stored = repo.find_by_id(view.session_id).await.unwrap();
        assert_eq!(stored.votes().len(), 1);
    }

    #[tokio::test]
    async fn test_three_player_easy_game_end_to_end() {
        // Arrange
        let repo = InMemoryRepository::new();
        let locks = SessionLocks::new();
        let source = source_with(Arc::new(TemplateScenarioGenerator::new()));
        let view = handle_create_session(&create(3, "easy"), &source, &FixedClock::default(), &repo)
            .await
            .unwrap();
        assert_eq!(view.players.len(), 3);
        assert_eq!(view.current_phase, Phase::Introduction);
        let (a, b, c) = (
            view.players[0].player_id,
            view.players[1].player_id,
            view.players[2].player_id,
        );
        assert_eq!(view.owner_player_id, a);

        // Act
        let mut phase = view.current_phase;
        while phase != Phase::Voting {
            phase = advance(&repo, &locks, view.session_id, a).await.unwrap().phase;
        }
        vote(&repo, &locks, view.session_id, a, b).await.unwrap();
        vote(&repo, &locks, view.session_id, c, b).await.unwrap();
        let before = get_game_result(view.session_id, &repo).await;
        while phase != Phase::Reveal {
            phase = advance(&repo, &locks, view.session_id, a).await.unwrap().phase;
        }
        let result = get_game_result(view.session_id, &repo).await.unwrap();

        // Assert
        assert!(matches!(before, Err(DomainError::GameNotFinished)));
        assert_eq!(result.winner_id, Some(b));
        assert_eq!(result.vote_tally.len(), 1);
        assert_eq!(result.vote_tally[&b], 2);
        assert_eq!(result.total_votes, 2);
        assert!(result.truth.contains("Alex Crawford"));
    }
}
