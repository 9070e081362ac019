//! Command handlers for the Session & Game Engine context.
//!
//! Each handler claims the player's slot, plans the transition under the
//! slot lock, fetches the content the next round needs with no lock held,
//! then commits the transition under the lock again.

use odyssey_core::clock::Clock;
use odyssey_core::command::Command;
use odyssey_core::content::RoundKind;
use odyssey_core::error::DomainError;
use odyssey_core::player::PlayerId;
use odyssey_core::repository::ContentRepository;
use tracing::{debug, info, instrument, warn};

use crate::application::store::{SessionStore, lock};
use crate::domain::commands::{StartSession, SubmitInput};
use crate::domain::config::GameConfig;
use crate::domain::session::{Fetched, NextRound};
use crate::domain::values::{Reply, Step};

/// Collaborators a handler needs.
#[derive(Clone, Copy)]
pub struct GameContext<'a> {
    /// Deployment policy.
    pub config: &'a GameConfig,
    /// Per-player sessions.
    pub store: &'a SessionStore,
    /// Scenario and question source.
    pub repository: &'a dyn ContentRepository,
    /// Time source for activity tracking.
    pub clock: &'a dyn Clock,
}

/// Handles the `StartSession` command: discards any previous session for the
/// player, then offers the first round.
///
/// If the first round's content is unavailable the player is left with a
/// fresh `Idle` session and may simply start again.
///
/// # Errors
///
/// Returns `ContentUnavailable` if the first round has no content,
/// `InputInProgress` if another action for the player is mid-flight, or
/// `Infrastructure` if a lock is poisoned.
#[instrument(skip_all, fields(player_id = %command.player_id, correlation_id = %command.correlation_id))]
pub async fn handle_start_session(
    command: &StartSession,
    ctx: GameContext<'_>,
) -> Result<Reply, DomainError> {
    let claim = ctx
        .store
        .claim_for_start(&command.player_id, ctx.clock.now())?;
    let next = lock(claim.slot())?.session.plan_start(ctx.config)?;

    let fetched = fetch_round(next, ctx.repository).await;

    let reply = {
        let mut guard = lock(claim.slot())?;
        let slot = &mut *guard;
        slot.session.start(next, fetched, ctx.config, slot.rng.as_mut())?
    };

    info!(command_type = command.command_type(), "session started");
    log_finish(&command.player_id, &reply);
    Ok(reply)
}

/// Handles the `SubmitInput` command: validates the player's reply against
/// the pending item, applies it and offers the next round (or the summary).
///
/// The answer and the advance are committed together. If the next round's
/// content is unavailable the session is left exactly as it was, so the
/// player can resend the same reply.
///
/// # Errors
///
/// Returns `SessionNotStarted`, `SessionFinished` or `InvalidInput` when the
/// reply is not acceptable in the current phase, `ContentUnavailable` if the
/// next round has no content, `InputInProgress` if another action for the
/// player is mid-flight, or `Infrastructure` if a lock is poisoned.
#[instrument(skip_all, fields(player_id = %command.player_id, correlation_id = %command.correlation_id))]
pub async fn handle_submit_input(
    command: &SubmitInput,
    ctx: GameContext<'_>,
) -> Result<Reply, DomainError> {
    let (claim, plan) = ctx
        .store
        .claim_for_input(&command.player_id, ctx.clock.now(), |session| {
            session.plan_input(&command.raw_text, ctx.config)
        })
        .inspect_err(|err| debug!(%err, "input rejected"))?;

    let fetched = fetch_round(plan.next(), ctx.repository).await;

    let reply = {
        let mut guard = lock(claim.slot())?;
        let slot = &mut *guard;
        slot.session.submit(plan, fetched, ctx.config, slot.rng.as_mut())?
    };

    debug!(
        command_type = command.command_type(),
        token = %plan.token(),
        "round resolved"
    );
    log_finish(&command.player_id, &reply);
    Ok(reply)
}

/// Removes a player's session. A session with an action mid-flight is kept.
///
/// # Errors
///
/// Returns `SessionNotFound` if the player has no session,
/// `InputInProgress` if an action for the player is mid-flight, or
/// `Infrastructure` if a store lock is poisoned.
#[instrument(skip(store), fields(player_id = %player_id))]
pub fn handle_end_session(player_id: &PlayerId, store: &SessionStore) -> Result<(), DomainError> {
    if store.remove(player_id)? {
        info!("session ended");
        Ok(())
    } else {
        Err(DomainError::SessionNotFound(player_id.clone()))
    }
}

/// Evicts sessions idle past the store's timeout. Returns how many were
/// removed.
///
/// # Errors
///
/// Returns `Infrastructure` if the store lock is poisoned.
pub fn evict_idle_sessions(store: &SessionStore, clock: &dyn Clock) -> Result<usize, DomainError> {
    let evicted = store.evict_idle(clock.now())?;
    if evicted > 0 {
        info!(evicted, "evicted idle sessions");
    }
    Ok(evicted)
}

/// Fetches the rows the next round needs. A failed fetch is logged and
/// reported as an empty set, which the engine turns into
/// `ContentUnavailable`.
async fn fetch_round(next: NextRound, repository: &dyn ContentRepository) -> Option<Fetched> {
    let NextRound::Play(kind) = next else {
        return None;
    };
    let fetched = match kind {
        RoundKind::Scenario => repository.fetch_scenarios().await.map(Fetched::Scenarios),
        RoundKind::Question => repository.fetch_questions().await.map(Fetched::Questions),
    };
    Some(fetched.unwrap_or_else(|err| {
        warn!(%err, %kind, "content fetch failed");
        match kind {
            RoundKind::Scenario => Fetched::Scenarios(Vec::new()),
            RoundKind::Question => Fetched::Questions(Vec::new()),
        }
    }))
}

fn log_finish(player_id: &PlayerId, reply: &Reply) {
    if let Step::Summary(summary) = &reply.step {
        info!(
            %player_id,
            total_time = summary.total_time,
            total_score = summary.total_score,
            total_bonus = summary.total_bonus,
            rounds_played = summary.rounds_played,
            content_exhausted = summary.content_exhausted,
            "session finished"
        );
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use chrono::{TimeZone, Utc};
    use odyssey_core::content::{QuestionRow, ScenarioRow};
    use odyssey_test_support::{
        FailingContentRepository, FlakyContentRepository, ManualClock, MockRng,
        StaticContentRepository, question, rng_factory, scenario, scenario_with_bonus,
    };
    use uuid::Uuid;

    use super::*;
    use crate::application::query_handlers::get_session;
    use crate::domain::session::PhaseKind;

    struct Harness {
        config: GameConfig,
        store: SessionStore,
        clock: ManualClock,
    }

    impl Harness {
        fn new(max_rounds: u32) -> Self {
            Self {
                config: GameConfig {
                    max_rounds,
                    ..GameConfig::default()
                },
                store: SessionStore::new(Duration::from_secs(600), rng_factory(MockRng)),
                clock: ManualClock::new(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()),
            }
        }

        fn ctx<'a>(&'a self, repository: &'a dyn ContentRepository) -> GameContext<'a> {
            GameContext {
                config: &self.config,
                store: &self.store,
                repository,
                clock: &self.clock,
            }
        }
    }

    fn start(player: &str) -> StartSession {
        StartSession {
            correlation_id: Uuid::new_v4(),
            player_id: PlayerId::new(player),
        }
    }

    fn input(player: &str, text: &str) -> SubmitInput {
        SubmitInput {
            correlation_id: Uuid::new_v4(),
            player_id: PlayerId::new(player),
            raw_text: text.to_owned(),
        }
    }

    fn rows(count: usize) -> (Vec<ScenarioRow>, Vec<QuestionRow>) {
        (
            (1..=count).map(|i| scenario(&format!("S{i}"), 10, 20)).collect(),
            (1..=count).map(|i| question(&format!("Q{i}"), 1, 10)).collect(),
        )
    }

    #[tokio::test]
    async fn test_handle_start_session_offers_first_scenario() {
        // Arrange
        let harness = Harness::new(10);
        let (scenarios, questions) = rows(5);
        let repo = StaticContentRepository::new(scenarios, questions);

        // Act
        let reply = handle_start_session(&start("alice"), harness.ctx(&repo))
            .await
            .unwrap();

        // Assert
        let Step::Prompt(prompt) = reply.step else {
            panic!("expected a prompt");
        };
        assert_eq!(prompt.item_text, "S1");
        assert_eq!(repo.scenario_fetches(), 1);
        assert_eq!(repo.question_fetches(), 0);
    }

    #[tokio::test]
    async fn test_handle_start_session_with_failing_repository_leaves_idle_session() {
        // Arrange
        let harness = Harness::new(10);
        let player_id = PlayerId::new("alice");

        // Act
        let result = handle_start_session(&start("alice"), harness.ctx(&FailingContentRepository)).await;

        // Assert
        assert_eq!(
            result.unwrap_err(),
            DomainError::ContentUnavailable(RoundKind::Scenario)
        );
        let view = get_session(&player_id, &harness.store).unwrap();
        assert_eq!(view.phase, PhaseKind::Idle);
        assert_eq!(view.round_index, 0);
        assert_eq!(view.used_scenario_count, 0);
    }

    #[tokio::test]
    async fn test_handle_start_session_with_empty_repository_reports_unavailable() {
        let harness = Harness::new(10);
        let repo = StaticContentRepository::default();

        let result = handle_start_session(&start("alice"), harness.ctx(&repo)).await;

        assert_eq!(
            result.unwrap_err(),
            DomainError::ContentUnavailable(RoundKind::Scenario)
        );
    }

    #[tokio::test]
    async fn test_retrying_start_after_outage_succeeds() {
        // Arrange
        let harness = Harness::new(10);
        let (scenarios, questions) = rows(5);
        let repo = FlakyContentRepository::new(StaticContentRepository::new(scenarios, questions), 1);

        // Act
        let first = handle_start_session(&start("alice"), harness.ctx(&repo)).await;
        let second = handle_start_session(&start("alice"), harness.ctx(&repo)).await;

        // Assert
        assert!(first.is_err());
        assert!(matches!(second.unwrap().step, Step::Prompt(_)));
    }

    #[tokio::test]
    async fn test_handle_submit_input_without_session_is_not_started() {
        let harness = Harness::new(10);
        let repo = StaticContentRepository::default();

        let result = handle_submit_input(&input("alice", "1"), harness.ctx(&repo)).await;

        assert_eq!(result.unwrap_err(), DomainError::SessionNotStarted);
    }

    #[tokio::test]
    async fn test_handle_submit_input_rejects_invalid_token_without_fetching() {
        // Arrange
        let harness = Harness::new(10);
        let (scenarios, questions) = rows(5);
        let repo = StaticContentRepository::new(scenarios, questions);
        handle_start_session(&start("alice"), harness.ctx(&repo))
            .await
            .unwrap();

        // Act
        let result = handle_submit_input(&input("alice", "3"), harness.ctx(&repo)).await;

        // Assert
        assert!(matches!(result, Err(DomainError::InvalidInput { .. })));
        assert_eq!(repo.question_fetches(), 0);
        let view = get_session(&PlayerId::new("alice"), &harness.store).unwrap();
        assert_eq!(view.round_index, 0);
        assert_eq!(view.totals.time, 0);
    }

    #[tokio::test]
    async fn test_full_game_through_handlers() {
        // Arrange
        let harness = Harness::new(10);
        let (mut scenarios, questions) = rows(5);
        scenarios[0] = scenario_with_bonus("S1", 10, 20, 2);
        let repo = StaticContentRepository::new(scenarios, questions);
        handle_start_session(&start("alice"), harness.ctx(&repo))
            .await
            .unwrap();

        // Act
        let mut last = None;
        for text in ["2", "1", "1", "1", "1", "1", "1", "1", "1", "1"] {
            last = Some(
                handle_submit_input(&input("alice", text), harness.ctx(&repo))
                    .await
                    .unwrap(),
            );
        }

        // Assert
        let Some(Reply {
            step: Step::Summary(summary),
            ..
        }) = last
        else {
            panic!("expected a summary");
        };
        assert_eq!(summary.total_score, 50);
        assert_eq!(summary.total_time, 60);
        assert_eq!(summary.total_bonus, 1);
        assert_eq!(repo.scenario_fetches(), 5);
        assert_eq!(repo.question_fetches(), 5);

        let again = handle_submit_input(&input("alice", "1"), harness.ctx(&repo)).await;
        assert_eq!(again.unwrap_err(), DomainError::SessionFinished);
    }

    #[tokio::test]
    async fn test_answer_survives_content_outage_and_can_be_resent() {
        // Arrange
        let harness = Harness::new(10);
        let (scenarios, questions) = rows(5);
        let repo = FlakyContentRepository::new(StaticContentRepository::new(scenarios, questions), 0);
        handle_start_session(&start("alice"), harness.ctx(&repo))
            .await
            .unwrap();
        repo.fail_next(1);

        // Act
        let failed = handle_submit_input(&input("alice", "2"), harness.ctx(&repo)).await;
        let view = get_session(&PlayerId::new("alice"), &harness.store).unwrap();
        let retried = handle_submit_input(&input("alice", "2"), harness.ctx(&repo)).await;

        // Assert
        assert_eq!(
            failed.unwrap_err(),
            DomainError::ContentUnavailable(RoundKind::Question)
        );
        assert_eq!(view.phase, PhaseKind::AwaitingScenarioChoice);
        assert_eq!(view.round_index, 0);
        assert_eq!(view.totals.time, 0);

        let reply = retried.unwrap();
        assert_eq!(reply.result.unwrap().cost_or_points_applied, 20);
        assert!(matches!(reply.step, Step::Prompt(_)));
    }

    #[tokio::test]
    async fn test_restart_discards_previous_progress() {
        // Arrange
        let harness = Harness::new(10);
        let (scenarios, questions) = rows(5);
        let repo = StaticContentRepository::new(scenarios, questions);
        handle_start_session(&start("alice"), harness.ctx(&repo))
            .await
            .unwrap();
        handle_submit_input(&input("alice", "2"), harness.ctx(&repo))
            .await
            .unwrap();

        // Act
        let reply = handle_start_session(&start("alice"), harness.ctx(&repo))
            .await
            .unwrap();

        // Assert
        let Step::Prompt(prompt) = reply.step else {
            panic!("expected a prompt");
        };
        assert_eq!(prompt.item_text, "S1");
        assert_eq!(prompt.round_number, 1);
        let view = get_session(&PlayerId::new("alice"), &harness.store).unwrap();
        assert_eq!(view.totals.time, 0);
        assert_eq!(view.used_scenario_count, 1);
        assert_eq!(view.used_question_count, 0);
    }

    #[tokio::test]
    async fn test_players_progress_independently() {
        // Arrange
        let harness = Harness::new(10);
        let (scenarios, questions) = rows(5);
        let repo = StaticContentRepository::new(scenarios, questions);
        handle_start_session(&start("alice"), harness.ctx(&repo))
            .await
            .unwrap();
        handle_start_session(&start("bob"), harness.ctx(&repo))
            .await
            .unwrap();

        // Act
        handle_submit_input(&input("alice", "2"), harness.ctx(&repo))
            .await
            .unwrap();

        // Assert
        let alice = get_session(&PlayerId::new("alice"), &harness.store).unwrap();
        let bob = get_session(&PlayerId::new("bob"), &harness.store).unwrap();
        assert_eq!(alice.round_index, 1);
        assert_eq!(alice.totals.time, 20);
        assert_eq!(bob.round_index, 0);
        assert_eq!(bob.totals.time, 0);
    }

    #[tokio::test]
    async fn test_concurrent_inputs_from_one_player_resolve_one_round_at_a_time() {
        // Arrange
        let harness = Arc::new(Harness::new(10));
        let (scenarios, questions) = rows(5);
        let repo = Arc::new(StaticContentRepository::new(scenarios, questions));
        handle_start_session(&start("alice"), harness.ctx(repo.as_ref()))
            .await
            .unwrap();

        // Act
        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let harness = Arc::clone(&harness);
                let repo = Arc::clone(&repo);
                tokio::spawn(async move {
                    handle_submit_input(&input("alice", "1"), harness.ctx(repo.as_ref())).await
                })
            })
            .collect();
        let mut accepted = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(_) => accepted += 1,
                Err(DomainError::InputInProgress) => {}
                Err(other) => panic!("unexpected error {other:?}"),
            }
        }

        // Assert
        let view = get_session(&PlayerId::new("alice"), &harness.store).unwrap();
        assert!(accepted >= 1);
        assert_eq!(view.round_index, accepted);
    }

    #[tokio::test]
    async fn test_handle_end_session_removes_session() {
        let harness = Harness::new(10);
        let (scenarios, questions) = rows(5);
        let repo = StaticContentRepository::new(scenarios, questions);
        handle_start_session(&start("alice"), harness.ctx(&repo))
            .await
            .unwrap();
        let player_id = PlayerId::new("alice");

        handle_end_session(&player_id, &harness.store).unwrap();

        assert_eq!(
            handle_end_session(&player_id, &harness.store).unwrap_err(),
            DomainError::SessionNotFound(player_id)
        );
    }

    #[tokio::test]
    async fn test_handle_end_session_while_input_in_flight_keeps_session() {
        // Arrange
        let harness = Harness::new(10);
        let (scenarios, questions) = rows(5);
        let repo = StaticContentRepository::new(scenarios, questions);
        handle_start_session(&start("alice"), harness.ctx(&repo))
            .await
            .unwrap();
        let player_id = PlayerId::new("alice");
        let (claim, ()) = harness
            .store
            .claim_for_input(&player_id, harness.clock.now(), |_| Ok(()))
            .unwrap();

        // Act
        let result = handle_end_session(&player_id, &harness.store);

        // Assert
        assert_eq!(result.unwrap_err(), DomainError::InputInProgress);
        drop(claim);
        assert!(get_session(&player_id, &harness.store).is_ok());
    }

    #[tokio::test]
    async fn test_evict_idle_sessions_drops_sessions_past_timeout() {
        // Arrange
        let harness = Harness::new(10);
        let (scenarios, questions) = rows(5);
        let repo = StaticContentRepository::new(scenarios, questions);
        handle_start_session(&start("alice"), harness.ctx(&repo))
            .await
            .unwrap();
        harness.clock.advance(chrono::Duration::minutes(5));
        handle_start_session(&start("bob"), harness.ctx(&repo))
            .await
            .unwrap();

        // Act
        let before_timeout = evict_idle_sessions(&harness.store, &harness.clock).unwrap();
        harness.clock.advance(chrono::Duration::minutes(6));
        let after_timeout = evict_idle_sessions(&harness.store, &harness.clock).unwrap();

        // Assert
        assert_eq!(before_timeout, 0);
        assert_eq!(after_timeout, 1);
        assert_eq!(
            get_session(&PlayerId::new("alice"), &harness.store).unwrap_err(),
            DomainError::SessionNotFound(PlayerId::new("alice"))
        );
        assert!(get_session(&PlayerId::new("bob"), &harness.store).is_ok());
    }
}
