//! Shared application state.

use std::sync::Arc;

use odyssey_core::clock::Clock;
use odyssey_core::repository::ContentRepository;
use odyssey_core::rng::RngFactory;
use odyssey_session::application::command_handlers::GameContext;
use odyssey_session::application::store::SessionStore;
use odyssey_session::domain::config::GameConfig;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Deployment game policy.
    pub config: GameConfig,
    /// Per-player sessions.
    pub store: Arc<SessionStore>,
    /// Clock used for activity tracking.
    pub clock: Arc<dyn Clock + Send + Sync>,
    /// Scenario and question source.
    pub content_repository: Arc<dyn ContentRepository>,
}

impl AppState {
    /// Create new application state with an empty session store. Each new
    /// session draws its content with an RNG from `rng_factory`.
    #[must_use]
    pub fn new(
        config: GameConfig,
        clock: Arc<dyn Clock + Send + Sync>,
        rng_factory: RngFactory,
        content_repository: Arc<dyn ContentRepository>,
    ) -> Self {
        Self {
            config,
            store: Arc::new(SessionStore::new(config.idle_timeout, rng_factory)),
            clock,
            content_repository,
        }
    }

    /// Borrow the collaborators the session handlers need.
    #[must_use]
    pub fn game(&self) -> GameContext<'_> {
        GameContext {
            config: &self.config,
            store: &self.store,
            repository: self.content_repository.as_ref(),
            clock: self.clock.as_ref(),
        }
    }
}
