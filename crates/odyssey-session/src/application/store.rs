//! Keyed session store.
//!
//! Each player owns one slot behind its own mutex, holding the session and
//! the RNG that draws its content. The map lock is only held to look up,
//! insert or remove a slot; a slot lock is only held for the synchronous
//! parts of a transition and never across a content fetch.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use odyssey_core::error::DomainError;
use odyssey_core::player::PlayerId;
use odyssey_core::rng::{DeterministicRng, RngFactory};

use crate::domain::session::Session;

/// One player's session plus its bookkeeping.
pub struct SessionSlot {
    /// The session state.
    pub session: Session,
    /// Draws this player's content. Kept across restarts.
    pub(crate) rng: Box<dyn DeterministicRng>,
    /// Set while an action for this player is mid-flight.
    busy: bool,
    /// When the player last acted.
    last_active: DateTime<Utc>,
}

impl SessionSlot {
    fn new(now: DateTime<Utc>, rng: Box<dyn DeterministicRng>) -> Self {
        Self {
            session: Session::new(),
            rng,
            busy: false,
            last_active: now,
        }
    }
}

impl fmt::Debug for SessionSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionSlot")
            .field("session", &self.session)
            .field("busy", &self.busy)
            .field("last_active", &self.last_active)
            .finish_non_exhaustive()
    }
}

type SharedSlot = Arc<Mutex<SessionSlot>>;

/// Marks a slot busy for the duration of one action. Dropping the claim
/// clears the flag, including when the action's future is cancelled.
#[derive(Debug)]
pub struct SlotClaim {
    slot: SharedSlot,
}

impl SlotClaim {
    /// The claimed slot.
    #[must_use]
    pub fn slot(&self) -> &Mutex<SessionSlot> {
        &self.slot
    }
}

impl Drop for SlotClaim {
    fn drop(&mut self) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        slot.busy = false;
    }
}

/// Mapping from player to session, with idle expiry.
pub struct SessionStore {
    slots: RwLock<HashMap<PlayerId, SharedSlot>>,
    idle_timeout: TimeDelta,
    rng_factory: RngFactory,
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("slots", &self.slots)
            .field("idle_timeout", &self.idle_timeout)
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Creates an empty store whose sessions expire after `idle_timeout` of
    /// inactivity. Every new slot gets its own RNG from `rng_factory`.
    #[must_use]
    pub fn new(idle_timeout: Duration, rng_factory: RngFactory) -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
            idle_timeout: TimeDelta::from_std(idle_timeout).unwrap_or(TimeDelta::MAX),
            rng_factory,
        }
    }

    /// Claims the player's slot for a start action, creating it if needed,
    /// and resets its session to a fresh `Idle` one.
    ///
    /// # Errors
    ///
    /// Returns `InputInProgress` if another action for the player is
    /// mid-flight, or `Infrastructure` if a lock is poisoned.
    pub fn claim_for_start(
        &self,
        player_id: &PlayerId,
        now: DateTime<Utc>,
    ) -> Result<SlotClaim, DomainError> {
        let slot = {
            let mut slots = self.slots.write().map_err(poisoned)?;
            Arc::clone(
                slots
                    .entry(player_id.clone())
                    .or_insert_with(|| {
                        Arc::new(Mutex::new(SessionSlot::new(now, (self.rng_factory)())))
                    }),
            )
        };

        let mut guard = lock(&slot)?;
        if guard.busy {
            return Err(DomainError::InputInProgress);
        }
        guard.session = Session::new();
        guard.busy = true;
        guard.last_active = now;
        drop(guard);

        Ok(SlotClaim { slot })
    }

    /// Claims an existing slot for an input action after `check` accepts the
    /// session. `check` runs under the slot lock and its output is returned
    /// with the claim.
    ///
    /// # Errors
    ///
    /// Returns `SessionNotStarted` if the player has no session,
    /// `InputInProgress` if another action is mid-flight, whatever `check`
    /// returns, or `Infrastructure` if a lock is poisoned.
    pub fn claim_for_input<T>(
        &self,
        player_id: &PlayerId,
        now: DateTime<Utc>,
        check: impl FnOnce(&Session) -> Result<T, DomainError>,
    ) -> Result<(SlotClaim, T), DomainError> {
        let slot = self
            .get(player_id)?
            .ok_or(DomainError::SessionNotStarted)?;

        let mut guard = lock(&slot)?;
        if guard.busy {
            return Err(DomainError::InputInProgress);
        }
        guard.last_active = now;
        let checked = check(&guard.session)?;
        guard.busy = true;
        drop(guard);

        Ok((SlotClaim { slot }, checked))
    }

    /// Runs `read` against the player's session, if one exists.
    ///
    /// # Errors
    ///
    /// Returns `Infrastructure` if a lock is poisoned.
    pub fn read<T>(
        &self,
        player_id: &PlayerId,
        read: impl FnOnce(&Session) -> T,
    ) -> Result<Option<T>, DomainError> {
        let Some(slot) = self.get(player_id)? else {
            return Ok(None);
        };
        let guard = lock(&slot)?;
        Ok(Some(read(&guard.session)))
    }

    /// Removes the player's session. Returns `true` if one existed.
    ///
    /// # Errors
    ///
    /// Returns `InputInProgress` if an action for the player is mid-flight,
    /// or `Infrastructure` if a lock is poisoned.
    pub fn remove(&self, player_id: &PlayerId) -> Result<bool, DomainError> {
        let mut slots = self.slots.write().map_err(poisoned)?;
        let Some(slot) = slots.get(player_id) else {
            return Ok(false);
        };
        if lock(slot)?.busy {
            return Err(DomainError::InputInProgress);
        }
        slots.remove(player_id);
        Ok(true)
    }

    /// Removes every session idle for longer than the timeout. Busy slots
    /// are kept. Returns the number of evicted sessions.
    ///
    /// # Errors
    ///
    /// Returns `Infrastructure` if the map lock is poisoned.
    pub fn evict_idle(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        let mut slots = self.slots.write().map_err(poisoned)?;
        let before = slots.len();
        slots.retain(|_, slot| {
            let slot = slot.lock().unwrap_or_else(PoisonError::into_inner);
            slot.busy || now.signed_duration_since(slot.last_active) <= self.idle_timeout
        });
        Ok(before - slots.len())
    }

    /// Number of live sessions.
    ///
    /// # Errors
    ///
    /// Returns `Infrastructure` if the map lock is poisoned.
    pub fn len(&self) -> Result<usize, DomainError> {
        Ok(self.slots.read().map_err(poisoned)?.len())
    }

    /// Whether the store holds no sessions.
    ///
    /// # Errors
    ///
    /// Returns `Infrastructure` if the map lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, DomainError> {
        Ok(self.len()? == 0)
    }

    fn get(&self, player_id: &PlayerId) -> Result<Option<SharedSlot>, DomainError> {
        let slots = self.slots.read().map_err(poisoned)?;
        Ok(slots.get(player_id).cloned())
    }
}

/// Locks a slot, mapping poisoning to an infrastructure error.
pub(crate) fn lock(slot: &Mutex<SessionSlot>) -> Result<MutexGuard<'_, SessionSlot>, DomainError> {
    slot.lock().map_err(poisoned)
}

fn poisoned<T>(_: PoisonError<T>) -> DomainError {
    DomainError::Infrastructure("session store lock poisoned".to_owned())
}
