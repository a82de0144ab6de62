//! In-memory game sessions keyed by game id.
//!
//! Each session sits behind its own `Mutex`, so a game is advanced by one
//! caller at a time while other games proceed independently. The outer map
//! is only write-locked to add or remove sessions.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use log::{debug, error, warn};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::view::{GameView, SequencedEvent, ValidActionsView};
use crate::core::{Action, DieSource, GameError, GameResult, RandomDie};
use crate::rules::RulesEngine;

/// Identifier issued for each new game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(Uuid);

impl GameId {
    /// Issue a fresh random id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an id received from a caller.
    pub fn parse(s: &str) -> GameResult<Self> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| GameError::UnknownGame(s.to_string()))
    }
}

impl Default for GameId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Builds the die for each new or reset game.
pub type DieFactory = Box<dyn Fn() -> Box<dyn DieSource> + Send + Sync>;

/// One game and its sequenced event history.
#[derive(Debug)]
pub struct GameSession {
    id: GameId,
    engine: RulesEngine,
    events: Vec<SequencedEvent>,
}

impl GameSession {
    #[must_use]
    pub fn id(&self) -> GameId {
        self.id
    }

    #[must_use]
    pub fn engine(&self) -> &RulesEngine {
        &self.engine
    }

    /// Every event so far, numbered from 1.
    #[must_use]
    pub fn events(&self) -> &[SequencedEvent] {
        &self.events
    }

    /// Sequence number of the newest event, 0 before any.
    #[must_use]
    pub fn latest_seq(&self) -> u64 {
        self.events.len() as u64
    }

    /// Events numbered after `seq`.
    #[must_use]
    pub fn events_since(&self, seq: u64) -> &[SequencedEvent] {
        let start = usize::try_from(seq).map_or(self.events.len(), |s| s.min(self.events.len()));
        &self.events[start..]
    }

    #[must_use]
    pub fn view(&self) -> GameView {
        GameView::from_state(self.engine.state())
    }

    #[must_use]
    pub fn valid_actions(&self) -> ValidActionsView {
        ValidActionsView::from_actions(&self.engine.valid_actions())
    }

    /// Apply an action and sequence every event it caused, including the
    /// round, match and game ends it triggered.
    fn apply(&mut self, action: Action) -> GameResult<Vec<SequencedEvent>> {
        let logged = self.engine.events().len();
        self.engine.apply_action(action)?;

        let start = self.latest_seq();
        let fresh: Vec<SequencedEvent> = self
            .engine
            .events()
            .iter()
            .skip(logged)
            .cloned()
            .enumerate()
            .map(|(i, event)| SequencedEvent {
                seq: start + i as u64 + 1,
                event,
            })
            .collect();
        self.events.extend(fresh.iter().cloned());
        Ok(fresh)
    }
}

/// Store of live game sessions.
pub struct SessionStore {
    sessions: RwLock<FxHashMap<GameId, Arc<Mutex<GameSession>>>>,
    die_factory: DieFactory,
}

impl SessionStore {
    /// A store whose games use entropy-seeded dice.
    #[must_use]
    pub fn new() -> Self {
        Self::with_die_factory(Box::new(|| -> Box<dyn DieSource> { Box::new(RandomDie::new()) }))
    }

    /// A store whose games draw from dice built by `factory`.
    #[must_use]
    pub fn with_die_factory(factory: DieFactory) -> Self {
        Self {
            sessions: RwLock::new(FxHashMap::default()),
            die_factory: factory,
        }
    }

    /// Number of live sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Start a new game and return its id.
    pub fn create<I, S>(&self, names: I) -> GameResult<GameId>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let engine = RulesEngine::new(names, (self.die_factory)())?;
        let id = GameId::new();
        let session = GameSession {
            id,
            engine,
            events: Vec::new(),
        };
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, Arc::new(Mutex::new(session)));
        debug!("created game {}", id);
        Ok(id)
    }

    fn entry(&self, id: GameId) -> GameResult<Arc<Mutex<GameSession>>> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
            .ok_or_else(|| GameError::UnknownGame(id.to_string()))
    }

    fn lock(entry: &Mutex<GameSession>) -> MutexGuard<'_, GameSession> {
        entry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Read a session under its lock.
    pub fn with_session<R>(&self, id: GameId, f: impl FnOnce(&GameSession) -> R) -> GameResult<R> {
        let entry = self.entry(id)?;
        let session = Self::lock(&entry);
        Ok(f(&*session))
    }

    /// Advance a game by one action.
    ///
    /// Rejected actions leave the session untouched. Illegal actions are
    /// logged as warnings; die source failures as errors.
    pub fn apply_action(&self, id: GameId, action: Action) -> GameResult<Vec<SequencedEvent>> {
        let entry = self.entry(id)?;
        let mut session = Self::lock(&entry);
        session.apply(action).map_err(|err| {
            if err.is_recoverable() {
                warn!("game {}: rejected {}: {}", id, action, err);
            } else {
                error!("game {}: {} failed: {}", id, action, err);
            }
            err
        })
    }

    /// Events after `since`, or all events when `since` is `None`.
    pub fn events_since(&self, id: GameId, since: Option<u64>) -> GameResult<Vec<SequencedEvent>> {
        self.with_session(id, |s| s.events_since(since.unwrap_or(0)).to_vec())
    }

    /// Restart a game with the same players, fresh dice and an empty history.
    pub fn reset(&self, id: GameId) -> GameResult<()> {
        let entry = self.entry(id)?;
        let mut session = Self::lock(&entry);
        let names: Vec<String> = session
            .engine
            .state()
            .players()
            .values()
            .map(|p| p.name.clone())
            .collect();
        session.engine = RulesEngine::new(names, (self.die_factory)())?;
        session.events.clear();
        debug!("reset game {}", id);
        Ok(())
    }

    /// Drop a game.
    pub fn remove(&self, id: GameId) -> GameResult<()> {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| GameError::UnknownGame(id.to_string()))
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
