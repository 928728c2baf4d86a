//! Round state machine
//!
//! `Idle -> Running -> Ended`, with `start` re-entering `Running` from any
//! phase. All timing goes through the session's `Scheduler`, advanced by the
//! caller with `advance_to`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::scheduler::Scheduler;
use super::spawner::{PlayArea, Target, TargetSpawner};
use crate::config::GameConfig;
use crate::error::SessionError;
use crate::identity::UserRecord;
use crate::store::UserStore;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first start
    Idle,
    /// Round in progress
    Running,
    /// Round finished, score committed
    Ended,
}

/// Timer kinds owned by a running round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Timer {
    Countdown,
    Spawn,
    Expire(u32),
}

/// Things the presentation layer may want to react to
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    Countdown { time_left: u32 },
    TargetSpawned { target: Target },
    TargetExpired { id: u32 },
    RoundEnded { score: u64 },
    ScoreCommitted { total: u64 },
}

/// One player's sequence of rounds
#[derive(Debug)]
pub struct GameSession<S: UserStore> {
    store: S,
    /// Session view of the signed-in user
    user: UserRecord,
    config: GameConfig,
    phase: GamePhase,
    score: u64,
    time_left: u32,
    /// Virtual time of the last processed timer (ms)
    now: u64,
    /// Set once the current round's score has been written back
    committed: bool,
    spawner: TargetSpawner,
    timers: Scheduler<Timer>,
}

impl<S: UserStore> GameSession<S> {
    /// Create a session for whoever is signed in to `store`
    pub fn new(store: S, config: GameConfig, seed: u64) -> Result<Self, SessionError> {
        config.validate()?;
        let user = store.get().ok_or(SessionError::NotAuthenticated)?;
        log::info!("Session for {} ({} pts), seed {}", user.username, user.points, seed);

        Ok(Self {
            store,
            user,
            spawner: TargetSpawner::new(&config, seed),
            time_left: config.round_secs,
            config,
            phase: GamePhase::Idle,
            score: 0,
            now: 0,
            committed: false,
            timers: Scheduler::new(),
        })
    }

    /// Begin a fresh round at `now` (ms). A round still running is abandoned
    /// without committing its score.
    pub fn start(&mut self, now: u64) {
        if self.phase == GamePhase::Running {
            log::info!("Restarting mid-round, discarding score {}", self.score);
        }

        self.timers.clear();
        self.spawner.reset();
        self.score = 0;
        self.time_left = self.config.round_secs;
        self.committed = false;
        self.now = now;
        self.phase = GamePhase::Running;

        self.timers
            .schedule_at(now + self.config.countdown_interval_ms, Timer::Countdown);
        self.timers
            .schedule_at(now + self.config.spawn_interval_ms, Timer::Spawn);
        log::info!("Round started ({}s)", self.time_left);
    }

    /// Fire every timer due at or before `now`, in deadline order.
    /// `area` is measured at each spawn.
    pub fn advance_to(&mut self, now: u64, area: &impl PlayArea) -> Vec<GameEvent> {
        let mut events = Vec::new();

        while let Some((due, timer)) = self.timers.pop_due(now) {
            self.now = due;
            match timer {
                Timer::Countdown => self.on_countdown(due, &mut events),
                Timer::Spawn => self.on_spawn(due, area, &mut events),
                Timer::Expire(id) => {
                    if self.spawner.expire(id).is_some() {
                        events.push(GameEvent::TargetExpired { id });
                    }
                }
            }
        }

        self.now = self.now.max(now);
        events
    }

    fn on_countdown(&mut self, due: u64, events: &mut Vec<GameEvent>) {
        if self.time_left <= 1 {
            self.time_left = 0;
            events.push(GameEvent::Countdown { time_left: 0 });
            self.end(events);
        } else {
            self.time_left -= 1;
            events.push(GameEvent::Countdown {
                time_left: self.time_left,
            });
            self.timers
                .schedule_at(due + self.config.countdown_interval_ms, Timer::Countdown);
        }
    }

    fn on_spawn(&mut self, due: u64, area: &impl PlayArea, events: &mut Vec<GameEvent>) {
        if let Some(target) = self.spawner.spawn(area, due) {
            self.timers
                .schedule_at(target.expires_at(), Timer::Expire(target.id));
            events.push(GameEvent::TargetSpawned { target });
        }
        self.timers
            .schedule_at(due + self.config.spawn_interval_ms, Timer::Spawn);
    }

    /// Running -> Ended. Pending spawns and expiries are dropped.
    fn end(&mut self, events: &mut Vec<GameEvent>) {
        self.phase = GamePhase::Ended;
        self.timers.clear();
        self.spawner.clear();
        log::info!("Round ended with {} pts", self.score);
        events.push(GameEvent::RoundEnded { score: self.score });

        if let Some(total) = self.commit() {
            events.push(GameEvent::ScoreCommitted { total });
        }
    }

    /// Merge the round score into the user record, at most once per round.
    /// A zero score writes nothing.
    fn commit(&mut self) -> Option<u64> {
        if self.committed || self.score == 0 {
            return None;
        }
        self.committed = true;

        let mut updated = self.user.clone();
        updated.points += self.score;
        if let Err(e) = self.store.set(&updated) {
            log::error!("Failed to store {} pts for {}: {}", updated.points, updated.username, e);
        } else {
            log::info!("Committed {} pts, total {}", self.score, updated.points);
        }
        self.user = updated;
        Some(self.user.points)
    }

    /// Register a hit on target `id`. Returns the points awarded, or `None`
    /// if the round is not running or the target is already gone.
    pub fn hit(&mut self, id: u32) -> Option<u32> {
        if self.phase != GamePhase::Running {
            return None;
        }
        let target = self.spawner.remove(id)?;
        let points = target.points();
        self.score += points as u64;
        log::debug!("Hit target {} (+{}), score {}", id, points, self.score);
        Some(points)
    }

    /// Register a click at a play-area position
    pub fn hit_at(&mut self, point: Vec2) -> Option<u32> {
        let id = self.spawner.target_at(point)?.id;
        self.hit(id)
    }

    /// Place a specific target now, outside the spawn cadence (scripted
    /// rounds, replays). Its expiry is scheduled like any other target.
    pub fn place_target(&mut self, pos: Vec2, size: f32, lifetime: f32) -> Option<Target> {
        if self.phase != GamePhase::Running {
            return None;
        }
        let target = self.spawner.place(pos, size, lifetime, self.now);
        self.timers
            .schedule_at(target.expires_at(), Timer::Expire(target.id));
        Some(target)
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Score of the current (or last) round
    pub fn score(&self) -> u64 {
        self.score
    }

    /// Seconds left in the round
    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    /// Live targets, oldest first
    pub fn targets(&self) -> &[Target] {
        self.spawner.live()
    }

    pub fn user(&self) -> &UserRecord {
        &self.user
    }

    /// Cumulative points including every committed round
    pub fn total_points(&self) -> u64 {
        self.user.points
    }

    /// Virtual time (ms)
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Deadline of the next pending timer, if a round is running
    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.next_due()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
