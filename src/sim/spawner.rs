//! Target spawning and the live target set

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::points_for_size;

/// Source of the current play-area dimensions (px)
pub trait PlayArea {
    fn size(&self) -> Vec2;
}

impl PlayArea for Vec2 {
    fn size(&self) -> Vec2 {
        *self
    }
}

/// A clickable target. Never mutated after creation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Target {
    /// Monotonic within a round
    pub id: u32,
    /// Top-left corner, inside the play area
    pub pos: Vec2,
    /// Edge length of the square hit box
    pub size: f32,
    /// Seconds until it disappears on its own
    pub lifetime: f32,
    /// Creation time (ms)
    pub spawned_at: u64,
}

impl Target {
    /// Points awarded for hitting this target
    pub fn points(&self) -> u32 {
        points_for_size(self.size)
    }

    /// Time (ms) at which the target expires
    pub fn expires_at(&self) -> u64 {
        self.spawned_at + (self.lifetime * 1000.0).round() as u64
    }

    /// Whether a point (play-area coordinates) falls on the target
    pub fn contains(&self, point: Vec2) -> bool {
        let rel = point - self.pos;
        rel.x >= 0.0 && rel.y >= 0.0 && rel.x <= self.size && rel.y <= self.size
    }
}

/// Produces targets and owns the live set
#[derive(Debug, Clone)]
pub struct TargetSpawner {
    /// Live targets (sorted by id)
    live: Vec<Target>,
    next_id: u32,
    rng: Pcg32,
    size_range: (f32, f32),
    lifetime_range: (f32, f32),
}

impl TargetSpawner {
    pub fn new(config: &GameConfig, seed: u64) -> Self {
        Self {
            live: Vec::new(),
            next_id: 0,
            rng: Pcg32::seed_from_u64(seed),
            size_range: (config.min_size, config.max_size),
            lifetime_range: (config.min_lifetime, config.max_lifetime),
        }
    }

    /// Spawn one target inside `area`. Returns `None` when the area is degenerate.
    pub fn spawn(&mut self, area: &impl PlayArea, now: u64) -> Option<Target> {
        let bounds = area.size();
        if !(bounds.x > 0.0 && bounds.y > 0.0 && bounds.is_finite()) {
            log::warn!("Skipping spawn: play area is {}x{}", bounds.x, bounds.y);
            return None;
        }

        let (min_size, max_size) = self.size_range;
        let (min_life, max_life) = self.lifetime_range;
        let size = self.rng.random_range(min_size..=max_size);
        let lifetime = self.rng.random_range(min_life..=max_life);

        // Keep the whole hit box on screen
        let max_x = (bounds.x - size).max(0.0);
        let max_y = (bounds.y - size).max(0.0);
        let pos = Vec2::new(
            self.rng.random_range(0.0..=max_x),
            self.rng.random_range(0.0..=max_y),
        );

        let target = self.place(pos, size, lifetime, now);
        log::debug!(
            "Spawned target {} size {:.1} at ({:.0}, {:.0}) for {:.2}s",
            target.id,
            size,
            pos.x,
            pos.y,
            lifetime
        );
        Some(target)
    }

    /// Add a target with explicit geometry, taking the next id
    pub fn place(&mut self, pos: Vec2, size: f32, lifetime: f32, now: u64) -> Target {
        let target = Target {
            id: self.next_id,
            pos,
            size,
            lifetime,
            spawned_at: now,
        };
        self.next_id += 1;
        self.live.push(target);
        target
    }

    /// Remove a target that was hit. Removing an id twice is a no-op.
    pub fn remove(&mut self, id: u32) -> Option<Target> {
        let idx = self.live.binary_search_by_key(&id, |t| t.id).ok()?;
        Some(self.live.remove(idx))
    }

    /// Remove a target whose lifetime ran out. No-op if it was already hit.
    pub fn expire(&mut self, id: u32) -> Option<Target> {
        let target = self.remove(id)?;
        log::debug!("Target {} expired", id);
        Some(target)
    }

    /// Topmost live target under `point`
    pub fn target_at(&self, point: Vec2) -> Option<&Target> {
        // Later targets are drawn on top
        self.live.iter().rev().find(|t| t.contains(point))
    }

    pub fn get(&self, id: u32) -> Option<&Target> {
        self.live
            .binary_search_by_key(&id, |t| t.id)
            .ok()
            .map(|idx| &self.live[idx])
    }

    /// Live targets, oldest first
    pub fn live(&self) -> &[Target] {
        &self.live
    }

    /// Drop every live target without touching the id counter
    pub fn clear(&mut self) {
        self.live.clear();
    }

    /// Drop every live target and restart ids from zero
    pub fn reset(&mut self) {
        self.live.clear();
        self.next_id = 0;
    }
}
