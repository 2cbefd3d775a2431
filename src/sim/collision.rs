//! Collision detection between the player and the active sets
//!
//! Obstacles are checked before collectibles: a tick that ends the run never
//! also collects.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::commands::game_over;
use super::state::{DespawnReason, EntityKind, GameEvent, GameState};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: max.max(min),
        }
    }

    pub fn from_center_half_extents(center: Vec3, half: Vec3) -> Self {
        let half = half.abs();
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Move every face inward by `fraction` of the box size on that axis
    pub fn shrunk_by_fraction(&self, fraction: f32) -> Self {
        let inset = self.size() * fraction;
        Self {
            min: self.min + inset,
            max: self.max - inset,
        }
    }

    /// Overlap test; touching faces count as intersecting
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.cmple(other.max).all() && self.max.cmpge(other.min).all()
    }
}

/// Resolve this tick's contacts. Returns true when an obstacle ended the run.
pub fn resolve_collisions(state: &mut GameState) -> bool {
    let player_box = state.player.hitbox();

    let hit = state
        .obstacles
        .iter()
        .find(|o| player_box.intersects(&o.bounds()))
        .and_then(|o| match o.kind {
            EntityKind::Obstacle(kind) => Some((o.id, kind)),
            _ => None,
        });

    if let Some((id, kind)) = hit {
        log::info!("Hit {:?} (id {}) at score {}", kind, id, state.score);
        state.emit(GameEvent::Hit { id, kind });
        game_over(state);
        return true;
    }

    // Reverse order so removal keeps earlier indices valid
    for i in (0..state.collectibles.len()).rev() {
        if !player_box.intersects(&state.collectibles[i].bounds()) {
            continue;
        }
        let item = state.collectibles.remove(i);
        if let EntityKind::Collectible(kind) = item.kind {
            let now = state.sim_time_ms;
            let award = state.combo.collect(now);
            state.score += award.points;
            state.emit(GameEvent::Collected {
                id: item.id,
                kind,
                position: item.pos,
                combo: award.combo,
                points: award.points,
            });
            state.emit(GameEvent::Despawned {
                id: item.id,
                reason: DespawnReason::Collected,
            });
            if let Some(threshold) = state.combo.check_milestone(state.score) {
                log::info!("Milestone reached: {}", threshold);
                state.emit(GameEvent::Milestone { threshold });
            }
        }
    }

    false
}
