//! World scrolling and cleanup
//!
//! The player never moves along z; every active entity slides toward it
//! instead and is dropped once it is far enough behind.

use super::state::{DespawnReason, Entity, EntityId, GameEvent, GameState};
use crate::consts::REMOVAL_DISTANCE;

/// Advance every active entity by the current speed
pub fn scroll_entities(state: &mut GameState) {
    let speed = state.speed;
    for entity in state.obstacles.iter_mut().chain(state.collectibles.iter_mut()) {
        entity.pos.z += speed;
    }
}

fn drain_passed(entities: &mut Vec<Entity>, limit_z: f32) -> Vec<EntityId> {
    let mut removed = Vec::new();
    entities.retain(|e| {
        if e.pos.z > limit_z {
            removed.push(e.id);
            false
        } else {
            true
        }
    });
    removed
}

/// Remove entities that passed the removal threshold, returns how many went
pub fn cleanup_passed(state: &mut GameState) -> usize {
    let limit_z = state.player.pos.z + REMOVAL_DISTANCE;
    let mut removed = drain_passed(&mut state.obstacles, limit_z);
    removed.extend(drain_passed(&mut state.collectibles, limit_z));

    let count = removed.len();
    for id in removed {
        state.emit(GameEvent::Despawned {
            id,
            reason: DespawnReason::Passed,
        });
    }
    count
}
