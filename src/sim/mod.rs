//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only advances through `tick` while playing
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod combo;
pub mod commands;
pub mod difficulty;
pub mod mover;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{Aabb, resolve_collisions};
pub use combo::{Award, ComboTracker};
pub use commands::{Command, apply_command, game_over, start_run};
pub use difficulty::{Difficulty, DifficultyProfile};
pub use mover::{cleanup_passed, scroll_entities};
pub use spawner::{SpawnTimer, spawn_collectible, spawn_obstacle, update_spawning};
pub use state::{
    CollectibleKind, DespawnReason, Entity, EntityId, EntityKind, GameEvent, GamePhase, GameState,
    ObstacleKind, Player,
};
pub use tick::{TickInput, tick};
