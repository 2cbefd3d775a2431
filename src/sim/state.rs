//! Game state and core simulation types
//!
//! Everything a run needs lives in [`GameState`] so ticks are pure functions of
//! state + input and can be replayed without a renderer attached.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::combo::ComboTracker;
use super::difficulty::{Difficulty, DifficultyProfile};
use super::spawner::SpawnTimer;
use crate::consts::*;
use crate::{lane_x, shift_lane};

/// Stable identifier for obstacles and collectibles
pub type EntityId = u32;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Assets still loading, nothing accepted but `FinishLoading`
    Loading,
    /// Between runs, difficulty can be changed
    Menu,
    /// Active run, the only phase that advances the simulation
    Playing,
    /// Run frozen, all state kept
    Paused,
    /// Run ended by an obstacle hit
    GameOver,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Loading => "loading",
            GamePhase::Menu => "menu",
            GamePhase::Playing => "playing",
            GamePhase::Paused => "paused",
            GamePhase::GameOver => "gameOver",
        }
    }

    /// A run is not in progress, so difficulty may change
    pub fn between_runs(&self) -> bool {
        matches!(self, GamePhase::Menu | GamePhase::GameOver)
    }
}

/// Obstacle types, all terminal on contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Flower,
    Log,
    Rock,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 3] = [ObstacleKind::Flower, ObstacleKind::Log, ObstacleKind::Rock];
}

/// Collectible types, all worth the same base points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectibleKind {
    Heart,
    Star,
    BunnyPlush,
}

impl CollectibleKind {
    pub const ALL: [CollectibleKind; 3] = [
        CollectibleKind::Heart,
        CollectibleKind::Star,
        CollectibleKind::BunnyPlush,
    ];
}

/// Anything the scene collaborator is asked to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Obstacle(ObstacleKind),
    Collectible(CollectibleKind),
}

impl EntityKind {
    /// Name used by the scene collaborator to pick a model
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Player => "bunny",
            EntityKind::Obstacle(ObstacleKind::Flower) => "flower",
            EntityKind::Obstacle(ObstacleKind::Log) => "log",
            EntityKind::Obstacle(ObstacleKind::Rock) => "rock",
            EntityKind::Collectible(CollectibleKind::Heart) => "heart",
            EntityKind::Collectible(CollectibleKind::Star) => "star",
            EntityKind::Collectible(CollectibleKind::BunnyPlush) => "bunnyPlush",
        }
    }

    pub fn is_obstacle(&self) -> bool {
        matches!(self, EntityKind::Obstacle(_))
    }

    /// Local bounds of the stock model, relative to the entity position.
    ///
    /// Obstacles stand on the ground (y = 0 at their origin), collectibles are
    /// centered on their float height.
    pub fn default_bounds(&self) -> Aabb {
        match self {
            // Body sphere through head and ears
            EntityKind::Player => Aabb::new(Vec3::new(-0.8, 0.0, -0.8), Vec3::new(0.8, 2.8, 0.8)),
            // Stem with a ring of petals on top
            EntityKind::Obstacle(ObstacleKind::Flower) => {
                Aabb::new(Vec3::new(-0.7, 0.0, -0.7), Vec3::new(0.7, 1.8, 0.7))
            }
            // Lying cylinder across the lane
            EntityKind::Obstacle(ObstacleKind::Log) => {
                Aabb::new(Vec3::new(-1.0, 0.0, -0.3), Vec3::new(1.0, 0.6, 0.3))
            }
            EntityKind::Obstacle(ObstacleKind::Rock) => {
                Aabb::new(Vec3::new(-0.5, 0.0, -0.5), Vec3::new(0.5, 1.0, 0.5))
            }
            EntityKind::Collectible(CollectibleKind::Heart) => {
                Aabb::new(Vec3::new(-0.4, -0.35, -0.2), Vec3::new(0.4, 0.35, 0.2))
            }
            EntityKind::Collectible(CollectibleKind::Star) => {
                Aabb::new(Vec3::new(-0.6, -0.6, -0.15), Vec3::new(0.6, 0.6, 0.15))
            }
            EntityKind::Collectible(CollectibleKind::BunnyPlush) => {
                Aabb::new(Vec3::new(-0.3, -0.25, -0.3), Vec3::new(0.3, 0.55, 0.3))
            }
        }
    }
}

/// An obstacle or collectible in an active set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub lane: usize,
    pub pos: Vec3,
    /// Simulation time (ms) at which the entity was spawned
    pub spawned_at_ms: f64,
    /// Bounds relative to `pos`
    pub local_bounds: Aabb,
}

impl Entity {
    pub fn new(id: EntityId, kind: EntityKind, lane: usize, pos: Vec3, spawned_at_ms: f64) -> Self {
        Self {
            id,
            kind,
            lane,
            pos,
            spawned_at_ms,
            local_bounds: kind.default_bounds(),
        }
    }

    /// World-space bounding volume
    pub fn bounds(&self) -> Aabb {
        self.local_bounds.translated(self.pos)
    }
}

/// The runner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Lane index (0..=2)
    pub lane: usize,
    pub pos: Vec3,
    /// Vertical velocity while airborne (units/tick)
    pub vel_y: f32,
    pub airborne: bool,
    /// Bounds relative to `pos`, before the hitbox shrink
    pub local_bounds: Aabb,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            lane: START_LANE,
            pos: Vec3::new(lane_x(START_LANE), 0.0, PLAYER_Z),
            vel_y: 0.0,
            airborne: false,
            local_bounds: EntityKind::Player.default_bounds(),
        }
    }
}

impl Player {
    /// Switch lanes, returns false when already at the edge
    pub fn move_lane(&mut self, delta: i8) -> bool {
        let lane = shift_lane(self.lane, delta);
        if lane == self.lane {
            return false;
        }
        self.lane = lane;
        true
    }

    /// Start a jump, no-op while already airborne
    pub fn jump(&mut self) -> bool {
        if self.airborne {
            return false;
        }
        self.airborne = true;
        self.vel_y = JUMP_POWER;
        true
    }

    /// Ease toward the lane and integrate the jump arc for one tick
    pub fn update(&mut self) {
        let target_x = lane_x(self.lane);
        self.pos.x += (target_x - self.pos.x) * LANE_EASING;

        if self.airborne {
            self.pos.y += self.vel_y;
            self.vel_y -= GRAVITY;
            if self.pos.y <= 0.0 {
                self.pos.y = 0.0;
                self.vel_y = 0.0;
                self.airborne = false;
            }
        }
    }

    /// Collision volume: visual bounds trimmed on every face
    pub fn hitbox(&self) -> Aabb {
        self.local_bounds
            .translated(self.pos)
            .shrunk_by_fraction(PLAYER_HITBOX_SHRINK)
    }
}

/// Why an entity left its active set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DespawnReason {
    /// Scrolled past the removal distance
    Passed,
    /// Picked up by the player
    Collected,
    /// Active sets cleared between runs
    RunCleared,
}

/// Side effects for the scene, UI and audio collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GameEvent {
    PhaseChanged { from: GamePhase, to: GamePhase },
    DifficultyChanged { difficulty: Difficulty },
    Spawned { id: EntityId, kind: EntityKind, position: Vec3 },
    Despawned { id: EntityId, reason: DespawnReason },
    LaneChanged { lane: usize },
    Jumped,
    Collected { id: EntityId, kind: CollectibleKind, position: Vec3, combo: u32, points: u64 },
    Milestone { threshold: u64 },
    SpeedUp { speed: f32 },
    Hit { id: EntityId, kind: ObstacleKind },
    GameOver { score: u64, new_best: bool },
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Seed the current RNG stream was created from
    pub seed: u64,
    pub rng: Pcg32,
    pub difficulty: Difficulty,
    pub phase: GamePhase,
    pub score: u64,
    pub best_score: u64,
    pub combo: ComboTracker,
    /// Scroll speed (units/tick)
    pub speed: f32,
    /// Simulation clock (ms), only advances while playing
    pub sim_time_ms: f64,
    /// Playing ticks in the current run
    pub time_ticks: u64,
    pub player: Player,
    /// Active obstacles (spawn order)
    pub obstacles: Vec<Entity>,
    /// Active collectibles (spawn order)
    pub collectibles: Vec<Entity>,
    pub obstacle_timer: SpawnTimer,
    pub collectible_timer: SpawnTimer,
    /// Lifetime spawn counters (diagnostic)
    pub total_obstacles_spawned: u64,
    pub total_collectibles_spawned: u64,
    /// Pending side effects, drained by the driver
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: EntityId,
}

impl GameState {
    /// Create a state in the loading phase
    pub fn new(seed: u64, best_score: u64) -> Self {
        let difficulty = Difficulty::default();
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            difficulty,
            phase: GamePhase::Loading,
            score: 0,
            best_score,
            combo: ComboTracker::default(),
            speed: difficulty.profile().base_speed,
            sim_time_ms: 0.0,
            time_ticks: 0,
            player: Player::default(),
            obstacles: Vec::new(),
            collectibles: Vec::new(),
            obstacle_timer: SpawnTimer::default(),
            collectible_timer: SpawnTimer::default(),
            total_obstacles_spawned: 0,
            total_collectibles_spawned: 0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Tuning for the selected difficulty
    pub fn profile(&self) -> DifficultyProfile {
        self.difficulty.profile()
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Move to `to`, recording the transition
    pub fn set_phase(&mut self, to: GamePhase) {
        let from = self.phase;
        if from != to {
            self.phase = to;
            self.emit(GameEvent::PhaseChanged { from, to });
        }
    }

    pub fn find_entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.obstacles
            .iter_mut()
            .chain(self.collectibles.iter_mut())
            .find(|e| e.id == id)
    }

    /// Release every active entity
    pub fn clear_entities(&mut self) {
        let ids: Vec<EntityId> = self
            .obstacles
            .drain(..)
            .chain(self.collectibles.drain(..))
            .map(|e| e.id)
            .collect();
        for id in ids {
            self.emit(GameEvent::Despawned {
                id,
                reason: DespawnReason::RunCleared,
            });
        }
    }

    /// Reset per-run state; difficulty, best score, the RNG stream and the
    /// player's measured bounds survive
    pub fn reset_run(&mut self) {
        self.clear_entities();
        self.score = 0;
        self.combo = ComboTracker::default();
        self.speed = self.profile().base_speed;
        self.sim_time_ms = 0.0;
        self.time_ticks = 0;
        self.player = Player {
            local_bounds: self.player.local_bounds,
            ..Player::default()
        };
        self.obstacle_timer = SpawnTimer::default();
        self.collectible_timer = SpawnTimer::default();
        self.total_obstacles_spawned = 0;
        self.total_collectibles_spawned = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_lane_clamped() {
        let mut player = Player::default();
        assert!(player.move_lane(-1));
        assert_eq!(player.lane, 0);
        assert!(!player.move_lane(-1));
        assert_eq!(player.lane, 0);

        player.lane = 2;
        assert!(!player.move_lane(1));
        assert_eq!(player.lane, 2);
    }

    #[test]
    fn test_jump_arc_lands() {
        let mut player = Player::default();
        assert!(player.jump());
        assert!(!player.jump(), "no double jump");

        let mut apex: f32 = 0.0;
        let mut ticks = 0;
        while player.airborne && ticks < 200 {
            player.update();
            apex = apex.max(player.pos.y);
            ticks += 1;
        }
        assert!(!player.airborne);
        assert_eq!(player.pos.y, 0.0);
        // v²/2g = 0.09 / 0.03 = 3.0, discrete steps overshoot slightly
        assert!(apex > 2.8 && apex < 3.3, "apex {}", apex);
        assert!(player.jump(), "can jump again after landing");
    }

    #[test]
    fn test_lane_easing_converges() {
        let mut player = Player::default();
        player.move_lane(1);
        for _ in 0..60 {
            player.update();
        }
        assert!((player.pos.x - 2.0).abs() < 0.01);
    }

    #[test]
    fn test_hitbox_smaller_than_model() {
        let player = Player::default();
        let visual = player.local_bounds.translated(player.pos);
        let hit = player.hitbox();
        assert!(hit.min.x > visual.min.x && hit.max.x < visual.max.x);
        assert!(hit.min.y > visual.min.y && hit.max.y < visual.max.y);
    }

    #[test]
    fn test_reset_run_clears_entities() {
        let mut state = GameState::new(1, 42);
        let id = state.next_entity_id();
        state.obstacles.push(Entity::new(
            id,
            EntityKind::Obstacle(ObstacleKind::Rock),
            0,
            Vec3::new(-2.0, 0.0, -10.0),
            0.0,
        ));
        state.score = 99;
        state.reset_run();
        assert!(state.obstacles.is_empty());
        assert_eq!(state.score, 0);
        assert_eq!(state.best_score, 42);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::Despawned { id, reason: DespawnReason::RunCleared }]
        );
    }

    #[test]
    fn test_reset_run_keeps_player_bounds() {
        let mut state = GameState::new(1, 0);
        let measured = Aabb::new(Vec3::new(-0.2, 0.0, -0.2), Vec3::new(0.2, 1.0, 0.2));
        state.player.local_bounds = measured;
        state.player.lane = 0;
        state.player.jump();
        state.reset_run();
        assert_eq!(state.player.local_bounds, measured);
        assert_eq!(state.player.lane, START_LANE);
        assert!(!state.player.airborne);
    }
}
