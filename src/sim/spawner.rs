//! Obstacle and collectible spawning
//!
//! Each active set has its own timer. Intervals are redrawn on every fire and
//! shrink as score and speed climb, down to fixed floors.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::difficulty::DifficultyProfile;
use super::state::{
    CollectibleKind, Entity, EntityId, EntityKind, GameEvent, GameState, ObstacleKind,
};
use crate::consts::*;
use crate::lane_x;

/// Fires once `interval_ms` has elapsed since the previous fire
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpawnTimer {
    /// Simulation time of the last fire; `None` means due immediately
    pub last_fire_ms: Option<f64>,
    pub interval_ms: f64,
}

impl SpawnTimer {
    pub fn is_due(&self, now_ms: f64) -> bool {
        match self.last_fire_ms {
            Some(last) => now_ms - last >= self.interval_ms,
            None => true,
        }
    }

    /// Re-arm after a fire
    pub fn rearm(&mut self, now_ms: f64, interval_ms: f64) {
        self.last_fire_ms = Some(now_ms);
        self.interval_ms = interval_ms;
    }
}

/// Obstacle interval range for the current score and speed
pub fn obstacle_interval_range(profile: &DifficultyProfile, score: u64, speed: f32) -> (f64, f64) {
    let (base_min, base_max) = profile.obstacle_interval;
    let progress = (1.0 - score as f64 / 1000.0).max(0.5);
    let base_speed = profile.base_speed as f64;
    let speed_factor = (1.0 - (speed as f64 - base_speed) / base_speed).max(0.5);
    (
        (base_min * speed_factor * progress).max(OBSTACLE_MIN_INTERVAL_FLOOR),
        (base_max * speed_factor * progress).max(OBSTACLE_MAX_INTERVAL_FLOOR),
    )
}

/// Collectible interval range for the current score
pub fn collectible_interval_range(profile: &DifficultyProfile, score: u64) -> (f64, f64) {
    let (base_min, base_max) = profile.collectible_interval;
    let progress = (1.0 - score as f64 / 2000.0).max(0.6);
    (
        (base_min * progress).max(COLLECTIBLE_MIN_INTERVAL_FLOOR),
        (base_max * progress).max(COLLECTIBLE_MAX_INTERVAL_FLOOR),
    )
}

fn draw_interval<R: Rng>(rng: &mut R, (min, max): (f64, f64)) -> f64 {
    if max <= min {
        return min;
    }
    rng.random_range(min..=max)
}

/// Lanes a collectible at `z` may use: those without an obstacle within
/// [`LANE_AVOID_DISTANCE`], or every lane when all are blocked
pub fn free_lanes_near(obstacles: &[Entity], z: f32) -> Vec<usize> {
    let mut lanes: Vec<usize> = (0..LANE_X.len()).collect();
    for obstacle in obstacles {
        if (obstacle.pos.z - z).abs() < LANE_AVOID_DISTANCE {
            lanes.retain(|&l| l != obstacle.lane);
        }
    }
    if lanes.is_empty() {
        lanes = (0..LANE_X.len()).collect();
    }
    lanes
}

/// Spawn an obstacle at `z` in a random lane. `None` when the cap is reached.
pub fn spawn_obstacle(state: &mut GameState, z: f32) -> Option<EntityId> {
    if state.obstacles.len() >= MAX_OBSTACLES {
        return None;
    }

    let lane = state.rng.random_range(0..LANE_X.len());
    let kind = ObstacleKind::ALL[state.rng.random_range(0..ObstacleKind::ALL.len())];
    let id = state.next_entity_id();
    let entity = Entity::new(
        id,
        EntityKind::Obstacle(kind),
        lane,
        Vec3::new(lane_x(lane), 0.0, z),
        state.sim_time_ms,
    );
    let position = entity.pos;
    state.obstacles.push(entity);
    state.total_obstacles_spawned += 1;
    state.emit(GameEvent::Spawned {
        id,
        kind: EntityKind::Obstacle(kind),
        position,
    });
    log::debug!(
        "Obstacle spawned: #{} {:?} lane {} z {:.2}",
        state.total_obstacles_spawned,
        kind,
        lane,
        z
    );
    Some(id)
}

/// Spawn a collectible at `z`, steering clear of nearby obstacles.
/// `None` when the cap is reached.
pub fn spawn_collectible(state: &mut GameState, z: f32) -> Option<EntityId> {
    if state.collectibles.len() >= MAX_COLLECTIBLES {
        return None;
    }

    let lanes = free_lanes_near(&state.obstacles, z);
    let lane = lanes[state.rng.random_range(0..lanes.len())];
    let kind = CollectibleKind::ALL[state.rng.random_range(0..CollectibleKind::ALL.len())];
    let id = state.next_entity_id();
    let entity = Entity::new(
        id,
        EntityKind::Collectible(kind),
        lane,
        Vec3::new(lane_x(lane), COLLECTIBLE_Y, z),
        state.sim_time_ms,
    );
    let position = entity.pos;
    state.collectibles.push(entity);
    state.total_collectibles_spawned += 1;
    state.emit(GameEvent::Spawned {
        id,
        kind: EntityKind::Collectible(kind),
        position,
    });
    log::debug!(
        "Collectible spawned: #{} {:?} lane {} active {}",
        state.total_collectibles_spawned,
        kind,
        lane,
        state.collectibles.len()
    );
    Some(id)
}

/// Fire whichever timers are due. Timers re-arm even when a cap blocks the spawn.
pub fn update_spawning(state: &mut GameState) {
    let now = state.sim_time_ms;
    let profile = state.profile();
    let player_z = state.player.pos.z;

    if state.obstacle_timer.is_due(now) {
        spawn_obstacle(state, player_z - OBSTACLE_SPAWN_DISTANCE);
        let range = obstacle_interval_range(&profile, state.score, state.speed);
        let interval = draw_interval(&mut state.rng, range);
        state.obstacle_timer.rearm(now, interval);
    }

    if state.collectible_timer.is_due(now) {
        spawn_collectible(state, player_z - COLLECTIBLE_SPAWN_DISTANCE);
        let range = collectible_interval_range(&profile, state.score);
        let interval = draw_interval(&mut state.rng, range);
        state.collectible_timer.rearm(now, interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::difficulty::Difficulty;
    use crate::sim::state::GamePhase;

    fn playing_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed, 0);
        state.phase = GamePhase::Playing;
        state
    }

    #[test]
    fn test_timer_due_immediately_then_waits() {
        let mut timer = SpawnTimer::default();
        assert!(timer.is_due(0.0));
        timer.rearm(0.0, 1000.0);
        assert!(!timer.is_due(999.0));
        assert!(timer.is_due(1000.0));
    }

    #[test]
    fn test_obstacle_range_at_start() {
        let p = Difficulty::Medium.profile();
        assert_eq!(obstacle_interval_range(&p, 0, p.base_speed), (1000.0, 2000.0));
    }

    #[test]
    fn test_obstacle_range_floors() {
        let p = Difficulty::Hard.profile();
        let (min, max) = obstacle_interval_range(&p, 10_000, p.max_speed);
        assert_eq!(min, OBSTACLE_MIN_INTERVAL_FLOOR);
        assert_eq!(max, OBSTACLE_MAX_INTERVAL_FLOOR);
    }

    #[test]
    fn test_collectible_range_scales_and_floors() {
        let p = Difficulty::Hard.profile();
        assert_eq!(collectible_interval_range(&p, 0), (3000.0, 5000.0));
        // progress bottoms out at 0.6
        let (min, max) = collectible_interval_range(&p, 100_000);
        assert!((min - 1800.0).abs() < 1e-6 && (max - 3000.0).abs() < 1e-6);
        let easy = Difficulty::Easy.profile();
        assert_eq!(
            collectible_interval_range(&easy, 100_000),
            (COLLECTIBLE_MIN_INTERVAL_FLOOR, COLLECTIBLE_MAX_INTERVAL_FLOOR)
        );
    }

    #[test]
    fn test_free_lanes_excludes_near_obstacles() {
        let mut state = playing_state(3);
        let id = state.next_entity_id();
        state.obstacles.push(Entity::new(
            id,
            EntityKind::Obstacle(ObstacleKind::Rock),
            0,
            Vec3::new(-2.0, 0.0, -44.0),
            0.0,
        ));
        let id = state.next_entity_id();
        state.obstacles.push(Entity::new(
            id,
            EntityKind::Obstacle(ObstacleKind::Rock),
            2,
            Vec3::new(2.0, 0.0, -30.0),
            0.0,
        ));
        // Lane 2 obstacle is 15 units away and does not count
        assert_eq!(free_lanes_near(&state.obstacles, -45.0), vec![1, 2]);
    }

    #[test]
    fn test_free_lanes_falls_back_when_all_blocked() {
        let obstacles: Vec<Entity> = (0..3)
            .map(|lane| {
                Entity::new(
                    lane as u32 + 1,
                    EntityKind::Obstacle(ObstacleKind::Log),
                    lane,
                    Vec3::new(lane_x(lane), 0.0, -45.0),
                    0.0,
                )
            })
            .collect();
        assert_eq!(free_lanes_near(&obstacles, -46.0), vec![0, 1, 2]);
    }

    #[test]
    fn test_collectible_avoids_blocked_lanes() {
        for seed in 0..50 {
            let mut state = playing_state(seed);
            for lane in [0, 2] {
                let id = state.next_entity_id();
                state.obstacles.push(Entity::new(
                    id,
                    EntityKind::Obstacle(ObstacleKind::Flower),
                    lane,
                    Vec3::new(lane_x(lane), 0.0, -45.0),
                    0.0,
                ));
            }
            spawn_collectible(&mut state, -45.0);
            assert_eq!(state.collectibles[0].lane, 1);
        }
    }

    #[test]
    fn test_caps_refuse_spawn() {
        let mut state = playing_state(11);
        for _ in 0..MAX_OBSTACLES {
            assert!(spawn_obstacle(&mut state, -50.0).is_some());
        }
        assert!(spawn_obstacle(&mut state, -50.0).is_none());
        assert_eq!(state.total_obstacles_spawned, MAX_OBSTACLES as u64);

        for _ in 0..MAX_COLLECTIBLES {
            assert!(spawn_collectible(&mut state, -45.0).is_some());
        }
        assert!(spawn_collectible(&mut state, -45.0).is_none());
    }

    #[test]
    fn test_update_spawning_fires_and_rearms() {
        let mut state = playing_state(5);
        update_spawning(&mut state);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.collectibles.len(), 1);
        assert_eq!(state.obstacles[0].pos.z, -OBSTACLE_SPAWN_DISTANCE);
        assert_eq!(state.collectibles[0].pos.z, -COLLECTIBLE_SPAWN_DISTANCE);

        let interval = state.obstacle_timer.interval_ms;
        assert!((1000.0..=2000.0).contains(&interval));

        // Not due yet
        state.sim_time_ms = interval - 1.0;
        update_spawning(&mut state);
        assert_eq!(state.obstacles.len(), 1);

        state.sim_time_ms = interval;
        update_spawning(&mut state);
        assert_eq!(state.obstacles.len(), 2);
    }

    #[test]
    fn test_capped_timer_still_rearms() {
        let mut state = playing_state(9);
        while spawn_obstacle(&mut state, -50.0).is_some() {}
        state.sim_time_ms = 12_345.0;
        update_spawning(&mut state);
        assert_eq!(state.obstacles.len(), MAX_OBSTACLES);
        assert_eq!(state.obstacle_timer.last_fire_ms, Some(12_345.0));
    }
}
