//! Simulation tick
//!
//! One call per display refresh: spawner, mover, player, speed, collisions,
//! passive score. Nothing advances outside the playing phase.

use super::collision::resolve_collisions;
use super::commands::{Command, apply_command};
use super::mover::{cleanup_passed, scroll_entities};
use super::spawner::update_spawning;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Per-tick input (held controls and demo mode)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Lane change requested this tick (-1, 0, +1)
    pub lane_delta: i8,
    /// Jump requested this tick
    pub jump: bool,
    /// Idle/demo mode - autopilot plays the run
    pub idle_mode: bool,
}

/// Advance the game state by one tick covering `dt_ms` of wall-clock time
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f64) {
    if state.phase != GamePhase::Playing {
        return;
    }

    let mut input = input.clone();
    if input.idle_mode {
        autopilot(state, &mut input);
    }
    if input.lane_delta != 0 {
        apply_command(state, Command::MoveLane(input.lane_delta));
    }
    if input.jump {
        apply_command(state, Command::Jump);
    }

    state.time_ticks += 1;
    state.sim_time_ms += dt_ms.clamp(0.0, MAX_FRAME_DT_MS);

    update_spawning(state);
    scroll_entities(state);
    cleanup_passed(state);
    state.player.update();
    update_speed(state);

    if resolve_collisions(state) {
        return;
    }

    if state.time_ticks.is_multiple_of(PASSIVE_SCORE_TICKS) {
        state.score += 1;
    }
}

/// Raise speed toward the score-based target, never lowering it within a run
fn update_speed(state: &mut GameState) {
    let old = state.speed;
    let target = state.profile().speed_for_score(state.score);
    state.speed = old.max(target);

    if (state.speed * 10.0).floor() > (old * 10.0).floor() {
        let speed = state.speed;
        log::debug!("Speed up: {:.3}", speed);
        state.emit(GameEvent::SpeedUp { speed });
    }
}

/// How far ahead the autopilot looks for threats
const AUTOPILOT_LOOKAHEAD: f32 = 12.0;

/// Demo-mode steering: dodge into a free neighbour lane, jump when boxed in,
/// otherwise drift toward the nearest collectible
fn autopilot(state: &GameState, input: &mut TickInput) {
    let player = &state.player;
    // Nearest obstacle (by distance ahead) per lane
    let threat = |lane: usize| {
        state
            .obstacles
            .iter()
            .filter(|o| o.lane == lane)
            .map(|o| player.pos.z - o.pos.z)
            .filter(|&dist| dist > -1.5 && dist < AUTOPILOT_LOOKAHEAD)
            .fold(None, |best: Option<f32>, d| Some(best.map_or(d, |b| b.min(d))))
    };

    let lane = player.lane;
    let neighbours = [lane.checked_sub(1), Some(lane + 1).filter(|&l| l < LANE_X.len())];

    if let Some(distance) = threat(lane) {
        if let Some(free) = neighbours.into_iter().flatten().find(|&l| threat(l).is_none()) {
            input.lane_delta = if free < lane { -1 } else { 1 };
        } else if distance < state.speed * 12.0 + 1.5 {
            input.jump = true;
        }
        return;
    }

    let target = state
        .collectibles
        .iter()
        .filter(|c| c.pos.z < player.pos.z && player.pos.z - c.pos.z < AUTOPILOT_LOOKAHEAD * 2.0)
        .max_by(|a, b| a.pos.z.total_cmp(&b.pos.z))
        .map(|c| c.lane);

    if let Some(target_lane) = target {
        if target_lane != lane {
            let step: i8 = if target_lane < lane { -1 } else { 1 };
            let next = crate::shift_lane(lane, step);
            if threat(next).is_none() {
                input.lane_delta = step;
            }
        }
    }
}
