//! Player commands and run phase transitions
//!
//! ```text
//! Loading -> Menu -> Playing <-> Paused
//!                    Playing -> GameOver -> Menu | Playing
//! ```

use serde::{Deserialize, Serialize};

use super::difficulty::Difficulty;
use super::spawner::spawn_collectible;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::INITIAL_COLLECTIBLE_Z;

/// Discrete commands accepted by the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    FinishLoading,
    Start,
    MoveLane(i8),
    Jump,
    Pause,
    Resume,
    Restart,
    ShowMenu,
    SelectDifficulty(Difficulty),
    CycleDifficulty(i8),
}

/// Apply a command. Returns false when it is not valid in the current phase
/// (or changes nothing) and was ignored.
pub fn apply_command(state: &mut GameState, command: Command) -> bool {
    use GamePhase::*;

    let accepted = match (command, state.phase) {
        (Command::FinishLoading, Loading) => {
            state.set_phase(Menu);
            true
        }
        (Command::Start, Menu | GameOver) | (Command::Restart, Playing | Paused | GameOver) => {
            start_run(state);
            true
        }
        (Command::MoveLane(delta), Playing) => {
            let moved = state.player.move_lane(delta.signum());
            if moved {
                let lane = state.player.lane;
                state.emit(GameEvent::LaneChanged { lane });
            }
            moved
        }
        (Command::Jump, Playing) => {
            let jumped = state.player.jump();
            if jumped {
                state.emit(GameEvent::Jumped);
            }
            jumped
        }
        (Command::Pause, Playing) => {
            state.set_phase(Paused);
            true
        }
        (Command::Resume, Paused) => {
            state.set_phase(Playing);
            true
        }
        (Command::ShowMenu, Paused | GameOver) => {
            state.clear_entities();
            state.set_phase(Menu);
            true
        }
        (Command::SelectDifficulty(difficulty), phase) if phase.between_runs() => {
            select_difficulty(state, difficulty);
            true
        }
        (Command::CycleDifficulty(direction), phase) if phase.between_runs() => {
            let next = state.difficulty.cycle(direction);
            select_difficulty(state, next);
            true
        }
        _ => false,
    };

    if !accepted {
        log::debug!("Ignored {:?} in phase {:?}", command, state.phase);
    }
    accepted
}

fn select_difficulty(state: &mut GameState, difficulty: Difficulty) {
    state.difficulty = difficulty;
    state.speed = difficulty.profile().base_speed;
    log::info!("Difficulty set to {} ({})", difficulty.as_str(), difficulty.profile().name);
    state.emit(GameEvent::DifficultyChanged { difficulty });
}

/// Begin a fresh run with the selected difficulty
pub fn start_run(state: &mut GameState) {
    state.reset_run();
    for z in INITIAL_COLLECTIBLE_Z {
        spawn_collectible(state, z);
    }
    state.set_phase(GamePhase::Playing);
    log::info!(
        "Run started on {} (best {})",
        state.difficulty.as_str(),
        state.best_score
    );
}

/// End the run after an obstacle hit, keeping entities until the next transition
pub fn game_over(state: &mut GameState) {
    let new_best = state.score > state.best_score;
    if new_best {
        state.best_score = state.score;
    }
    state.set_phase(GamePhase::GameOver);
    log::info!("Game over: score {} (new best: {})", state.score, new_best);
    state.emit(GameEvent::GameOver {
        score: state.score,
        new_best,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu_state() -> GameState {
        let mut state = GameState::new(21, 0);
        assert!(apply_command(&mut state, Command::FinishLoading));
        assert_eq!(state.phase, GamePhase::Menu);
        state
    }

    #[test]
    fn test_loading_only_accepts_finish() {
        let mut state = GameState::new(21, 0);
        assert!(!apply_command(&mut state, Command::Start));
        assert!(!apply_command(&mut state, Command::Jump));
        assert_eq!(state.phase, GamePhase::Loading);
    }

    #[test]
    fn test_start_seeds_collectibles() {
        let mut state = menu_state();
        assert!(apply_command(&mut state, Command::Start));
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.collectibles.len(), INITIAL_COLLECTIBLE_Z.len());
        assert_eq!(state.speed, state.profile().base_speed);
    }

    #[test]
    fn test_pause_resume() {
        let mut state = menu_state();
        apply_command(&mut state, Command::Start);
        assert!(!apply_command(&mut state, Command::Resume));
        assert!(apply_command(&mut state, Command::Pause));
        assert_eq!(state.phase, GamePhase::Paused);
        assert!(!apply_command(&mut state, Command::Jump));
        assert!(!apply_command(&mut state, Command::MoveLane(1)));
        assert!(apply_command(&mut state, Command::Resume));
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_move_lane_edges_are_noops() {
        let mut state = menu_state();
        apply_command(&mut state, Command::Start);
        assert!(apply_command(&mut state, Command::MoveLane(-1)));
        assert!(!apply_command(&mut state, Command::MoveLane(-1)));
        assert_eq!(state.player.lane, 0);
        assert!(apply_command(&mut state, Command::MoveLane(1)));
        assert!(apply_command(&mut state, Command::MoveLane(1)));
        assert!(!apply_command(&mut state, Command::MoveLane(1)));
        assert_eq!(state.player.lane, 2);
    }

    #[test]
    fn test_difficulty_only_between_runs() {
        let mut state = menu_state();
        assert!(apply_command(&mut state, Command::SelectDifficulty(Difficulty::Hard)));
        assert_eq!(state.difficulty, Difficulty::Hard);
        apply_command(&mut state, Command::Start);
        assert!(!apply_command(&mut state, Command::SelectDifficulty(Difficulty::Easy)));
        assert!(!apply_command(&mut state, Command::CycleDifficulty(1)));
        assert_eq!(state.difficulty, Difficulty::Hard);
        assert_eq!(state.speed, Difficulty::Hard.profile().base_speed);
    }

    #[test]
    fn test_game_over_records_best() {
        let mut state = menu_state();
        apply_command(&mut state, Command::Start);
        state.score = 120;
        game_over(&mut state);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.best_score, 120);
        assert!(state.drain_events().contains(&GameEvent::GameOver {
            score: 120,
            new_best: true
        }));

        // A lower score leaves the best alone
        apply_command(&mut state, Command::Restart);
        state.score = 50;
        game_over(&mut state);
        assert_eq!(state.best_score, 120);
    }

    #[test]
    fn test_leaving_game_over_clears_world() {
        let mut state = menu_state();
        apply_command(&mut state, Command::Start);
        game_over(&mut state);
        assert!(!state.collectibles.is_empty(), "world stays visible on game over");
        assert!(apply_command(&mut state, Command::ShowMenu));
        assert!(state.collectibles.is_empty());
        assert_eq!(state.phase, GamePhase::Menu);
    }
}
