//! Frame driver
//!
//! Owns the game state, feeds it wall-clock frame deltas, mirrors entity
//! lifecycles onto the scene and writes new best scores to storage. Whoever
//! removes an entity from an active set emits `Despawned`; the runner turns
//! that into exactly one `SceneGraph::destroy`.

use std::collections::HashMap;

use serde::Serialize;

use crate::persistence::{ScoreStore, load_best_score, save_best_score};
use crate::scene::SceneGraph;
use crate::sim::{
    Command, Difficulty, EntityId, EntityKind, GameEvent, GamePhase, GameState, TickInput,
    apply_command, tick,
};

/// What the UI collaborator displays
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hud {
    pub score: u64,
    pub best_score: u64,
    pub combo: u32,
    pub phase: GamePhase,
    pub difficulty: Difficulty,
    pub difficulty_name: &'static str,
    pub speed: f32,
}

/// Drives a [`GameState`] against a scene and a score store
pub struct Runner<S: SceneGraph, P: ScoreStore> {
    state: GameState,
    scene: S,
    store: P,
    handles: HashMap<EntityId, S::Handle>,
    player_handle: S::Handle,
    input: TickInput,
    last_frame_ms: Option<f64>,
    /// Events not yet handed to the UI
    pending: Vec<GameEvent>,
}

impl<S: SceneGraph, P: ScoreStore> Runner<S, P> {
    /// Create a runner in the loading phase, reading the best score from `store`
    pub fn new(seed: u64, difficulty: Difficulty, mut scene: S, store: P) -> Self {
        let best = load_best_score(&store);
        let mut state = GameState::new(seed, best);
        state.difficulty = difficulty;
        state.speed = difficulty.profile().base_speed;

        let player_handle = scene.create(EntityKind::Player, state.player.pos);
        if let Some(bounds) = scene.bounds_of(player_handle) {
            state.player.local_bounds = bounds.translated(-state.player.pos);
        }

        log::info!("Runner created with seed {} (best {})", seed, best);

        Self {
            state,
            scene,
            store,
            handles: HashMap::new(),
            player_handle,
            input: TickInput::default(),
            last_frame_ms: None,
            pending: Vec::new(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn store(&self) -> &P {
        &self.store
    }

    /// Let the autopilot play (menu background / demo)
    pub fn set_idle_mode(&mut self, idle: bool) {
        self.input.idle_mode = idle;
    }

    /// Apply a player command; returns false when it was ignored
    pub fn command(&mut self, command: Command) -> bool {
        // Restarting re-enters playing, so the next delta must not span the gap
        if matches!(command, Command::Start | Command::Restart | Command::Resume) {
            self.last_frame_ms = None;
        }
        let accepted = apply_command(&mut self.state, command);
        self.process_events();
        accepted
    }

    /// Advance one display refresh at wall-clock `now_ms`
    pub fn frame(&mut self, now_ms: f64) {
        let dt = self
            .last_frame_ms
            .map(|last| (now_ms - last).max(0.0))
            .unwrap_or(0.0);
        self.last_frame_ms = Some(now_ms);

        let input = self.input.clone();
        tick(&mut self.state, &input, dt);
        self.input.lane_delta = 0;
        self.input.jump = false;

        self.process_events();
        self.sync_positions();
    }

    /// Snapshot for the HUD
    pub fn hud(&self) -> Hud {
        let profile = self.state.profile();
        Hud {
            score: self.state.score,
            best_score: self.state.best_score,
            combo: self.state.combo.count,
            phase: self.state.phase,
            difficulty: self.state.difficulty,
            difficulty_name: profile.name,
            speed: self.state.speed,
        }
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending)
    }

    fn process_events(&mut self) {
        for event in self.state.drain_events() {
            match &event {
                GameEvent::Spawned { id, kind, position } => {
                    let handle = self.scene.create(*kind, *position);
                    if let Some(bounds) = self.scene.bounds_of(handle) {
                        if let Some(entity) = self.state.find_entity_mut(*id) {
                            entity.local_bounds = bounds.translated(-*position);
                        }
                    }
                    self.handles.insert(*id, handle);
                }
                GameEvent::Despawned { id, .. } => match self.handles.remove(id) {
                    Some(handle) => self.scene.destroy(handle),
                    None => log::warn!("Despawn for entity {} without a scene handle", id),
                },
                GameEvent::GameOver { score, new_best: true } => {
                    save_best_score(&mut self.store, *score);
                }
                _ => {}
            }
            self.pending.push(event);
        }
    }

    fn sync_positions(&mut self) {
        self.scene
            .set_position(self.player_handle, self.state.player.pos);
        for entity in self.state.obstacles.iter().chain(&self.state.collectibles) {
            if let Some(&handle) = self.handles.get(&entity.id) {
                self.scene.set_position(handle, entity.pos);
            }
        }
    }
}
