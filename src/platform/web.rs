//! Browser bindings
//!
//! JS supplies the scene graph as four callbacks and drives `frame()` from
//! `requestAnimationFrame`. Events and HUD state come back as JSON.

use glam::Vec3;
use js_sys::{Array, Function};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::persistence::LocalStorageStore;
use crate::runner::Runner;
use crate::scene::SceneGraph;
use crate::settings::Settings;
use crate::sim::{Aabb, Command, Difficulty, EntityKind};

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Bunny Runner starting...");
}

/// Scene graph implemented by JS callbacks:
/// - `create(handle, kind, x, y, z)`
/// - `setPosition(handle, x, y, z)`
/// - `destroy(handle)`
/// - `boundsOf(handle) -> [minX, minY, minZ, maxX, maxY, maxZ] | undefined` (optional)
pub struct JsScene {
    create: Function,
    set_position: Function,
    destroy: Function,
    bounds_of: Option<Function>,
    next_handle: u32,
}

fn call_args(handle: u32, position: Vec3, kind: Option<EntityKind>) -> Array {
    let args = Array::new();
    args.push(&JsValue::from(handle));
    if let Some(kind) = kind {
        args.push(&JsValue::from_str(kind.as_str()));
    }
    args.push(&JsValue::from(position.x));
    args.push(&JsValue::from(position.y));
    args.push(&JsValue::from(position.z));
    args
}

impl SceneGraph for JsScene {
    type Handle = u32;

    fn create(&mut self, kind: EntityKind, position: Vec3) -> u32 {
        let handle = self.next_handle;
        self.next_handle += 1;
        if let Err(e) = self
            .create
            .apply(&JsValue::NULL, &call_args(handle, position, Some(kind)))
        {
            log::warn!("scene create({}) failed: {:?}", kind.as_str(), e);
        }
        handle
    }

    fn set_position(&mut self, handle: u32, position: Vec3) {
        if let Err(e) = self
            .set_position
            .apply(&JsValue::NULL, &call_args(handle, position, None))
        {
            log::warn!("scene setPosition({}) failed: {:?}", handle, e);
        }
    }

    fn destroy(&mut self, handle: u32) {
        if let Err(e) = self.destroy.call1(&JsValue::NULL, &JsValue::from(handle)) {
            log::warn!("scene destroy({}) failed: {:?}", handle, e);
        }
    }

    fn bounds_of(&self, handle: u32) -> Option<Aabb> {
        let callback = self.bounds_of.as_ref()?;
        let value = callback.call1(&JsValue::NULL, &JsValue::from(handle)).ok()?;
        let array: Array = value.dyn_into().ok()?;
        if array.length() != 6 {
            return None;
        }
        let v: Vec<f32> = array
            .iter()
            .map(|x| x.as_f64().map(|f| f as f32))
            .collect::<Option<_>>()?;
        Some(Aabb::new(
            Vec3::new(v[0], v[1], v[2]),
            Vec3::new(v[3], v[4], v[5]),
        ))
    }
}

/// Game instance exported to JS
#[wasm_bindgen]
pub struct WebRunner {
    runner: Runner<JsScene, LocalStorageStore>,
    settings: Settings,
}

#[wasm_bindgen]
impl WebRunner {
    #[wasm_bindgen(constructor)]
    pub fn new(
        create: Function,
        set_position: Function,
        destroy: Function,
        bounds_of: Option<Function>,
    ) -> WebRunner {
        let settings = Settings::load();
        let scene = JsScene {
            create,
            set_position,
            destroy,
            bounds_of,
            next_handle: 1,
        };
        let seed = super::clock_seed();
        let runner = Runner::new(seed, settings.difficulty, scene, LocalStorageStore);
        WebRunner { runner, settings }
    }

    /// Advance one animation frame (`now` from `performance.now()`)
    pub fn frame(&mut self, now_ms: f64) {
        self.runner.frame(now_ms);
    }

    #[wasm_bindgen(js_name = finishLoading)]
    pub fn finish_loading(&mut self) -> bool {
        self.runner.command(Command::FinishLoading)
    }

    pub fn start(&mut self) -> bool {
        self.runner.command(Command::Start)
    }

    pub fn restart(&mut self) -> bool {
        self.runner.command(Command::Restart)
    }

    pub fn pause(&mut self) -> bool {
        self.runner.command(Command::Pause)
    }

    pub fn resume(&mut self) -> bool {
        self.runner.command(Command::Resume)
    }

    #[wasm_bindgen(js_name = showMenu)]
    pub fn show_menu(&mut self) -> bool {
        self.runner.command(Command::ShowMenu)
    }

    pub fn jump(&mut self) -> bool {
        self.runner.command(Command::Jump)
    }

    #[wasm_bindgen(js_name = moveLane)]
    pub fn move_lane(&mut self, direction: i32) -> bool {
        self.runner.command(Command::MoveLane(direction.signum() as i8))
    }

    #[wasm_bindgen(js_name = selectDifficulty)]
    pub fn select_difficulty(&mut self, name: &str) -> bool {
        let Some(difficulty) = Difficulty::from_str(name) else {
            log::warn!("Unknown difficulty: {}", name);
            return false;
        };
        self.apply_difficulty(Command::SelectDifficulty(difficulty))
    }

    #[wasm_bindgen(js_name = cycleDifficulty)]
    pub fn cycle_difficulty(&mut self, direction: i32) -> bool {
        self.apply_difficulty(Command::CycleDifficulty(direction.signum() as i8))
    }

    #[wasm_bindgen(js_name = toggleMusic)]
    pub fn toggle_music(&mut self) -> bool {
        let enabled = self.settings.toggle_music();
        self.settings.save();
        enabled
    }

    /// Set `musicEnabled`, `sfxEnabled`, `haptics` or `reducedMotion`
    #[wasm_bindgen(js_name = setSetting)]
    pub fn set_setting(&mut self, name: &str, enabled: bool) -> bool {
        if !self.settings.set_flag(name, enabled) {
            log::warn!("Unknown setting: {}", name);
            return false;
        }
        self.settings.save();
        true
    }

    /// Current preferences as JSON (audio and feedback flags for the UI)
    #[wasm_bindgen(js_name = settingsJson)]
    pub fn settings_json(&self) -> String {
        self.settings.to_json()
    }

    #[wasm_bindgen(js_name = setIdleMode)]
    pub fn set_idle_mode(&mut self, idle: bool) {
        self.runner.set_idle_mode(idle);
    }

    /// HUD snapshot as JSON
    #[wasm_bindgen(js_name = hudJson)]
    pub fn hud_json(&self) -> String {
        serde_json::to_string(&self.runner.hud()).unwrap_or_default()
    }

    /// Events since the last call as a JSON array
    #[wasm_bindgen(js_name = drainEventsJson)]
    pub fn drain_events_json(&mut self) -> String {
        serde_json::to_string(&self.runner.drain_events()).unwrap_or_else(|_| "[]".to_string())
    }
}

impl WebRunner {
    fn apply_difficulty(&mut self, command: Command) -> bool {
        let accepted = self.runner.command(command);
        if accepted {
            self.settings.difficulty = self.runner.state().difficulty;
            self.settings.save();
        }
        accepted
    }
}
