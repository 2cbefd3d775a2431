//! Bunny Runner entry point
//!
//! The browser build is driven from JS through `platform::web`. Natively this
//! runs a headless demo: the autopilot plays one run at 60 Hz simulated time.
//!
//! Usage: `bunny-runner [easy|medium|hard] [data-dir]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use bunny_runner::persistence::FileStore;
    use bunny_runner::scene::HeadlessScene;
    use bunny_runner::sim::{Command, Difficulty, GameEvent, GamePhase};
    use bunny_runner::{Runner, Settings};

    env_logger::init();
    log::info!("Bunny Runner (native) starting...");

    let mut args = std::env::args().skip(1);
    let difficulty_arg = args.next();
    let data_dir = args
        .next()
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("bunny-runner"));

    let mut settings = Settings::load_from(&data_dir);
    let difficulty = match difficulty_arg.as_deref() {
        Some(name) => Difficulty::from_str(name).unwrap_or_else(|| {
            log::warn!("Unknown difficulty {:?}, using {}", name, settings.difficulty.as_str());
            settings.difficulty
        }),
        None => settings.difficulty,
    };
    if difficulty != settings.difficulty {
        settings.difficulty = difficulty;
        if let Err(e) = settings.save_to(&data_dir) {
            log::warn!("Could not save settings: {}", e);
        }
    }

    let seed = bunny_runner::platform::clock_seed();
    let mut runner = Runner::new(
        seed,
        difficulty,
        HeadlessScene::new(),
        FileStore::in_dir(&data_dir),
    );
    runner.command(Command::FinishLoading);
    runner.set_idle_mode(true);
    runner.command(Command::Start);

    // Five simulated minutes at most
    const FRAME_MS: f64 = 1000.0 / 60.0;
    const MAX_FRAMES: u32 = 60 * 60 * 5;

    let mut now = 0.0;
    let mut collected = 0u32;
    let mut milestones = Vec::new();
    for _ in 0..MAX_FRAMES {
        runner.frame(now);
        now += FRAME_MS;

        for event in runner.drain_events() {
            match event {
                GameEvent::Collected { .. } => collected += 1,
                GameEvent::Milestone { threshold } => milestones.push(threshold),
                _ => {}
            }
        }
        if runner.state().phase == GamePhase::GameOver {
            break;
        }
    }

    let hud = runner.hud();
    let state = runner.state();
    println!("Difficulty:  {} ({})", hud.difficulty.as_str(), hud.difficulty_name);
    println!("Ticks:       {}", state.time_ticks);
    println!("Score:       {} (best {})", hud.score, hud.best_score);
    println!("Collected:   {}", collected);
    println!("Milestones:  {:?}", milestones);
    println!(
        "Spawned:     {} obstacles, {} collectibles",
        state.total_obstacles_spawned, state.total_collectibles_spawned
    );
    println!("Final speed: {:.3}", hud.speed);
    println!("Ended:       {}", hud.phase.as_str());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::wasm_start, this is just to satisfy the compiler
}
