//! Flip Runner headless demo
//!
//! Plays a scripted session against the recording renderer: start a run, move
//! right, fall off the left edge, enter a name and return to the menu.

use std::path::Path;
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use flip_runner::consts::SIM_DT;
use flip_runner::persistence::JsonScoreFile;
use flip_runner::platform::{FixedClock, HeadlessTextures, ScriptedInput};
use flip_runner::renderer::{DebugRenderer, PlayerSprites, RecordingRenderer};
use flip_runner::{Game, Settings};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Flip Runner starting...");

    let settings = Settings::load(Path::new("settings.json"));

    let mut textures = HeadlessTextures::new();
    let sprites = match PlayerSprites::load(&mut textures, &settings.session.sprite_sheet) {
        Ok(sprites) => Some(sprites),
        Err(err) => {
            log::warn!("{}; drawing the player as a rectangle", err);
            None
        }
    };

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default();
    log::info!("Seed: {}", seed);

    let renderer = DebugRenderer::new(RecordingRenderer::new(), settings.debug_overlay);
    let store = JsonScoreFile::new(&settings.session.scores_path);
    let mut game = Game::new(
        settings,
        seed,
        renderer,
        ScriptedInput::demo(),
        FixedClock::new(SIM_DT),
        store,
    )
    .with_sprites(sprites);

    match game.run() {
        Ok(()) => {
            if let Some(best) = game.high_scores().entries().first() {
                log::info!("Best score: {} by {}", best.score, best.name);
            }
            log::info!(
                "Session finished: {} frames presented",
                game.renderer().inner().frames_presented()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("Simulation failed: {}", err);
            ExitCode::FAILURE
        }
    }
}
