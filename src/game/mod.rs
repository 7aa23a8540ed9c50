//! Frame loop and top-level flow
//!
//! [`Game`] owns the [`World`] and every port. Each frame it reads the clock,
//! polls input, feeds name entry on the game over screen, dispatches input to
//! the active state, ticks the simulation while playing, renders and advances
//! the clock.

pub mod menu;
pub mod name_input;
pub mod state;

pub use menu::{Menu, MenuAction, MenuItem};
pub use name_input::NameInput;
pub use state::{GameState, StateMachine};

use glam::Vec2;

use crate::error::SimResult;
use crate::highscores::HighScores;
use crate::persistence::ScoreStore;
use crate::platform::{Clock, InputSource, KeySet, LogicalKey, TextInput};
use crate::renderer::{PlayerSprites, Renderer, SceneRenderer};
use crate::settings::Settings;
use crate::sim::{TickInput, World, tick};

pub struct Game<R, I, C, S> {
    renderer: R,
    input: I,
    clock: C,
    store: S,
    settings: Settings,
    world: World,
    states: StateMachine,
    main_menu: Menu,
    pause_menu: Menu,
    name_input: NameInput,
    scene: SceneRenderer,
    high_scores: HighScores,
    held: KeySet,
    pressed: KeySet,
    running: bool,
    frames: u64,
}

impl<R, I, C, S> Game<R, I, C, S>
where
    R: Renderer,
    I: InputSource,
    C: Clock,
    S: ScoreStore,
{
    pub fn new(settings: Settings, seed: u64, renderer: R, input: I, clock: C, store: S) -> Self {
        let high_scores = store.load();
        Self {
            world: World::new(&settings, seed),
            name_input: NameInput::new(settings.session.max_name_length),
            renderer,
            input,
            clock,
            store,
            settings,
            states: StateMachine::new(),
            main_menu: Menu::main(),
            pause_menu: Menu::pause(),
            scene: SceneRenderer::default(),
            high_scores,
            held: KeySet::EMPTY,
            pressed: KeySet::EMPTY,
            running: true,
            frames: 0,
        }
    }

    /// Draw the player from a sprite sheet instead of a rectangle
    pub fn with_sprites(mut self, sprites: Option<PlayerSprites>) -> Self {
        self.scene = SceneRenderer::new(sprites);
        self
    }

    pub fn state(&self) -> GameState {
        self.states.current()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    pub fn name_input(&self) -> &NameInput {
        &self.name_input
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Frames completed so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run frames until input ends or Exit is chosen, then tear down
    pub fn run(&mut self) -> SimResult<()> {
        log::info!("Game loop starting");
        let result = self.run_frames();
        self.teardown();
        result
    }

    fn run_frames(&mut self) -> SimResult<()> {
        while self.frame()? {}
        Ok(())
    }

    /// Run one frame. Returns false when the loop should stop.
    pub fn frame(&mut self) -> SimResult<bool> {
        let dt = self.clock.get_delta_time();
        if !self.input.poll_events() {
            return Ok(false);
        }
        self.read_keys();

        if self.states.is(GameState::GameOver) {
            let text = self.input.get_text_input();
            self.process_text_input(text);
        }

        self.handle_input()?;
        if self.states.is(GameState::Playing) {
            self.update(dt)?;
        }
        self.render()?;
        self.clock.update();
        self.frames += 1;
        Ok(self.running)
    }

    fn read_keys(&mut self) {
        let held = KeySet::held(&self.input);
        self.pressed = held.newly_pressed(self.held);
        self.held = held;
    }

    /// Feed one text event to name entry; a confirmed name is saved
    pub fn process_text_input(&mut self, text: TextInput) {
        if !self.name_input.process(text) {
            return;
        }
        let name = self.name_input.name().trim().to_string();
        let score = self.world.score.score();
        if let Err(err) = self.store.save(&name, score) {
            log::warn!("Could not save score: {}", err);
        }
        self.high_scores = self.store.load();
        self.name_input.stop();
        self.states.change_state(GameState::Menu);
        self.reset_game();
        // The confirming Return must not also activate the menu
        self.pressed = KeySet::EMPTY;
    }

    fn handle_input(&mut self) -> SimResult<()> {
        let pressed = self.pressed;
        match self.states.current() {
            GameState::Menu => {
                if let Some(action) = navigate(&mut self.main_menu, pressed) {
                    self.activate(action)?;
                }
            }
            GameState::Playing => {
                if pressed.contains(LogicalKey::Pause) {
                    self.toggle_pause();
                }
            }
            GameState::Paused => {
                if pressed.contains(LogicalKey::Pause) {
                    self.toggle_pause();
                } else if let Some(action) = navigate(&mut self.pause_menu, pressed) {
                    self.activate(action)?;
                }
            }
            // Keys go to name entry through text events
            GameState::GameOver => {}
        }
        Ok(())
    }

    fn activate(&mut self, action: MenuAction) -> SimResult<()> {
        match action {
            MenuAction::StartGame => self.start_game()?,
            MenuAction::Options => log::info!("Options are not available yet"),
            MenuAction::Exit => {
                log::info!("Exit selected");
                self.running = false;
            }
            MenuAction::Resume => {
                self.states.change_state(GameState::Playing);
            }
            MenuAction::Restart => {
                self.reset_game();
                self.start_game()?;
            }
            MenuAction::ExitToMenu => {
                self.reset_game();
                self.states.change_state(GameState::Menu);
            }
        }
        Ok(())
    }

    /// Build a fresh run and enter Playing
    pub fn start_game(&mut self) -> SimResult<()> {
        self.world.start()?;
        self.states.change_state(GameState::Playing);
        Ok(())
    }

    pub fn toggle_pause(&mut self) {
        match self.states.current() {
            GameState::Playing => {
                self.pause_menu.reset_selection();
                self.states.change_state(GameState::Paused);
            }
            GameState::Paused => {
                self.states.change_state(GameState::Playing);
            }
            _ => {}
        }
    }

    /// Release the run's bodies and zero the score
    pub fn reset_game(&mut self) {
        self.world.reset();
    }

    fn update(&mut self, dt: f32) -> SimResult<()> {
        let input = TickInput {
            left: self.held.contains(LogicalKey::Left),
            right: self.held.contains(LogicalKey::Right),
            jump: self.held.contains(LogicalKey::Jump),
        };
        let outcome = tick(&mut self.world, &input, dt)?;
        if outcome.player_dead {
            self.enter_game_over();
        }
        Ok(())
    }

    fn enter_game_over(&mut self) {
        self.states.change_state(GameState::GameOver);
        let score = self.world.score.score();
        match self.high_scores.potential_rank(score) {
            Some(rank) => log::info!("Score {} qualifies for rank {}", score, rank),
            None => log::info!("Score {} does not make the leaderboard", score),
        }
        self.name_input.start();
    }

    fn render(&mut self) -> SimResult<()> {
        let renderer = &mut self.renderer;
        match self.states.current() {
            GameState::Menu => {
                let shown = self.high_scores.top(self.settings.session.menu_high_scores);
                self.scene.render_menu(renderer, &self.main_menu, shown);
            }
            GameState::Playing => self.scene.render_game(renderer, &self.world)?,
            GameState::Paused => {
                self.scene.render_game(renderer, &self.world)?;
                let viewport = Vec2::new(
                    self.settings.camera.viewport_width,
                    self.settings.camera.viewport_height,
                );
                self.scene
                    .render_pause_menu(renderer, &self.pause_menu, viewport);
            }
            GameState::GameOver => {
                self.scene
                    .render_game_over(renderer, self.world.score.score(), &self.name_input);
            }
        }
        renderer.present();
        Ok(())
    }

    fn teardown(&mut self) {
        self.world.reset();
        self.input.quit();
        log::info!("Game loop stopped after {} frames", self.frames);
    }
}

/// Apply menu navigation presses. Returns the activated action, if any.
fn navigate(menu: &mut Menu, pressed: KeySet) -> Option<MenuAction> {
    if pressed.contains(LogicalKey::Jump) {
        menu.select_previous();
    }
    if pressed.contains(LogicalKey::Down) {
        menu.select_next();
    }
    if pressed.contains(LogicalKey::Return) {
        menu.selected_action()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::persistence::MemoryScoreStore;
    use crate::platform::{FixedClock, ScriptedInput};
    use crate::renderer::RecordingRenderer;

    type TestGame = Game<RecordingRenderer, ScriptedInput, FixedClock, MemoryScoreStore>;

    fn game(script: ScriptedInput) -> TestGame {
        Game::new(
            Settings::default(),
            1,
            RecordingRenderer::new(),
            script,
            FixedClock::new(SIM_DT),
            MemoryScoreStore::new(),
        )
    }

    fn run_frames(game: &mut TestGame, frames: usize) {
        for _ in 0..frames {
            assert!(game.frame().unwrap());
        }
    }

    #[test]
    fn test_menu_start() {
        let mut game = game(ScriptedInput::new().press(LogicalKey::Return).idle(1));
        assert_eq!(game.state(), GameState::Menu);
        run_frames(&mut game, 1);
        assert_eq!(game.state(), GameState::Playing);
        assert_eq!(game.world().physics.body_count(), 11);
        assert!(game.renderer().has_text("Score: 0"));
    }

    #[test]
    fn test_pause_toggle_and_resume() {
        let script = ScriptedInput::new()
            .press(LogicalKey::Return)
            .press(LogicalKey::Pause)
            .press(LogicalKey::Pause)
            .press(LogicalKey::Pause)
            .press(LogicalKey::Return);
        let mut game = game(script);

        run_frames(&mut game, 3);
        assert_eq!(game.state(), GameState::Paused);
        assert!(game.renderer().has_text("PAUSED"));
        run_frames(&mut game, 2);
        assert_eq!(game.state(), GameState::Playing);
        run_frames(&mut game, 2);
        assert_eq!(game.state(), GameState::Paused);
        // Resume is selected by default
        run_frames(&mut game, 2);
        assert_eq!(game.state(), GameState::Playing);
    }

    #[test]
    fn test_pause_exit_to_menu_releases_world() {
        let script = ScriptedInput::new()
            .press(LogicalKey::Return)
            .press(LogicalKey::Pause)
            .press(LogicalKey::Down)
            .press(LogicalKey::Down)
            .press(LogicalKey::Return);
        let mut game = game(script);
        run_frames(&mut game, 9);

        assert_eq!(game.state(), GameState::Menu);
        assert_eq!(game.world().physics.body_count(), 0);
    }

    #[test]
    fn test_paused_world_does_not_move() {
        let script = ScriptedInput::new()
            .press(LogicalKey::Return)
            .press(LogicalKey::Pause)
            .idle(30);
        let mut game = game(script);
        run_frames(&mut game, 4);
        let player = game.world().objects.player().unwrap();
        let before = player.object().position(&game.world().physics).unwrap();
        run_frames(&mut game, 30);
        let player = game.world().objects.player().unwrap();
        let after = player.object().position(&game.world().physics).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_exit_stops_loop() {
        let script = ScriptedInput::new()
            .press(LogicalKey::Jump)
            .press(LogicalKey::Return)
            .idle(5);
        let mut game = game(script);
        game.run().unwrap();

        // Up from Start Game wraps to Exit
        assert_eq!(game.frames(), 3);
        assert!(game.input().has_quit());
        assert_eq!(game.state(), GameState::Menu);
    }

    #[test]
    fn test_pause_restart_builds_fresh_run() {
        let script = ScriptedInput::new()
            .press(LogicalKey::Return)
            .hold(&[LogicalKey::Right], 30)
            .press(LogicalKey::Pause)
            .press(LogicalKey::Down)
            .press(LogicalKey::Return);
        let mut game = game(script);

        run_frames(&mut game, 32);
        assert!(game.world().score.score() > 0);
        run_frames(&mut game, 6);

        assert_eq!(game.state(), GameState::Playing);
        assert_eq!(game.world().score.score(), 0);
        assert_eq!(game.world().runs(), 2);
        assert_eq!(game.world().physics.body_count(), 11);
    }

    #[test]
    fn test_pausing_again_selects_resume() {
        let script = ScriptedInput::new()
            .press(LogicalKey::Return)
            .press(LogicalKey::Pause)
            .press(LogicalKey::Down)
            .press(LogicalKey::Pause)
            .press(LogicalKey::Pause)
            .press(LogicalKey::Return);
        let mut game = game(script);

        run_frames(&mut game, 10);
        assert_eq!(game.state(), GameState::Paused);
        assert_eq!(game.pause_menu.selected_index(), 0);
        run_frames(&mut game, 2);

        assert_eq!(game.state(), GameState::Playing);
        assert_eq!(game.world().runs(), 1);
    }

    #[test]
    fn test_zero_score_death_starts_name_entry() {
        let mut game = game(ScriptedInput::new().idle(1));
        game.start_game().unwrap();
        game.enter_game_over();

        assert_eq!(game.state(), GameState::GameOver);
        assert_eq!(game.world().score.score(), 0);
        assert!(game.name_input().is_active());
    }

    #[test]
    fn test_zero_score_session_records_name() {
        let script = ScriptedInput::new()
            .press(LogicalKey::Return)
            .hold(&[LogicalKey::Left], 600)
            // Blank names are refused
            .enter()
            .type_text("Z")
            .enter()
            .idle(1);
        let mut game = game(script);
        game.run().unwrap();

        assert_eq!(game.state(), GameState::Menu);
        assert_eq!(game.high_scores().len(), 1);
        assert_eq!(game.high_scores().entries()[0].name, "Z");
        assert_eq!(game.high_scores().entries()[0].score, 0);
    }

    #[test]
    fn test_name_entry_return_is_consumed() {
        let mut game = game(ScriptedInput::new().idle(1));
        game.start_game().unwrap();
        game.world.score.update_score(500.0);
        game.enter_game_over();
        assert!(game.name_input().is_active());

        for c in "Zed".chars() {
            game.process_text_input(TextInput::Char(c));
        }
        game.pressed = KeySet::from_keys(&[LogicalKey::Return]);
        game.process_text_input(TextInput::Return);

        assert_eq!(game.state(), GameState::Menu);
        assert!(game.pressed.is_empty());
        assert_eq!(game.high_scores().entries()[0].name, "Zed");
        assert_eq!(game.high_scores().entries()[0].score, 300);
    }
}
