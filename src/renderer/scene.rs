//! Screen layouts for each game state

use std::path::Path;

use glam::Vec2;

use super::{Color, Image, Renderer};
use crate::error::{AssetError, SimResult};
use crate::game::{Menu, NameInput};
use crate::highscores::HighScoreEntry;
use crate::platform::TextureLoader;
use crate::sim::{EntityKind, Facing, PlayerMotion, World};

const MENU_X: f32 = 300.0;
const MENU_Y: f32 = 200.0;
const MENU_SPACING: f32 = 50.0;

/// Player frames cut from a 64x64 sheet of 32px cells, each stored in every
/// mirror orientation
#[derive(Debug, Clone)]
pub struct PlayerSprites {
    /// Indexed by motion, then by orientation (bit 0 mirrors x, bit 1 mirrors y)
    frames: [[Image; 4]; 4],
}

impl PlayerSprites {
    pub fn load<T: TextureLoader + ?Sized>(
        loader: &mut T,
        path: &Path,
    ) -> Result<Self, AssetError> {
        let sheet = loader.load_texture(path)?;
        let cells = [(0, 0), (32, 0), (0, 32), (32, 32)];
        let frames = cells.map(|(x, y)| {
            let base = loader.get_sprite_from_sheet(&sheet, x, y, 32, 32);
            [
                base,
                loader.flip_sprite(&base, true, false),
                loader.flip_sprite(&base, false, true),
                loader.flip_sprite(&base, true, true),
            ]
        });
        Ok(Self { frames })
    }

    /// Frame for a motion state, mirrored for facing and for inverted gravity
    pub fn frame(&self, motion: PlayerMotion, facing: Facing, inverted: bool) -> Image {
        let row = match motion {
            PlayerMotion::Idle => 0,
            PlayerMotion::Run => 1,
            PlayerMotion::Jump => 2,
            PlayerMotion::Fall => 3,
        };
        let orientation = usize::from(facing == Facing::Left) | (usize::from(inverted) << 1);
        self.frames[row][orientation]
    }
}

/// Draws menus, the playfield and overlays through a [`Renderer`]
#[derive(Debug, Clone, Default)]
pub struct SceneRenderer {
    sprites: Option<PlayerSprites>,
}

impl SceneRenderer {
    pub fn new(sprites: Option<PlayerSprites>) -> Self {
        Self { sprites }
    }

    pub fn has_sprites(&self) -> bool {
        self.sprites.is_some()
    }

    fn render_menu_items<R: Renderer + ?Sized>(renderer: &mut R, menu: &Menu) {
        for (i, item) in menu.items().iter().enumerate() {
            let color = if i == menu.selected_index() {
                Color::HIGHLIGHT
            } else {
                Color::WHITE
            };
            renderer.draw_text(item.label, MENU_X, MENU_Y + i as f32 * MENU_SPACING, color);
        }
    }

    pub fn render_menu<R: Renderer + ?Sized>(
        &self,
        renderer: &mut R,
        menu: &Menu,
        high_scores: &[HighScoreEntry],
    ) {
        renderer.clear();
        Self::render_menu_items(renderer, menu);
        renderer.draw_text("High Scores:", 300.0, 400.0, Color::WHITE);
        for (i, entry) in high_scores.iter().enumerate() {
            let line = format!("{}. {}: {}", i + 1, entry.name, entry.score);
            renderer.draw_text(&line, 300.0, 440.0 + i as f32 * 30.0, Color::WHITE);
        }
    }

    /// Visible objects in screen space, then the score
    pub fn render_game<R: Renderer + ?Sized>(
        &self,
        renderer: &mut R,
        world: &World,
    ) -> SimResult<()> {
        renderer.clear();
        let physics = &world.physics;
        let camera = &world.camera;

        for (kind, object) in world.objects.objects() {
            let position = object.position(physics)?;
            let size = object.size();
            if !camera.is_in_view(position, size.x, size.y) {
                continue;
            }
            let screen = camera.world_to_screen(position);
            match kind {
                EntityKind::Ground => renderer.draw_rect(screen, size, Color::GROUND),
                EntityKind::Player => {
                    let player = world.objects.player();
                    match (&self.sprites, player) {
                        (Some(sprites), Some(player)) => {
                            let frame = sprites.frame(
                                player.motion(),
                                player.facing(),
                                physics.is_gravity_inverted(),
                            );
                            renderer.draw_sprite(&frame, screen);
                        }
                        _ => renderer.draw_rect(screen, size, Color::PLAYER),
                    }
                }
            }
        }

        renderer.draw_text(&format!("Score: {}", world.score.score()), 5.0, 5.0, Color::WHITE);
        Ok(())
    }

    /// Dim the playfield and draw the pause menu over it
    pub fn render_pause_menu<R: Renderer + ?Sized>(
        &self,
        renderer: &mut R,
        menu: &Menu,
        viewport: Vec2,
    ) {
        renderer.draw_rect(Vec2::ZERO, viewport, Color::OVERLAY);
        renderer.draw_text("PAUSED", 350.0, 150.0, Color::WHITE);
        Self::render_menu_items(renderer, menu);
    }

    pub fn render_game_over<R: Renderer + ?Sized>(
        &self,
        renderer: &mut R,
        score: u64,
        name_input: &NameInput,
    ) {
        renderer.clear();
        renderer.draw_text("Game Over!", 300.0, 250.0, Color::RED);
        renderer.draw_text(&format!("Final Score: {}", score), 280.0, 300.0, Color::WHITE);

        renderer.draw_text("Enter your name:", 300.0, 350.0, Color::WHITE);
        renderer.draw_text(&format!("{}_", name_input.name()), 300.0, 400.0, Color::WHITE);
        renderer.draw_text("Press ENTER to confirm", 250.0, 450.0, Color::WHITE);
    }
}
