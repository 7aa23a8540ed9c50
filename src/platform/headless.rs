//! Headless platform adapters
//!
//! A fixed-rate clock, a frame-by-frame input script and an in-memory texture
//! registry. Together they drive complete sessions without a window.

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};

use super::{Clock, InputSource, KeySet, LogicalKey, TextInput, TextureLoader};
use crate::error::AssetError;
use crate::renderer::Image;

/// Clock that reports the same delta every frame
#[derive(Debug, Clone)]
pub struct FixedClock {
    delta: f32,
    frames: u64,
}

impl FixedClock {
    pub fn new(delta: f32) -> Self {
        Self { delta, frames: 0 }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn elapsed(&self) -> f32 {
        self.frames as f32 * self.delta
    }
}

impl Clock for FixedClock {
    fn get_delta_time(&self) -> f32 {
        self.delta
    }

    fn update(&mut self) {
        self.frames += 1;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ScriptFrame {
    held: KeySet,
    text: TextInput,
}

/// Input played back from a script, one entry per frame. The session ends when
/// the script runs out or `quit` is called.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    script: VecDeque<ScriptFrame>,
    current: ScriptFrame,
    text_taken: bool,
    quit: bool,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a game, run right briefly, then run off the left edge, enter a
    /// name and return to the menu
    pub fn demo() -> Self {
        Self::new()
            .press(LogicalKey::Return)
            .hold(&[LogicalKey::Right], 30)
            .hold(&[LogicalKey::Left], 900)
            .type_text("ACE")
            .enter()
            .idle(10)
    }

    fn push(mut self, held: KeySet, text: TextInput) -> Self {
        self.script.push_back(ScriptFrame { held, text });
        self
    }

    /// Hold `keys` for `frames` frames
    pub fn hold(mut self, keys: &[LogicalKey], frames: usize) -> Self {
        let held = KeySet::from_keys(keys);
        for _ in 0..frames {
            self = self.push(held, TextInput::None);
        }
        self
    }

    /// One frame held, one frame released
    pub fn press(self, key: LogicalKey) -> Self {
        self.hold(&[key], 1).idle(1)
    }

    pub fn idle(self, frames: usize) -> Self {
        self.hold(&[], frames)
    }

    /// One character per frame
    pub fn type_text(mut self, text: &str) -> Self {
        for c in text.chars() {
            self = self.push(KeySet::EMPTY, TextInput::Char(c));
        }
        self
    }

    pub fn backspace(self) -> Self {
        self.push(KeySet::EMPTY, TextInput::Backspace)
    }

    /// Return as both a text event and a key press
    pub fn enter(self) -> Self {
        self.push(KeySet::from_keys(&[LogicalKey::Return]), TextInput::Return)
            .idle(1)
    }

    /// Frames left to play
    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    pub fn has_quit(&self) -> bool {
        self.quit
    }
}

impl InputSource for ScriptedInput {
    fn poll_events(&mut self) -> bool {
        if self.quit {
            return false;
        }
        match self.script.pop_front() {
            Some(frame) => {
                self.current = frame;
                self.text_taken = false;
                true
            }
            None => false,
        }
    }

    fn is_key_pressed(&self, key: LogicalKey) -> bool {
        self.current.held.contains(key)
    }

    fn get_text_input(&mut self) -> TextInput {
        if self.text_taken {
            return TextInput::None;
        }
        self.text_taken = true;
        self.current.text
    }

    fn quit(&mut self) {
        if !self.quit {
            log::debug!("Scripted input closed with {} frames unplayed", self.script.len());
        }
        self.quit = true;
    }
}

/// In-memory texture registry
#[derive(Debug, Clone, Default)]
pub struct HeadlessTextures {
    sizes: HashMap<PathBuf, (u32, u32)>,
    loaded: Vec<PathBuf>,
}

impl HeadlessTextures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `path` loadable with the given pixel size
    pub fn with_texture(mut self, path: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        self.sizes.insert(path.into(), (width, height));
        self
    }

    pub fn loaded(&self) -> &[PathBuf] {
        &self.loaded
    }
}

impl TextureLoader for HeadlessTextures {
    fn load_texture(&mut self, path: &Path) -> Result<Image, AssetError> {
        let &(width, height) = self.sizes.get(path).ok_or_else(|| AssetError::Missing {
            path: path.to_path_buf(),
        })?;
        let texture = self.loaded.len() as u32;
        self.loaded.push(path.to_path_buf());
        log::debug!("Texture {} loaded from '{}'", texture, path.display());
        Ok(Image {
            texture,
            x: 0,
            y: 0,
            width,
            height,
            flip_x: false,
            flip_y: false,
        })
    }

    fn get_sprite_from_sheet(&self, sheet: &Image, x: u32, y: u32, width: u32, height: u32)
    -> Image {
        Image {
            x: sheet.x + x,
            y: sheet.y + y,
            width,
            height,
            ..*sheet
        }
    }

    fn flip_sprite(&self, sprite: &Image, flip_x: bool, flip_y: bool) -> Image {
        Image {
            flip_x: sprite.flip_x ^ flip_x,
            flip_y: sprite.flip_y ^ flip_y,
            ..*sprite
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_plays_then_ends() {
        let mut input = ScriptedInput::new()
            .press(LogicalKey::Return)
            .type_text("A");

        assert!(input.poll_events());
        assert!(input.is_key_pressed(LogicalKey::Return));
        assert!(input.poll_events());
        assert!(!input.is_key_pressed(LogicalKey::Return));
        assert!(input.poll_events());
        assert_eq!(input.get_text_input(), TextInput::Char('A'));
        // Text is consumed once per frame
        assert_eq!(input.get_text_input(), TextInput::None);
        assert!(!input.poll_events());
    }

    #[test]
    fn test_quit_ends_session() {
        let mut input = ScriptedInput::new().idle(5);
        input.quit();
        assert!(!input.poll_events());
        assert_eq!(input.remaining(), 5);
    }

    #[test]
    fn test_textures() {
        let mut textures = HeadlessTextures::new().with_texture("sheet.png", 128, 64);
        assert!(matches!(
            textures.load_texture(Path::new("other.png")),
            Err(AssetError::Missing { .. })
        ));

        let sheet = textures.load_texture(Path::new("sheet.png")).unwrap();
        let sprite = textures.get_sprite_from_sheet(&sheet, 32, 0, 32, 32);
        assert_eq!((sprite.x, sprite.width, sprite.height), (32, 32, 32));

        let flipped = textures.flip_sprite(&sprite, true, false);
        assert!(flipped.flip_x && !flipped.flip_y);
        assert!(!textures.flip_sprite(&flipped, true, false).flip_x);
    }

    #[test]
    fn test_fixed_clock() {
        let mut clock = FixedClock::new(0.5);
        clock.update();
        clock.update();
        assert_eq!(clock.get_delta_time(), 0.5);
        assert_eq!(clock.elapsed(), 1.0);
    }
}
