//! Platform ports: input, clock and textures
//!
//! The game only sees these traits. [`headless`] provides scripted and fixed-rate
//! implementations for the demo binary and tests.

pub mod headless;

pub use headless::{FixedClock, HeadlessTextures, ScriptedInput};

use std::path::Path;

use crate::error::AssetError;
use crate::renderer::Image;

/// Keys the game reads, independent of physical layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalKey {
    /// Gravity flip in play, "up" in menus
    Jump,
    Left,
    Right,
    Down,
    Return,
    Pause,
}

impl LogicalKey {
    pub const ALL: [LogicalKey; 6] = [
        LogicalKey::Jump,
        LogicalKey::Left,
        LogicalKey::Right,
        LogicalKey::Down,
        LogicalKey::Return,
        LogicalKey::Pause,
    ];

    fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Set of logical keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeySet(u8);

impl KeySet {
    pub const EMPTY: KeySet = KeySet(0);

    pub fn from_keys(keys: &[LogicalKey]) -> Self {
        let mut set = Self::EMPTY;
        for &key in keys {
            set.insert(key);
        }
        set
    }

    /// Keys currently held on `input`
    pub fn held<I: InputSource + ?Sized>(input: &I) -> Self {
        let mut set = Self::EMPTY;
        for key in LogicalKey::ALL {
            if input.is_key_pressed(key) {
                set.insert(key);
            }
        }
        set
    }

    pub fn insert(&mut self, key: LogicalKey) {
        self.0 |= key.bit();
    }

    pub fn contains(&self, key: LogicalKey) -> bool {
        self.0 & key.bit() != 0
    }

    /// Keys in `self` that are not in `previous`
    pub fn newly_pressed(&self, previous: KeySet) -> KeySet {
        KeySet(self.0 & !previous.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

/// One text-entry event per frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextInput {
    #[default]
    None,
    Char(char),
    Backspace,
    Return,
}

pub trait InputSource {
    /// Pump this frame's events. Returns false once the session should end.
    fn poll_events(&mut self) -> bool;
    /// Whether `key` is currently held
    fn is_key_pressed(&self, key: LogicalKey) -> bool;
    /// Take this frame's text event
    fn get_text_input(&mut self) -> TextInput;
    fn quit(&mut self);
}

pub trait Clock {
    /// Seconds elapsed for the current frame
    fn get_delta_time(&self) -> f32;
    /// Advance to the next frame
    fn update(&mut self);
}

pub trait TextureLoader {
    fn load_texture(&mut self, path: &Path) -> Result<Image, AssetError>;
    /// Sub-region of a loaded sheet
    fn get_sprite_from_sheet(&self, sheet: &Image, x: u32, y: u32, width: u32, height: u32)
    -> Image;
    fn flip_sprite(&self, sprite: &Image, flip_x: bool, flip_y: bool) -> Image;
}
