//! Top-level game states and their allowed transitions

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameState {
    #[default]
    Menu,
    Playing,
    Paused,
    GameOver,
}

impl GameState {
    pub fn can_transition_to(self, next: GameState) -> bool {
        use GameState::*;
        matches!(
            (self, next),
            (Menu, Playing)
                | (Playing, Paused)
                | (Paused, Playing)
                | (Paused, Menu)
                | (Playing, GameOver)
                | (GameOver, Menu)
        )
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GameState::Menu => "menu",
            GameState::Playing => "playing",
            GameState::Paused => "paused",
            GameState::GameOver => "game over",
        };
        f.write_str(name)
    }
}

/// Owns the current state; only valid transitions are applied
#[derive(Debug, Clone, Default)]
pub struct StateMachine {
    current: GameState,
}

impl StateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> GameState {
        self.current
    }

    pub fn is(&self, state: GameState) -> bool {
        self.current == state
    }

    /// Move to `next` if allowed. Returns whether the state changed.
    pub fn change_state(&mut self, next: GameState) -> bool {
        if !self.current.can_transition_to(next) {
            log::warn!("Ignoring transition {} -> {}", self.current, next);
            return false;
        }
        log::info!("State {} -> {}", self.current, next);
        self.current = next;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_cycle() {
        let mut states = StateMachine::new();
        assert!(states.is(GameState::Menu));
        for next in [
            GameState::Playing,
            GameState::Paused,
            GameState::Playing,
            GameState::GameOver,
            GameState::Menu,
        ] {
            assert!(states.change_state(next));
            assert_eq!(states.current(), next);
        }
    }

    #[test]
    fn test_invalid_transitions_ignored() {
        let mut states = StateMachine::new();
        assert!(!states.change_state(GameState::GameOver));
        assert!(!states.change_state(GameState::Paused));
        assert!(states.is(GameState::Menu));

        states.change_state(GameState::Playing);
        assert!(!states.change_state(GameState::Menu));
        assert!(states.is(GameState::Playing));
    }
}
