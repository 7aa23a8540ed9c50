//! Name capture on the game over screen

use crate::platform::TextInput;

#[derive(Debug, Clone)]
pub struct NameInput {
    max_length: usize,
    name: String,
    active: bool,
}

impl NameInput {
    pub fn new(max_length: usize) -> Self {
        Self {
            max_length,
            name: String::new(),
            active: false,
        }
    }

    pub fn start(&mut self) {
        self.active = true;
        self.name.clear();
    }

    pub fn stop(&mut self) {
        self.active = false;
        self.name.clear();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Feed one text event. Returns true when a non-blank name was confirmed.
    pub fn process(&mut self, input: TextInput) -> bool {
        if !self.active {
            return false;
        }
        match input {
            TextInput::Return => !self.name.trim().is_empty(),
            TextInput::Backspace => {
                self.name.pop();
                false
            }
            TextInput::Char(c) => {
                if self.name.chars().count() < self.max_length && !c.is_control() {
                    self.name.push(c);
                }
                false
            }
            TextInput::None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(input: &mut NameInput, text: &str) {
        for c in text.chars() {
            input.process(TextInput::Char(c));
        }
    }

    #[test]
    fn test_inactive_ignores_input() {
        let mut input = NameInput::new(20);
        assert!(!input.process(TextInput::Char('a')));
        assert_eq!(input.name(), "");
    }

    #[test]
    fn test_max_length_and_backspace() {
        let mut input = NameInput::new(3);
        input.start();
        typed(&mut input, "ABCD");
        assert_eq!(input.name(), "ABC");
        input.process(TextInput::Backspace);
        assert_eq!(input.name(), "AB");
        // Control characters are not printable
        input.process(TextInput::Char('\t'));
        assert_eq!(input.name(), "AB");
    }

    #[test]
    fn test_return_needs_non_blank_name() {
        let mut input = NameInput::new(20);
        input.start();
        assert!(!input.process(TextInput::Return));
        typed(&mut input, "  ");
        assert!(!input.process(TextInput::Return));
        typed(&mut input, "Jo");
        assert!(input.process(TextInput::Return));
        assert_eq!(input.name(), "  Jo");
    }
}
