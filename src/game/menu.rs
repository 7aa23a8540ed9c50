//! Vertical text menus

/// What activating a menu item does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    StartGame,
    Options,
    Exit,
    Resume,
    Restart,
    ExitToMenu,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub label: &'static str,
    pub action: MenuAction,
}

#[derive(Debug, Clone)]
pub struct Menu {
    items: Vec<MenuItem>,
    selected: usize,
}

impl Menu {
    pub fn new(items: Vec<MenuItem>) -> Self {
        Self { items, selected: 0 }
    }

    pub fn main() -> Self {
        Self::new(vec![
            MenuItem {
                label: "Start Game",
                action: MenuAction::StartGame,
            },
            MenuItem {
                label: "Options",
                action: MenuAction::Options,
            },
            MenuItem {
                label: "Exit",
                action: MenuAction::Exit,
            },
        ])
    }

    pub fn pause() -> Self {
        Self::new(vec![
            MenuItem {
                label: "Resume",
                action: MenuAction::Resume,
            },
            MenuItem {
                label: "Restart",
                action: MenuAction::Restart,
            },
            MenuItem {
                label: "Exit to Menu",
                action: MenuAction::ExitToMenu,
            },
        ])
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn select_next(&mut self) {
        if !self.items.is_empty() {
            self.selected = (self.selected + 1) % self.items.len();
        }
    }

    pub fn select_previous(&mut self) {
        if !self.items.is_empty() {
            self.selected = (self.selected + self.items.len() - 1) % self.items.len();
        }
    }

    pub fn reset_selection(&mut self) {
        self.selected = 0;
    }

    pub fn selected_action(&self) -> Option<MenuAction> {
        self.items.get(self.selected).map(|item| item.action)
    }
}
