/// Keyboard input the dropdown reacts to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DropdownKey {
    Down,
    Up,
    Enter,
    Escape,
}

/// What the caller should do after a key event.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DropdownAction {
    None,
    /// Commit the item at this index.
    Select(usize),
    Closed,
}

/// Keyboard navigation over the result (or recent-search) list.
///
/// The active row starts unset; arrows wrap around both ends. Enter with no
/// active row does nothing, so a stray keypress never commits a selection.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Dropdown {
    open: bool,
    active: Option<usize>,
}

impl Dropdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Called on focus and on every input edit.
    pub fn open(&mut self) {
        self.open = true;
        self.active = None;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.active = None;
    }

    pub fn hover(&mut self, index: usize) {
        if self.open {
            self.active = Some(index);
        }
    }

    pub fn on_key(&mut self, key: DropdownKey, item_count: usize) -> DropdownAction {
        if !self.open || item_count == 0 {
            if key == DropdownKey::Escape {
                self.close();
                return DropdownAction::Closed;
            }
            return DropdownAction::None;
        }
        match key {
            DropdownKey::Down => {
                self.active = Some(match self.active {
                    Some(i) if i + 1 < item_count => i + 1,
                    _ => 0,
                });
                DropdownAction::None
            }
            DropdownKey::Up => {
                self.active = Some(match self.active {
                    Some(i) if i > 0 => i - 1,
                    _ => item_count - 1,
                });
                DropdownAction::None
            }
            DropdownKey::Enter => match self.active {
                Some(i) if i < item_count => {
                    self.close();
                    DropdownAction::Select(i)
                }
                _ => DropdownAction::None,
            },
            DropdownKey::Escape => {
                self.close();
                DropdownAction::Closed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Dropdown, DropdownAction, DropdownKey};

    #[test]
    fn arrows_wrap_around_both_ends() {
        let mut d = Dropdown::new();
        d.open();
        assert_eq!(d.on_key(DropdownKey::Down, 3), DropdownAction::None);
        assert_eq!(d.active(), Some(0));
        d.on_key(DropdownKey::Down, 3);
        d.on_key(DropdownKey::Down, 3);
        assert_eq!(d.active(), Some(2));
        d.on_key(DropdownKey::Down, 3);
        assert_eq!(d.active(), Some(0));
        d.on_key(DropdownKey::Up, 3);
        assert_eq!(d.active(), Some(2));
    }

    #[test]
    fn enter_only_commits_an_active_row() {
        let mut d = Dropdown::new();
        d.open();
        assert_eq!(d.on_key(DropdownKey::Enter, 3), DropdownAction::None);
        d.on_key(DropdownKey::Down, 3);
        assert_eq!(d.on_key(DropdownKey::Enter, 3), DropdownAction::Select(0));
        assert!(!d.is_open());
    }

    #[test]
    fn escape_closes_from_any_state() {
        let mut d = Dropdown::new();
        d.open();
        d.hover(1);
        assert_eq!(d.on_key(DropdownKey::Escape, 3), DropdownAction::Closed);
        assert_eq!(d.active(), None);
        // Escape with nothing open still reports closed, for input clearing.
        assert_eq!(d.on_key(DropdownKey::Escape, 0), DropdownAction::Closed);
    }
}
