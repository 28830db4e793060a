//! Toolkit-independent input events and the key binding table.

/// Keys the effect cares about; everything else collapses to `Other`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    Space,
    Char(char),
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Quit,
    KeyDown(Key),
    KeyUp(Key),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyPhase {
    Down,
    Up,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Exit,
    InjectHotspot,
    TogglePause,
    ToggleHud,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Binding {
    pub key: Key,
    pub phase: KeyPhase,
    pub action: Action,
}

/// Ordered key/phase to action table. The first matching entry wins.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyBindings {
    entries: Vec<Binding>,
}

impl Default for KeyBindings {
    /// Escape pressed exits, Space released spawns a hotspot.
    fn default() -> Self {
        KeyBindings::empty()
            .bind(Key::Escape, KeyPhase::Down, Action::Exit)
            .bind(Key::Space, KeyPhase::Up, Action::InjectHotspot)
    }
}

impl KeyBindings {
    pub fn empty() -> KeyBindings {
        KeyBindings {
            entries: Vec::new(),
        }
    }

    pub fn bind(mut self, key: Key, phase: KeyPhase, action: Action) -> KeyBindings {
        self.entries.push(Binding { key, phase, action });
        self
    }

    pub fn entries(&self) -> &[Binding] {
        &self.entries
    }

    /// A quit request always maps to [`Action::Exit`].
    pub fn resolve(&self, event: InputEvent) -> Option<Action> {
        let (key, phase) = match event {
            InputEvent::Quit => return Some(Action::Exit),
            InputEvent::KeyDown(k) => (k, KeyPhase::Down),
            InputEvent::KeyUp(k) => (k, KeyPhase::Up),
        };
        self.entries
            .iter()
            .find(|b| b.key == key && b.phase == phase)
            .map(|b| b.action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let bindings = KeyBindings::default();
        assert_eq!(bindings.resolve(InputEvent::Quit), Some(Action::Exit));
        assert_eq!(
            bindings.resolve(InputEvent::KeyDown(Key::Escape)),
            Some(Action::Exit)
        );
        assert_eq!(bindings.resolve(InputEvent::KeyUp(Key::Escape)), None);
        assert_eq!(bindings.resolve(InputEvent::KeyDown(Key::Space)), None);
        assert_eq!(
            bindings.resolve(InputEvent::KeyUp(Key::Space)),
            Some(Action::InjectHotspot)
        );
        assert_eq!(bindings.resolve(InputEvent::KeyDown(Key::Other)), None);
    }

    #[test]
    fn test_first_match_wins() {
        let bindings = KeyBindings::empty()
            .bind(Key::Char('p'), KeyPhase::Down, Action::TogglePause)
            .bind(Key::Char('p'), KeyPhase::Down, Action::Exit);
        assert_eq!(
            bindings.resolve(InputEvent::KeyDown(Key::Char('p'))),
            Some(Action::TogglePause)
        );
        assert_eq!(bindings.entries().len(), 2);
    }

    #[test]
    fn test_empty_table_still_quits() {
        let bindings = KeyBindings::empty();
        assert_eq!(bindings.resolve(InputEvent::Quit), Some(Action::Exit));
        assert_eq!(bindings.resolve(InputEvent::KeyDown(Key::Escape)), None);
    }
}
