//! Input state recorded by the host and read at the start of each tick.

use std::collections::BTreeSet;

use glam::Vec2;

/// Keys the simulation reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    /// `ArrowUp` or `KeyW`.
    Up,
    /// `ArrowDown` or `KeyS`.
    Down,
    /// `ArrowLeft` or `KeyA`.
    Left,
    /// `ArrowRight` or `KeyD`.
    Right,
    /// `Space`.
    Space,
    /// `Digit1` through `Digit9`.
    Digit(u8),
}

impl Key {
    /// Maps a host key code such as `"KeyW"` or `"Digit2"` to a key.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ArrowUp" | "KeyW" => Some(Self::Up),
            "ArrowDown" | "KeyS" => Some(Self::Down),
            "ArrowLeft" | "KeyA" => Some(Self::Left),
            "ArrowRight" | "KeyD" => Some(Self::Right),
            "Space" => Some(Self::Space),
            _ => code
                .strip_prefix("Digit")
                .and_then(|digit| digit.parse::<u8>().ok())
                .filter(|digit| (1..=9).contains(digit))
                .map(Self::Digit),
        }
    }
}

/// Latest keyboard state delivered by the host.
///
/// Held keys are tracked per host code, so `KeyD` and `ArrowRight` can be
/// held and released independently while both steer right.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputState {
    held: BTreeSet<String>,
}

impl InputState {
    /// Records a transition of the host key `code`.
    pub fn key(&mut self, code: &str, pressed: bool) {
        if pressed {
            let _ = self.held.insert(code.to_owned());
        } else {
            let _ = self.held.remove(code);
        }
    }

    /// Reports whether any code mapping to `key` is currently held.
    #[must_use]
    pub fn is_held(&self, key: Key) -> bool {
        self.held
            .iter()
            .any(|code| Key::from_code(code) == Some(key))
    }

    /// Direction requested by the held movement keys, one unit per axis.
    #[must_use]
    pub fn movement_axis(&self) -> Vec2 {
        let mut axis = Vec2::ZERO;
        if self.is_held(Key::Up) {
            axis.y -= 1.0;
        }
        if self.is_held(Key::Down) {
            axis.y += 1.0;
        }
        if self.is_held(Key::Left) {
            axis.x -= 1.0;
        }
        if self.is_held(Key::Right) {
            axis.x += 1.0;
        }
        axis
    }

    /// Forgets every held key.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_codes_map_to_directions_and_digits() {
        assert_eq!(Key::from_code("KeyW"), Some(Key::Up));
        assert_eq!(Key::from_code("ArrowLeft"), Some(Key::Left));
        assert_eq!(Key::from_code("Digit3"), Some(Key::Digit(3)));
        assert_eq!(Key::from_code("Digit0"), None);
        assert_eq!(Key::from_code("KeyQ"), None);
    }

    #[test]
    fn opposing_keys_cancel() {
        let mut input = InputState::default();
        input.key("KeyW", true);
        input.key("ArrowDown", true);
        input.key("KeyD", true);
        assert_eq!(input.movement_axis(), Vec2::new(1.0, 0.0));

        input.key("ArrowDown", false);
        assert_eq!(input.movement_axis(), Vec2::new(1.0, -1.0));
    }

    #[test]
    fn aliased_codes_are_held_independently() {
        let mut input = InputState::default();
        input.key("KeyD", true);
        input.key("ArrowRight", true);
        input.key("ArrowRight", false);
        assert!(input.is_held(Key::Right));
        assert_eq!(input.movement_axis(), Vec2::new(1.0, 0.0));

        input.key("KeyD", false);
        assert!(!input.is_held(Key::Right));
        assert_eq!(input.movement_axis(), Vec2::ZERO);
    }
}
