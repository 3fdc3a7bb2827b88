//! Named key events delivered to the active scene or battle.

use crate::world::HeldKeys;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Confirm,
    Cancel,
    ToggleInventory,
}

impl Key {
    pub const fn is_movement(self) -> bool {
        matches!(self, Self::Up | Self::Down | Self::Left | Self::Right)
    }

    /// Record a movement key as held or released. Other keys are ignored.
    pub fn apply_to(self, held: &mut HeldKeys, pressed: bool) {
        match self {
            Self::Up => held.up = pressed,
            Self::Down => held.down = pressed,
            Self::Left => held.left = pressed,
            Self::Right => held.right = pressed,
            Self::Confirm | Self::Cancel | Self::ToggleInventory => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_keys_toggle_held_state() {
        let mut held = HeldKeys::default();
        Key::Left.apply_to(&mut held, true);
        Key::Up.apply_to(&mut held, true);
        Key::Confirm.apply_to(&mut held, true);
        assert_eq!(held.intent(), (-1.0, -1.0));
        Key::Left.apply_to(&mut held, false);
        assert_eq!(held.intent(), (0.0, -1.0));
        assert!(!Key::Cancel.is_movement());
    }
}
