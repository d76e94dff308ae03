use crate::events::Modifiers;
use evdev::KeyCode;

/// Какие модификаторы сейчас зажаты. Левые и правые не различаются.
#[derive(Debug, Default)]
pub struct ModifierState {
    modifiers: Modifiers,
}

impl ModifierState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to_modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Обновить состояние. Возвращает `true`, если клавиша была модификатором.
    pub fn update_key(&mut self, key: KeyCode, pressed: bool) -> bool {
        let m = self.modifiers;
        self.modifiers = match key {
            KeyCode::KEY_LEFTCTRL | KeyCode::KEY_RIGHTCTRL => m.with_ctrl(pressed),
            KeyCode::KEY_LEFTALT | KeyCode::KEY_RIGHTALT => m.with_alt(pressed),
            KeyCode::KEY_LEFTSHIFT | KeyCode::KEY_RIGHTSHIFT => m.with_shift(pressed),
            KeyCode::KEY_LEFTMETA | KeyCode::KEY_RIGHTMETA => m.with_super(pressed),
            _ => return false,
        };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_press_and_release() {
        let mut state = ModifierState::new();
        assert!(state.update_key(KeyCode::KEY_RIGHTMETA, true));
        assert!(state.update_key(KeyCode::KEY_LEFTSHIFT, true));
        assert!(!state.update_key(KeyCode::KEY_F, true));
        assert_eq!(state.to_modifiers(), Modifiers::new().with_super(true).with_shift(true));

        state.update_key(KeyCode::KEY_LEFTSHIFT, false);
        assert_eq!(state.to_modifiers(), Modifiers::new().with_super(true));
    }
}
