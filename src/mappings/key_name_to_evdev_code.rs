use crate::events::KeyCode;
use evdev::KeyCode as Ev;

/// Преобразование имён клавиш GTK (keysym) в evdev коды
/// Регистр не важен: `a` и `A` это одна и та же физическая клавиша
pub struct KeyNameToEvdevCode;

impl KeyNameToEvdevCode {
    /// Получить evdev код клавиши по её имени
    pub fn translate(key_name: &str) -> Result<KeyCode, String> {
        let normalized = key_name.to_lowercase();

        if let Some(code) = Self::function_key(&normalized) {
            return Ok(KeyCode::from(code));
        }

        let key = match normalized.as_str() {
            // Буквенные клавиши
            "a" => Ev::KEY_A,
            "b" => Ev::KEY_B,
            "c" => Ev::KEY_C,
            "d" => Ev::KEY_D,
            "e" => Ev::KEY_E,
            "f" => Ev::KEY_F,
            "g" => Ev::KEY_G,
            "h" => Ev::KEY_H,
            "i" => Ev::KEY_I,
            "j" => Ev::KEY_J,
            "k" => Ev::KEY_K,
            "l" => Ev::KEY_L,
            "m" => Ev::KEY_M,
            "n" => Ev::KEY_N,
            "o" => Ev::KEY_O,
            "p" => Ev::KEY_P,
            "q" => Ev::KEY_Q,
            "r" => Ev::KEY_R,
            "s" => Ev::KEY_S,
            "t" => Ev::KEY_T,
            "u" => Ev::KEY_U,
            "v" => Ev::KEY_V,
            "w" => Ev::KEY_W,
            "x" => Ev::KEY_X,
            "y" => Ev::KEY_Y,
            "z" => Ev::KEY_Z,

            // Цифровые клавиши (верхний ряд)
            "1" => Ev::KEY_1,
            "2" => Ev::KEY_2,
            "3" => Ev::KEY_3,
            "4" => Ev::KEY_4,
            "5" => Ev::KEY_5,
            "6" => Ev::KEY_6,
            "7" => Ev::KEY_7,
            "8" => Ev::KEY_8,
            "9" => Ev::KEY_9,
            "0" => Ev::KEY_0,

            // Специальные клавиши
            "space" => Ev::KEY_SPACE,
            "return" | "enter" => Ev::KEY_ENTER,
            "escape" => Ev::KEY_ESC,
            "backspace" => Ev::KEY_BACKSPACE,
            "tab" | "iso_left_tab" => Ev::KEY_TAB,
            "menu" => Ev::KEY_COMPOSE,

            // Знаки пунктуации
            "minus" => Ev::KEY_MINUS,
            "equal" => Ev::KEY_EQUAL,
            "bracketleft" => Ev::KEY_LEFTBRACE,
            "bracketright" => Ev::KEY_RIGHTBRACE,
            "backslash" => Ev::KEY_BACKSLASH,
            "semicolon" => Ev::KEY_SEMICOLON,
            "apostrophe" => Ev::KEY_APOSTROPHE,
            "grave" => Ev::KEY_GRAVE,
            "comma" => Ev::KEY_COMMA,
            "period" => Ev::KEY_DOT,
            "slash" => Ev::KEY_SLASH,

            // Навигация/редакция
            "insert" => Ev::KEY_INSERT,
            "delete" => Ev::KEY_DELETE,
            "home" => Ev::KEY_HOME,
            "end" => Ev::KEY_END,
            "page_up" | "prior" => Ev::KEY_PAGEUP,
            "page_down" | "next" => Ev::KEY_PAGEDOWN,

            // Стрелки
            "up" => Ev::KEY_UP,
            "down" => Ev::KEY_DOWN,
            "left" => Ev::KEY_LEFT,
            "right" => Ev::KEY_RIGHT,

            // Системные
            "print" => Ev::KEY_SYSRQ,
            "scroll_lock" => Ev::KEY_SCROLLLOCK,
            "pause" => Ev::KEY_PAUSE,

            // Numpad
            "kp_0" | "kp_insert" => Ev::KEY_KP0,
            "kp_1" | "kp_end" => Ev::KEY_KP1,
            "kp_2" | "kp_down" => Ev::KEY_KP2,
            "kp_3" | "kp_next" | "kp_page_down" => Ev::KEY_KP3,
            "kp_4" | "kp_left" => Ev::KEY_KP4,
            "kp_5" | "kp_begin" => Ev::KEY_KP5,
            "kp_6" | "kp_right" => Ev::KEY_KP6,
            "kp_7" | "kp_home" => Ev::KEY_KP7,
            "kp_8" | "kp_up" => Ev::KEY_KP8,
            "kp_9" | "kp_prior" | "kp_page_up" => Ev::KEY_KP9,
            "kp_decimal" | "kp_delete" => Ev::KEY_KPDOT,
            "kp_divide" => Ev::KEY_KPSLASH,
            "kp_multiply" => Ev::KEY_KPASTERISK,
            "kp_add" => Ev::KEY_KPPLUS,
            "kp_subtract" => Ev::KEY_KPMINUS,
            "kp_enter" => Ev::KEY_KPENTER,

            // Мультимедиа
            "xf86audioplay" => Ev::KEY_PLAYPAUSE,
            "xf86audiostop" => Ev::KEY_STOPCD,
            "xf86audionext" => Ev::KEY_NEXTSONG,
            "xf86audioprev" => Ev::KEY_PREVIOUSSONG,
            "xf86audiomute" => Ev::KEY_MUTE,
            "xf86audioraisevolume" => Ev::KEY_VOLUMEUP,
            "xf86audiolowervolume" => Ev::KEY_VOLUMEDOWN,

            _ => return Err(format!("Unknown key: {}", key_name)),
        };

        Ok(KeyCode::from(key))
    }

    /// F1..F24
    fn function_key(normalized: &str) -> Option<Ev> {
        const KEYS: [Ev; 24] = [
            Ev::KEY_F1, Ev::KEY_F2, Ev::KEY_F3, Ev::KEY_F4, Ev::KEY_F5, Ev::KEY_F6,
            Ev::KEY_F7, Ev::KEY_F8, Ev::KEY_F9, Ev::KEY_F10, Ev::KEY_F11, Ev::KEY_F12,
            Ev::KEY_F13, Ev::KEY_F14, Ev::KEY_F15, Ev::KEY_F16, Ev::KEY_F17, Ev::KEY_F18,
            Ev::KEY_F19, Ev::KEY_F20, Ev::KEY_F21, Ev::KEY_F22, Ev::KEY_F23, Ev::KEY_F24,
        ];
        let n: usize = normalized.strip_prefix('f')?.parse().ok()?;
        KEYS.get(n.checked_sub(1)?).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(name: &str) -> u16 {
        KeyNameToEvdevCode::translate(name).unwrap().0
    }

    #[test]
    fn test_basic_key_mapping() {
        assert_eq!(code("a"), 30);
        assert_eq!(code("space"), 57);
        assert_eq!(code("Return"), 28);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(code("A"), 30);
        assert_eq!(code("SPACE"), 57);
    }

    #[test]
    fn test_gtk_aliases() {
        assert_eq!(code("Page_Up"), code("Prior"));
        assert_eq!(code("Page_Down"), code("Next"));
        assert_eq!(code("KP_1"), code("KP_End"));
        assert_eq!(code("period"), 52);
        assert_eq!(code("bracketleft"), 26);
    }

    #[test]
    fn test_function_keys() {
        assert_eq!(code("F1"), 59);
        assert_eq!(code("f12"), 88);
        assert_eq!(code("F13"), evdev::KeyCode::KEY_F13.code());
        assert_eq!(code("F24"), evdev::KeyCode::KEY_F24.code());
        assert!(KeyNameToEvdevCode::translate("F0").is_err());
        assert!(KeyNameToEvdevCode::translate("F25").is_err());
    }

    #[test]
    fn test_invalid_key() {
        assert!(KeyNameToEvdevCode::translate("invalid_key").is_err());
        assert!(KeyNameToEvdevCode::translate("").is_err());
    }
}
