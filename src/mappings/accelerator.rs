use super::KeyNameToEvdevCode;
use crate::events::{KeyCode, Modifiers};
use std::fmt;

/// Аккорд: набор модификаторов и одна клавиша.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Chord {
    pub modifiers: Modifiers,
    pub key: KeyCode,
}

impl Chord {
    pub fn new(modifiers: Modifiers, key: KeyCode) -> Self {
        Self { modifiers, key }
    }

    /// Разбор GTK акселератора: `<Super><Shift>f`, `<Primary>KP_1`, `F12`.
    ///
    /// Модификаторы в угловых скобках, регистр не важен, последним идёт имя клавиши.
    pub fn parse(accelerator: &str) -> Result<Self, String> {
        let mut rest = accelerator.trim();
        let mut modifiers = Modifiers::new();

        while let Some(tail) = rest.strip_prefix('<') {
            let (name, after) = tail
                .split_once('>')
                .ok_or_else(|| format!("Незакрытый модификатор в '{}'", accelerator))?;
            modifiers = apply_modifier(modifiers, name)
                .ok_or_else(|| format!("Unknown modifier: {}", name))?;
            rest = after.trim_start();
        }

        if rest.is_empty() {
            return Err(format!("Нет клавиши в '{}'", accelerator));
        }

        let key = KeyNameToEvdevCode::translate(rest)?;
        Ok(Self { modifiers, key })
    }
}

fn apply_modifier(modifiers: Modifiers, name: &str) -> Option<Modifiers> {
    let modifiers = match name.to_lowercase().as_str() {
        "shift" => modifiers.with_shift(true),
        "control" | "ctrl" | "primary" => modifiers.with_ctrl(true),
        "alt" | "mod1" => modifiers.with_alt(true),
        "super" | "mod4" | "meta" | "hyper" => modifiers.with_super(true),
        _ => return None,
    };
    Some(modifiers)
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.is_empty() {
            write!(f, "{}", self.key)
        } else {
            write!(f, "{}+{}", self.modifiers, self.key)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evdev::KeyCode as Ev;

    #[test]
    fn parses_modifiers_and_key() {
        let chord = Chord::parse("<Super><Shift>f").unwrap();
        assert_eq!(
            chord,
            Chord::new(
                Modifiers::new().with_super(true).with_shift(true),
                KeyCode::from(Ev::KEY_F)
            )
        );
        assert_eq!(chord.to_string(), "shift+super+KEY_F");
    }

    #[test]
    fn modifier_aliases_are_equivalent() {
        assert_eq!(Chord::parse("<Primary>e"), Chord::parse("<Control>E"));
        assert_eq!(Chord::parse("<ctrl>e"), Chord::parse("<Control>e"));
        assert_eq!(Chord::parse("<Mod4>KP_1"), Chord::parse("<Super>KP_End"));
        assert_eq!(Chord::parse("<Mod1>Tab"), Chord::parse("<Alt>Tab"));
    }

    #[test]
    fn bare_key_has_no_modifiers() {
        let chord = Chord::parse("F12").unwrap();
        assert!(chord.modifiers.is_empty());
        assert_eq!(chord.key, KeyCode::from(Ev::KEY_F12));
    }

    #[test]
    fn rejects_bad_accelerators() {
        assert!(Chord::parse("<Super>").is_err());
        assert!(Chord::parse("<Super").is_err());
        assert!(Chord::parse("<Hyperdrive>a").is_err());
        assert!(Chord::parse("<Super>nosuchkey").is_err());
    }
}
