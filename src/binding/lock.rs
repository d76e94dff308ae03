use std::fmt;

/// Текущее состояние lock-клавиш (индикаторы клавиатуры).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LockState {
    pub num_lock: bool,
    pub caps_lock: bool,
    pub scroll_lock: bool,
}

impl LockState {
    pub fn new(num_lock: bool, caps_lock: bool, scroll_lock: bool) -> Self {
        Self {
            num_lock,
            caps_lock,
            scroll_lock,
        }
    }
}

/// Требования биндинга к lock-клавишам. `None` означает "не важно".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LockRequirements {
    pub num_lock: Option<bool>,
    pub caps_lock: Option<bool>,
    pub scroll_lock: Option<bool>,
}

const NUM_LOCK: &str = "Num_Lock";
const CAPS_LOCK: &str = "Caps_Lock";
const SCROLL_LOCK: &str = "Scroll_Lock";

impl LockRequirements {
    /// Вырезать `<Num_Lock>`, `<Caps_Lock_OFF>` и подобные токены из шортката.
    pub fn extract(shortcut: &str) -> (Self, String) {
        let mut rest = shortcut.to_string();
        let requirements = Self {
            num_lock: take_token(&mut rest, NUM_LOCK),
            caps_lock: take_token(&mut rest, CAPS_LOCK),
            scroll_lock: take_token(&mut rest, SCROLL_LOCK),
        };
        (requirements, rest.trim().to_string())
    }

    /// Все заданные компоненты совпадают с состоянием системы.
    pub fn conforms(&self, state: LockState) -> bool {
        let pairs = [
            (self.num_lock, state.num_lock),
            (self.caps_lock, state.caps_lock),
            (self.scroll_lock, state.scroll_lock),
        ];
        pairs
            .iter()
            .all(|(required, actual)| required.map_or(true, |r| r == *actual))
    }
}

fn take_token(shortcut: &mut String, sym: &str) -> Option<bool> {
    let on = format!("<{}>", sym);
    let off = format!("<{}_OFF>", sym);
    let has_on = shortcut.contains(&on);
    let has_off = shortcut.contains(&off);
    if has_on {
        *shortcut = shortcut.replace(&on, "");
    }
    if has_off {
        *shortcut = shortcut.replace(&off, "");
    }

    match (has_on, has_off) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    }
}

impl fmt::Display for LockRequirements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = [
            (self.num_lock, NUM_LOCK),
            (self.caps_lock, CAPS_LOCK),
            (self.scroll_lock, SCROLL_LOCK),
        ];
        for (required, sym) in parts {
            match required {
                Some(true) => write!(f, "<{}>", sym)?,
                Some(false) => write!(f, "<{}_OFF>", sym)?,
                None => {}
            }
        }
        Ok(())
    }
}
