use std::fmt;

/// Флаги поведения, которые понимает движок.
///
/// Словарь флагов открытый: неизвестные имена сохраняются в [`Behavior`],
/// но движок их игнорирует.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    RunOnly,
    AlwaysRun,
    Register,
    Raise,
    RaiseOrRegister,
    MinimizeWhenUnfocused,
    SwitchBackWhenFocused,
    MoveWindowToActiveWorkspace,
    CenterMouseToFocusedWindow,
    IsolateWorkspace,
    Verbose,
}

impl Flag {
    pub const ALL: [Flag; 11] = [
        Flag::RunOnly,
        Flag::AlwaysRun,
        Flag::Register,
        Flag::Raise,
        Flag::RaiseOrRegister,
        Flag::MinimizeWhenUnfocused,
        Flag::SwitchBackWhenFocused,
        Flag::MoveWindowToActiveWorkspace,
        Flag::CenterMouseToFocusedWindow,
        Flag::IsolateWorkspace,
        Flag::Verbose,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Flag::RunOnly => "run-only",
            Flag::AlwaysRun => "always-run",
            Flag::Register => "register",
            Flag::Raise => "raise",
            Flag::RaiseOrRegister => "raise-or-register",
            Flag::MinimizeWhenUnfocused => "minimize-when-unfocused",
            Flag::SwitchBackWhenFocused => "switch-back-when-focused",
            Flag::MoveWindowToActiveWorkspace => "move-window-to-active-workspace",
            Flag::CenterMouseToFocusedWindow => "center-mouse-to-focused-window",
            Flag::IsolateWorkspace => "isolate-workspace",
            Flag::Verbose => "verbose",
        }
    }

    /// Регистр и `_` вместо `-` не важны.
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized = name.trim().to_lowercase().replace('_', "-");
        Self::ALL.into_iter().find(|flag| flag.name() == normalized)
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Значение флага: `name` или `name(arg)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagValue {
    Enabled,
    Arg(String),
}

impl FlagValue {
    /// `false`, `0` и `off` выключают булевый флаг.
    pub fn is_enabled(&self) -> bool {
        match self {
            FlagValue::Enabled => true,
            FlagValue::Arg(arg) => !matches!(arg.trim().to_lowercase().as_str(), "false" | "0" | "off"),
        }
    }

    pub fn arg(&self) -> Option<&str> {
        match self {
            FlagValue::Enabled => None,
            FlagValue::Arg(arg) => Some(arg),
        }
    }
}

/// Набор флагов биндинга в порядке их появления.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Behavior {
    entries: Vec<(String, FlagValue)>,
}

impl Behavior {
    pub fn new() -> Self {
        Self::default()
    }

    /// Добавить флаг. Известные имена приводятся к каноническому виду,
    /// повторное имя перезаписывает значение.
    pub fn insert(&mut self, name: &str, value: FlagValue) {
        let key = Flag::from_name(name)
            .map(|flag| flag.name().to_string())
            .unwrap_or_else(|| name.trim().to_string());

        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn set(&mut self, flag: Flag) {
        self.insert(flag.name(), FlagValue::Enabled);
    }

    pub fn get(&self, flag: Flag) -> Option<&FlagValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == flag.name())
            .map(|(_, v)| v)
    }

    pub fn enabled(&self, flag: Flag) -> bool {
        self.get(flag).is_some_and(FlagValue::is_enabled)
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FlagValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Имена, которых нет среди [`Flag`].
    pub fn unknown(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .map(|(k, _)| k.as_str())
            .filter(|k| Flag::from_name(k).is_none())
    }

    /// Собственные флаги поверх значений по умолчанию.
    pub fn over(&self, defaults: &Behavior) -> Behavior {
        let mut merged = defaults.clone();
        for (name, value) in &self.entries {
            merged.insert(name, value.clone());
        }
        merged
    }
}

impl fmt::Display for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.entries {
            match value {
                FlagValue::Enabled => write!(f, ":{}", name)?,
                FlagValue::Arg(arg) => write!(f, ":{}({})", name, arg)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_names_are_normalized() {
        assert_eq!(Flag::from_name("RUN_ONLY"), Some(Flag::RunOnly));
        assert_eq!(Flag::from_name("raise-or-register"), Some(Flag::RaiseOrRegister));
        assert_eq!(Flag::from_name("launch"), None);
    }

    #[test]
    fn unknown_flags_are_kept_but_inert() {
        let mut behavior = Behavior::new();
        behavior.insert("launch", FlagValue::Arg("2".into()));
        behavior.insert("always_run", FlagValue::Enabled);

        assert!(behavior.enabled(Flag::AlwaysRun));
        assert_eq!(behavior.unknown().collect::<Vec<_>>(), vec!["launch"]);
        assert_eq!(behavior.to_string(), ":launch(2):always-run");
    }

    #[test]
    fn false_argument_disables_flag() {
        let mut behavior = Behavior::new();
        behavior.insert("verbose", FlagValue::Arg("off".into()));
        assert!(behavior.get(Flag::Verbose).is_some());
        assert!(!behavior.enabled(Flag::Verbose));
    }

    #[test]
    fn own_flags_override_defaults() {
        let mut defaults = Behavior::new();
        defaults.set(Flag::MinimizeWhenUnfocused);
        defaults.set(Flag::Verbose);

        let mut own = Behavior::new();
        own.insert("minimize-when-unfocused", FlagValue::Arg("false".into()));
        own.insert("register", FlagValue::Arg("1".into()));

        let merged = own.over(&defaults);
        assert!(!merged.enabled(Flag::MinimizeWhenUnfocused));
        assert!(merged.enabled(Flag::Verbose));
        assert_eq!(merged.get(Flag::Register).and_then(FlagValue::arg), Some("1"));
    }
}
