//! Разбор строк вида `shortcut[:flag[(arg)]]*, command[, class[, title]]`.

pub mod behavior;
pub mod fields;
pub mod loader;
pub mod lock;
pub mod matcher;

pub use behavior::{Behavior, Flag, FlagValue};
pub use loader::load_bindings;
pub use lock::{LockRequirements, LockState};
pub use matcher::Matcher;

use crate::error::ParseError;
use once_cell::sync::Lazy;
use regex::Regex;
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

static FLAG_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?P<name>[^()\s]+)\s*(?:\((?P<arg>[^()]*)\))?\s*$")
        .expect("flag token regex is valid")
});

/// Один шорткат: критерии поиска окна, флаги поведения и клавиши.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub command: String,
    pub class_matcher: Matcher,
    pub title_matcher: Matcher,
    pub behavior: Behavior,
    pub locks: LockRequirements,
    /// Аккорд без lock-токенов, например `<Super>f`.
    pub shortcut: String,
    /// Клавиши-слои после основного аккорда.
    pub layers: SmallVec<[String; 2]>,
}

impl Binding {
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        if line.trim().is_empty() {
            return Err(ParseError::MissingShortcut);
        }

        let fields = fields::split_fields(line);
        let field = |i: usize| fields.get(i).map(String::as_str).unwrap_or("");

        let mut head = field(0).split(':');
        let shortcut_layer = head.next().unwrap_or("");

        let mut behavior = Behavior::new();
        for token in head {
            match FLAG_TOKEN.captures(token) {
                Some(caps) => {
                    let value = caps
                        .name("arg")
                        .map(|arg| FlagValue::Arg(arg.as_str().to_string()))
                        .unwrap_or(FlagValue::Enabled);
                    behavior.insert(&caps["name"], value);
                }
                None => debug!("Пропускаем некорректный флаг: '{}'", token),
            }
        }

        // Искать окно не по чему, остаётся только запуск
        if fields.len() <= 2 {
            behavior.set(Flag::RunOnly);
        }

        let mut keys = shortcut_layer.split_whitespace();
        let shortcut_bare = keys.next().unwrap_or("");
        let layers = keys.map(str::to_string).collect();

        let (locks, shortcut) = LockRequirements::extract(shortcut_bare);
        if shortcut.is_empty() {
            return Err(ParseError::MissingShortcut);
        }

        Ok(Self {
            command: field(1).to_string(),
            class_matcher: Matcher::parse(field(2))?,
            title_matcher: Matcher::parse(field(3))?,
            behavior,
            locks,
            shortcut,
            layers,
        })
    }

    /// Основной аккорд и слои по порядку.
    pub fn key_sequence(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.shortcut.as_str()).chain(self.layers.iter().map(String::as_str))
    }
}

impl FromStr for Binding {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Каноническая строка, которая разбирается обратно в равный биндинг.
impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut head = format!("{}{}", self.locks, self.shortcut);
        for layer in &self.layers {
            head.push(' ');
            head.push_str(layer);
        }
        head.push_str(&self.behavior.to_string());

        write!(f, "{}, {}", fields::quote_field(&head), fields::quote_field(&self.command))?;

        let class = self.class_matcher.source();
        let title = self.title_matcher.source();
        if !title.is_empty() {
            write!(f, ", {}, {}", fields::quote_field(&class), fields::quote_field(&title))
        } else if !class.is_empty() || !self.behavior.enabled(Flag::RunOnly) {
            write!(f, ", {}", fields::quote_field(&class))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_token_and_two_fields() {
        let binding = Binding::parse("<Num_Lock>a,foo").unwrap();
        assert_eq!(binding.shortcut, "a");
        assert_eq!(binding.locks.num_lock, Some(true));
        assert_eq!(binding.locks.caps_lock, None);
        assert_eq!(binding.command, "foo");
        assert!(binding.behavior.enabled(Flag::RunOnly));
        assert!(binding.class_matcher.is_empty());
        assert!(binding.title_matcher.is_empty());
    }

    #[test]
    fn pattern_class_quoted_title_and_unknown_flag() {
        let binding = Binding::parse(r#"a:launch(2), foo, /^bar$/, "baz, qux""#).unwrap();
        assert!(matches!(&binding.class_matcher, Matcher::Pattern(r) if r.as_str() == "^bar$"));
        assert_eq!(binding.title_matcher, Matcher::Literal("baz, qux".into()));
        let launch = binding.behavior.iter().find(|(name, _)| *name == "launch");
        assert_eq!(launch.map(|(_, v)| v.clone()), Some(FlagValue::Arg("2".into())));
        assert!(!binding.behavior.enabled(Flag::RunOnly));
    }

    #[test]
    fn layers_follow_the_primary_chord() {
        let binding = Binding::parse("<Super>g a b,firefox,Firefox").unwrap();
        assert_eq!(binding.shortcut, "<Super>g");
        assert_eq!(binding.layers.as_slice(), ["a", "b"]);
        assert_eq!(binding.key_sequence().collect::<Vec<_>>(), vec!["<Super>g", "a", "b"]);
    }

    #[test]
    fn flags_with_and_without_arguments() {
        let binding =
            Binding::parse("<Super>1:register(1):always-run:bad(token, x").unwrap();
        assert_eq!(binding.behavior.get(Flag::Register), Some(&FlagValue::Arg("1".into())));
        assert!(binding.behavior.enabled(Flag::AlwaysRun));
        assert!(binding.behavior.iter().all(|(name, _)| !name.starts_with("bad")));
    }

    #[test]
    fn missing_shortcut_is_an_error() {
        assert_eq!(Binding::parse(""), Err(ParseError::MissingShortcut));
        assert_eq!(Binding::parse("   "), Err(ParseError::MissingShortcut));
        assert_eq!(Binding::parse(", firefox"), Err(ParseError::MissingShortcut));
        assert_eq!(Binding::parse("<Caps_Lock>, firefox"), Err(ParseError::MissingShortcut));
    }

    #[test]
    fn invalid_regex_is_an_error() {
        let err = Binding::parse("<Super>x, foo, /[/").unwrap_err();
        assert!(matches!(err, ParseError::InvalidPattern { .. }));
    }

    #[test]
    fn extra_fields_are_ignored() {
        let binding = Binding::parse("a, cmd, cls, ttl, extra, more").unwrap();
        assert_eq!(binding.class_matcher, Matcher::Literal("cls".into()));
        assert_eq!(binding.title_matcher, Matcher::Literal("ttl".into()));
    }

    #[test]
    fn display_round_trips() {
        let lines = [
            r#"<Num_Lock><Super>e x:always-run:launch(2), "gedit, new", /^Gedit$/, "say \"hi\"""#,
            "<Super>t, gnome-terminal",
            "<Super>f, firefox,",
            "<Super>c, code, , Visual Studio Code",
        ];
        for line in lines {
            let binding = Binding::parse(line).unwrap();
            let reparsed = Binding::parse(&binding.to_string()).unwrap();
            assert_eq!(binding, reparsed, "line: {}", line);
        }
    }
}
