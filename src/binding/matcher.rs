use crate::error::ParseError;
use regex::Regex;
use std::fmt;

/// Критерий поиска по классу или заголовку окна.
///
/// Строка вида `/.../` превращается в регулярное выражение (поиск в любом
/// месте), всё остальное сравнивается регистрозависимым вхождением подстроки.
#[derive(Debug, Clone)]
pub enum Matcher {
    Literal(String),
    Pattern(Regex),
}

impl Matcher {
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        if raw.len() >= 2 && raw.starts_with('/') && raw.ends_with('/') {
            let pattern = &raw[1..raw.len() - 1];
            Regex::new(pattern)
                .map(Matcher::Pattern)
                .map_err(|e| ParseError::InvalidPattern {
                    pattern: pattern.to_string(),
                    reason: e.to_string(),
                })
        } else {
            Ok(Matcher::Literal(raw.to_string()))
        }
    }

    /// Пустой литерал: критерий не задан.
    pub fn is_empty(&self) -> bool {
        matches!(self, Matcher::Literal(s) if s.is_empty())
    }

    pub fn matches(&self, haystack: &str) -> bool {
        match self {
            Matcher::Literal(needle) => !needle.is_empty() && haystack.contains(needle.as_str()),
            Matcher::Pattern(regex) => regex.is_match(haystack),
        }
    }

    /// Исходная запись критерия в формате файла шорткатов.
    pub fn source(&self) -> String {
        match self {
            Matcher::Literal(s) => s.clone(),
            Matcher::Pattern(regex) => format!("/{}/", regex.as_str()),
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Matcher::Literal(String::new())
    }
}

impl PartialEq for Matcher {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Matcher::Literal(a), Matcher::Literal(b)) => a == b,
            (Matcher::Pattern(a), Matcher::Pattern(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

impl Eq for Matcher {}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Literal(s) => write!(f, "\"{}\"", s),
            Matcher::Pattern(regex) => write!(f, "/{}/", regex.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slashes_make_a_pattern() {
        let matcher = Matcher::parse("/^bar$/").unwrap();
        assert!(matches!(&matcher, Matcher::Pattern(r) if r.as_str() == "^bar$"));
        assert!(matcher.matches("bar"));
        assert!(!matcher.matches("foobar"));
    }

    #[test]
    fn single_slash_is_literal() {
        assert_eq!(Matcher::parse("/").unwrap(), Matcher::Literal("/".into()));
        assert_eq!(Matcher::parse("/usr").unwrap(), Matcher::Literal("/usr".into()));
    }

    #[test]
    fn literal_is_case_sensitive_containment() {
        let matcher = Matcher::parse("bar").unwrap();
        assert!(matcher.matches("foobarbaz"));
        assert!(!matcher.matches("Bar"));
    }

    #[test]
    fn empty_literal_matches_nothing() {
        let matcher = Matcher::parse("").unwrap();
        assert!(matcher.is_empty());
        assert!(!matcher.matches(""));
        assert!(!matcher.matches("anything"));
    }

    #[test]
    fn empty_pattern_is_not_empty_matcher() {
        let matcher = Matcher::parse("//").unwrap();
        assert!(!matcher.is_empty());
        assert!(matcher.matches("anything"));
    }

    #[test]
    fn broken_regex_is_reported() {
        let err = Matcher::parse("/(unclosed/").unwrap_err();
        assert!(matches!(err, ParseError::InvalidPattern { ref pattern, .. } if pattern == "(unclosed"));
    }
}
