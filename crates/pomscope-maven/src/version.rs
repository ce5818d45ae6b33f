//! Version strings as written in dependency declarations.
//!
//! Three shapes are distinguished:
//! - absent: no version at all (empty string)
//! - hard: `[1.0]`, a bracketed range pinning exactly one version
//! - soft: anything else, matched as a prefix of candidate versions
//!
//! Real ranges (`[1.0,2.0)`, `(,1.0]`) are not evaluated. They classify as
//! soft and so only match a candidate that literally starts with them.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSpec {
    Absent,
    Hard(String),
    Soft(String),
}

impl VersionSpec {
    pub fn parse(version: &str) -> Self {
        if version.is_empty() {
            return Self::Absent;
        }
        match version.strip_prefix('[').and_then(|v| v.strip_suffix(']')) {
            Some(exact) if !exact.is_empty() && !exact.contains([',', '[', ']']) => {
                Self::Hard(exact.to_string())
            }
            _ => Self::Soft(version.to_string()),
        }
    }

    pub fn is_hard(&self) -> bool {
        matches!(self, Self::Hard(_))
    }

    /// Whether a concrete `candidate` version satisfies this qualifier.
    ///
    /// Hard specs need byte-for-byte equality. Soft specs need `candidate` to
    /// start with them, so `2` accepts `2.0.1`. An absent version accepts anything.
    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            Self::Absent => true,
            Self::Hard(exact) => candidate == exact,
            Self::Soft(prefix) => candidate.starts_with(prefix.as_str()),
        }
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => Ok(()),
            Self::Hard(exact) => write!(f, "[{exact}]"),
            Self::Soft(prefix) => f.write_str(prefix),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_shapes() {
        assert_eq!(VersionSpec::parse(""), VersionSpec::Absent);
        assert_eq!(VersionSpec::parse("[1.0]"), VersionSpec::Hard("1.0".into()));
        assert_eq!(VersionSpec::parse("1.0"), VersionSpec::Soft("1.0".into()));
    }

    #[test]
    fn ranges_and_malformed_brackets_are_soft() {
        for text in ["[1.0,2.0)", "[1.0,]", "(,1.0]", "[]", "[1.0", "1.0]", "[[1.0]]"] {
            assert!(
                !VersionSpec::parse(text).is_hard(),
                "{text} should not be hard"
            );
        }
    }

    #[test]
    fn hard_matches_exact_only() {
        let spec = VersionSpec::parse("[1.0]");
        assert!(spec.matches("1.0"));
        assert!(!spec.matches("1.0.1"));
        assert!(!spec.matches("1"));
    }

    #[test]
    fn soft_matches_by_prefix() {
        let spec = VersionSpec::parse("2");
        assert!(spec.matches("2"));
        assert!(spec.matches("2.0.1"));
        assert!(!spec.matches("1.2"));
    }

    #[test]
    fn absent_matches_anything() {
        assert!(VersionSpec::Absent.matches("0.0.1"));
        assert!(VersionSpec::Absent.matches(""));
    }

    #[test]
    fn display_restores_brackets() {
        assert_eq!(VersionSpec::parse("[3.1]").to_string(), "[3.1]");
        assert_eq!(VersionSpec::parse("3.1").to_string(), "3.1");
    }
}
