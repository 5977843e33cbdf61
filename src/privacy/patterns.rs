//! Pre-compiled patterns for sensitive content
//!
//! Each [`SensitiveKind`] owns one regex and one sentinel. Patterns are
//! compiled once on first use.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Replacement for probabilistically suppressed tokens
pub const REDACTED: &str = "[REDACTED]";

/// Every sentinel the redactor can emit
pub const SENTINELS: [&str; 7] = [
    REDACTED, "[NAME]", "[EMAIL]", "[NUM]", "[IP]", "[URL]", "[PATH]",
];

/// Category of sensitive content
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensitiveKind {
    Url,
    Email,
    IpAddress,
    Path,
    Name,
    Number,
}

impl SensitiveKind {
    /// Priority order used when two matches start at the same offset with
    /// the same length
    pub const ALL: [SensitiveKind; 6] = [
        SensitiveKind::Url,
        SensitiveKind::Email,
        SensitiveKind::IpAddress,
        SensitiveKind::Path,
        SensitiveKind::Name,
        SensitiveKind::Number,
    ];

    pub fn sentinel(&self) -> &'static str {
        match self {
            SensitiveKind::Url => "[URL]",
            SensitiveKind::Email => "[EMAIL]",
            SensitiveKind::IpAddress => "[IP]",
            SensitiveKind::Path => "[PATH]",
            SensitiveKind::Name => "[NAME]",
            SensitiveKind::Number => "[NUM]",
        }
    }

    pub fn pattern(&self) -> &'static Regex {
        match self {
            SensitiveKind::Url => SensitivePatterns::url(),
            SensitiveKind::Email => SensitivePatterns::email(),
            SensitiveKind::IpAddress => SensitivePatterns::ip_address(),
            SensitiveKind::Path => SensitivePatterns::path(),
            SensitiveKind::Name => SensitivePatterns::person_name(),
            SensitiveKind::Number => SensitivePatterns::number(),
        }
    }
}

impl fmt::Display for SensitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensitiveKind::Url => write!(f, "url"),
            SensitiveKind::Email => write!(f, "email"),
            SensitiveKind::IpAddress => write!(f, "ip_address"),
            SensitiveKind::Path => write!(f, "path"),
            SensitiveKind::Name => write!(f, "name"),
            SensitiveKind::Number => write!(f, "number"),
        }
    }
}

/// Sensitive-content patterns
pub struct SensitivePatterns;

impl SensitivePatterns {
    /// URLs with an explicit scheme: https://host/path?q
    pub fn url() -> &'static Regex {
        static PATTERN: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r#"\b(?:https?|ftp)://[^\s<>"'()\[\]]+"#).expect("Valid URL regex")
        });
        &PATTERN
    }

    /// Email addresses: local@domain.tld
    pub fn email() -> &'static Regex {
        static PATTERN: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}")
                .expect("Valid email regex")
        });
        &PATTERN
    }

    /// Dotted quads: 192.168.0.1
    pub fn ip_address() -> &'static Regex {
        static PATTERN: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"\b(?:\d{1,3}\.){3}\d{1,3}\b").expect("Valid IP regex")
        });
        &PATTERN
    }

    /// File-system paths: /a/b, ~/a/b, ./a/b, C:\a\b
    ///
    /// POSIX paths need at least two segments so prose like "and/or" survives.
    pub fn path() -> &'static Regex {
        static PATTERN: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"\b[A-Za-z]:\\(?:[\w.-]+\\)*[\w.-]+|(?:~|\.{1,2})?(?:/[\w.-]+){2,}")
                .expect("Valid path regex")
        });
        &PATTERN
    }

    /// Two or more consecutive capitalized words: Jane Doe
    pub fn person_name() -> &'static Regex {
        static PATTERN: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"\b[A-Z][a-z]+(?:[ \t]+[A-Z][a-z]+)+\b").expect("Valid name regex")
        });
        &PATTERN
    }

    /// Bare numeric literals and ordinals: 42, 3.14, 3rd
    ///
    /// Digits inside identifiers (utf8, v2) are not numbers.
    pub fn number() -> &'static Regex {
        static PATTERN: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"\b\d+(?:\.\d+)?(?:st|nd|rd|th)?\b").expect("Valid number regex")
        });
        &PATTERN
    }

    /// A token that is a sentinel, possibly wrapped in punctuation: "[EMAIL],"
    pub fn sentinel_token() -> &'static Regex {
        static PATTERN: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"^[^\w\[]*\[(?:REDACTED|NAME|EMAIL|NUM|IP|URL|PATH)\][^\w\]]*$")
                .expect("Valid sentinel regex")
        });
        &PATTERN
    }
}

/// Whether a token is a redaction sentinel
pub fn is_sentinel(token: &str) -> bool {
    SensitivePatterns::sentinel_token().is_match(token)
}
