//! Pattern-based and probabilistic redaction.
//!
//! Text redaction matches every enabled pattern against the *original* text,
//! resolves overlaps (earliest start wins, then the longest span, then
//! [`SensitiveKind::ALL`] priority) and rebuilds the string in one pass. No
//! substitution ever sees another substitution's output, so the order the
//! patterns are listed in cannot change the result. A match that ends inside
//! a word is widened to the end of that word, so no alphanumeric tail is left
//! glued to a sentinel.
//!
//! Token redaction is a Bernoulli trial per token on top of the deterministic
//! pattern check. The random source is supplied by the caller: transformed
//! output is non-deterministic unless the caller fixes a seed, and that is
//! accepted behavior.
//!
//! Tokens are checked one at a time, so the two-word name pattern never fires
//! on the token path: a lone "Jane" is suppressed only by the random draw.
//! The conversation `content` still goes through [`Redactor::redact`], where
//! "Jane Doe" is caught.

use rand::Rng;
use std::collections::BTreeMap;
use tracing::debug;

use crate::config::PrivacyConfig;
use crate::privacy::patterns::{SensitiveKind, REDACTED};

/// Result of redacting a text, with per-kind substitution counts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redaction {
    pub text: String,
    pub counts: BTreeMap<SensitiveKind, usize>,
}

impl Redaction {
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

/// Redacts sensitive content according to a privacy config
#[derive(Debug, Clone)]
pub struct Redactor {
    kinds: Vec<SensitiveKind>,
    redaction_level: f64,
}

impl Redactor {
    /// Build a redactor for the given config.
    ///
    /// IP addresses, URLs and paths are always redacted; names, numbers and
    /// emails follow their config flags.
    pub fn new(config: &PrivacyConfig) -> Self {
        let kinds = SensitiveKind::ALL
            .into_iter()
            .filter(|kind| match kind {
                SensitiveKind::Name => config.redact_names,
                SensitiveKind::Number => config.redact_numbers,
                SensitiveKind::Email => config.redact_emails,
                SensitiveKind::IpAddress | SensitiveKind::Url | SensitiveKind::Path => true,
            })
            .collect();

        Self {
            kinds,
            redaction_level: config.redaction_level,
        }
    }

    /// Kinds this redactor substitutes, in priority order
    pub fn kinds(&self) -> &[SensitiveKind] {
        &self.kinds
    }

    /// Replace every sensitive span in `text` with its sentinel
    pub fn redact(&self, text: &str) -> String {
        self.redact_with_stats(text).text
    }

    /// Like [`Redactor::redact`], also reporting what was substituted
    pub fn redact_with_stats(&self, text: &str) -> Redaction {
        let mut spans: Vec<(usize, usize, SensitiveKind)> = self
            .kinds
            .iter()
            .flat_map(|kind| {
                kind.pattern()
                    .find_iter(text)
                    .map(move |m| (m.start(), extend_to_word_end(text, m.end()), *kind))
            })
            .collect();

        // Stable sort: equal spans keep priority order
        spans.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));

        let mut redacted = String::with_capacity(text.len());
        let mut counts = BTreeMap::new();
        let mut cursor = 0;

        for (start, end, kind) in spans {
            if start < cursor {
                continue;
            }
            redacted.push_str(&text[cursor..start]);
            redacted.push_str(kind.sentinel());
            *counts.entry(kind).or_insert(0) += 1;
            cursor = end;
        }
        redacted.push_str(&text[cursor..]);

        let result = Redaction {
            text: redacted,
            counts,
        };
        if result.total() > 0 {
            debug!("Redacted {} sensitive spans: {:?}", result.total(), result.counts);
        }
        result
    }

    /// Whether a token contains any enabled sensitive pattern
    pub fn is_sensitive(&self, token: &str) -> bool {
        self.kinds.iter().any(|kind| kind.pattern().is_match(token))
    }

    /// Decide whether to suppress one token.
    ///
    /// Exactly one draw is consumed per call whatever the outcome, so for a
    /// fixed seed the redacted set only grows as `redaction_level` rises.
    pub fn should_redact_token<R: Rng + ?Sized>(&self, token: &str, rng: &mut R) -> bool {
        let draw: f64 = rng.gen();
        self.is_sensitive(token) || draw < self.redaction_level
    }

    /// Apply [`Redactor::should_redact_token`] to a token sequence
    pub fn redact_tokens<R: Rng + ?Sized>(&self, tokens: &[String], rng: &mut R) -> Vec<String> {
        tokens
            .iter()
            .map(|token| {
                if self.should_redact_token(token, rng) {
                    REDACTED.to_string()
                } else {
                    token.clone()
                }
            })
            .collect()
    }
}

/// Push a span end that stops inside a word to the end of that word.
///
/// A match cut off mid-word ("a@b.io7") would otherwise leave the tail next
/// to a sentinel, where a second pass could match it.
fn extend_to_word_end(text: &str, end: usize) -> usize {
    let ends_in_word = text[..end]
        .chars()
        .next_back()
        .map_or(false, is_word_char);
    if !ends_in_word {
        return end;
    }

    text[end..]
        .char_indices()
        .find(|(_, c)| !is_word_char(*c))
        .map_or(text.len(), |(offset, _)| end + offset)
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn redactor_with(level: f64) -> Redactor {
        Redactor::new(&PrivacyConfig {
            redaction_level: level,
            ..Default::default()
        })
    }

    #[test]
    fn test_email_and_number() {
        let redactor = redactor_with(1.0);
        let out = redactor.redact("Contact jane@example.com about bug #42");
        assert_eq!(out, "Contact [EMAIL] about bug #[NUM]");
    }

    #[test]
    fn test_email_with_digits_is_not_split() {
        let redactor = redactor_with(0.5);
        let result = redactor.redact_with_stats("mail 42user7@host9.io today");

        assert_eq!(result.text, "mail [EMAIL] today");
        assert_eq!(result.counts.get(&SensitiveKind::Email), Some(&1));
        assert_eq!(result.counts.get(&SensitiveKind::Number), None);
    }

    #[test]
    fn test_ip_wins_over_number() {
        let redactor = redactor_with(0.5);
        assert_eq!(redactor.redact("ping 10.0.0.12 now"), "ping [IP] now");
    }

    #[test]
    fn test_url_swallows_embedded_path_and_digits() {
        let redactor = redactor_with(0.5);
        assert_eq!(
            redactor.redact("see https://example.com/v2/items/99 for details"),
            "see [URL] for details"
        );
    }

    #[test]
    fn test_paths_and_names() {
        let redactor = redactor_with(0.5);
        assert_eq!(
            redactor.redact("Jane Doe edited /home/jane/app/main.py"),
            "[NAME] edited [PATH]"
        );
    }

    #[test]
    fn test_optional_patterns_follow_flags() {
        let redactor = Redactor::new(&PrivacyConfig {
            redact_names: false,
            redact_numbers: false,
            redact_emails: false,
            ..Default::default()
        });
        let text = "Jane Doe sent 3 notes to jane@example.com from 10.1.1.1";
        assert_eq!(
            redactor.redact(text),
            "Jane Doe sent 3 notes to jane@example.com from [IP]"
        );
        assert_eq!(
            redactor.kinds(),
            &[SensitiveKind::Url, SensitiveKind::IpAddress, SensitiveKind::Path]
        );
    }

    #[test]
    fn test_digits_glued_to_email_are_absorbed() {
        let redactor = redactor_with(0.5);

        let out = redactor.redact("write to a@b.io7 today");
        assert_eq!(out, "write to [EMAIL] today");

        let out = redactor.redact("jane@example.com2024");
        assert!(!out.chars().any(|c| c.is_ascii_digit()), "digits left in {}", out);
        assert_eq!(redactor.redact("0@a.aa0"), "[EMAIL]");
    }

    #[test]
    fn test_single_capitalized_token_is_not_a_name() {
        // Names need two capitalized words; a lone token relies on the draw
        let redactor = redactor_with(0.0);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(!redactor.is_sensitive("Jane"));
        assert!(!redactor.should_redact_token("Jane", &mut rng));
        assert!(redactor.is_sensitive("Jane Doe"));
    }

    #[test]
    fn test_redaction_is_idempotent() {
        let redactor = redactor_with(0.5);
        let once = redactor.redact("Ask Jane Doe at jane@x.org, call 555 1234, host 1.2.3.4");
        assert_eq!(redactor.redact(&once), once);
    }

    #[test]
    fn test_sensitive_tokens_always_redacted() {
        let redactor = redactor_with(0.0);
        let mut rng = StdRng::seed_from_u64(7);

        assert!(redactor.should_redact_token("jane@example.com", &mut rng));
        assert!(redactor.should_redact_token("#42", &mut rng));
        assert!(!redactor.should_redact_token("hello", &mut rng));
    }

    #[test]
    fn test_full_level_redacts_everything() {
        let redactor = redactor_with(1.0);
        let mut rng = StdRng::seed_from_u64(7);
        let tokens: Vec<String> = ["alpha", "beta", "gamma"].iter().map(|s| s.to_string()).collect();

        let out = redactor.redact_tokens(&tokens, &mut rng);
        assert!(out.iter().all(|t| t == REDACTED));
    }

    #[test]
    fn test_fixed_seed_fixes_redaction_set() {
        let redactor = redactor_with(0.5);
        let tokens: Vec<String> = (0..50).map(|i| format!("word{}", i)).collect();

        let first = redactor.redact_tokens(&tokens, &mut StdRng::seed_from_u64(99));
        let second = redactor.redact_tokens(&tokens, &mut StdRng::seed_from_u64(99));
        assert_eq!(first, second);
    }

    #[test]
    fn test_redacted_set_grows_with_level() {
        let tokens: Vec<String> = (0..200).map(|i| format!("tok{}x", i)).collect();
        let mut previous = 0;

        for level in [0.0, 0.2, 0.4, 0.6, 0.8, 1.0] {
            let out = redactor_with(level).redact_tokens(&tokens, &mut StdRng::seed_from_u64(3));
            let redacted = out.iter().filter(|t| *t == REDACTED).count();
            assert!(redacted >= previous, "level {} redacted fewer tokens", level);
            previous = redacted;
        }
        assert_eq!(previous, tokens.len());
    }
}
