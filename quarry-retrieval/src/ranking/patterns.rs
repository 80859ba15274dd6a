//! Code-pattern detector registry for the pattern_match factor.
//!
//! Each detector pairs query keywords with a linear-time regex over the
//! candidate snippet. Only the first `scan_bytes` of the snippet are
//! scanned, so a pathological megabyte snippet costs the same as a normal
//! one. Scores are per-detector strengths; the factor takes the maximum,
//! capped at 0.8 so a pattern hit alone never dominates ranking.

use std::sync::OnceLock;

use regex::Regex;

/// Maximum pattern_match factor value.
pub const PATTERN_SCORE_CAP: f64 = 0.8;

struct PatternDetector {
    name: &'static str,
    /// Query tokens that activate this detector.
    keywords: &'static [&'static str],
    regex: Regex,
    /// Score when the regex matches, before the cap.
    strength: f64,
}

fn registry() -> &'static Vec<PatternDetector> {
    static REGISTRY: OnceLock<Vec<PatternDetector>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let detector = |name, keywords, pattern: &str, strength| PatternDetector {
            name,
            keywords,
            // Patterns are word-anchored and free of nested quantifiers;
            // the regex engine itself guarantees linear-time scanning.
            regex: Regex::new(pattern).expect("static pattern must compile"),
            strength,
        };
        vec![
            detector(
                "singleton",
                &["singleton", "instance"][..],
                r"(?im)^\s*(?:static\s+\w+\s+instance|fn\s+instance\s*\(|def\s+get_instance|getInstance)",
                0.8,
            ),
            detector(
                "factory",
                &["factory"][..],
                r"(?i)\b(?:\w+Factory|fn\s+create_\w+|def\s+create_\w+|make_\w+)\b",
                0.8,
            ),
            detector(
                "observer",
                &["observer", "listener", "subscribe", "event"][..],
                r"(?i)\b(?:subscribe|unsubscribe|add_listener|addListener|notify_all|observers)\b",
                0.7,
            ),
            detector(
                "decorator",
                &["decorator", "wrapper", "middleware"][..],
                r"(?im)^\s*(?:@\w+|#\[\w+)|\bwraps?\b",
                0.7,
            ),
            detector(
                "builder",
                &["builder"][..],
                r"(?i)\b(?:\w+Builder|fn\s+build\s*\(|with_\w+\s*\()",
                0.8,
            ),
            detector(
                "retry",
                &["retry", "backoff", "resilient"][..],
                r"(?i)\b(?:retry|retries|backoff|max_attempts|exponential)\b",
                0.7,
            ),
            detector(
                "cache",
                &["cache", "memoize", "lru"][..],
                r"(?i)\b(?:cache|cached|memoize|lru|ttl|evict\w*)\b",
                0.7,
            ),
            detector(
                "repository",
                &["repository", "dao", "storage"][..],
                r"(?i)\b(?:\w+Repository|\w+Dao|find_by_\w+|save_all)\b",
                0.8,
            ),
            detector(
                "iterator",
                &["iterator", "stream", "generator"][..],
                r"(?i)\b(?:impl\s+Iterator|fn\s+next\s*\(|__iter__|yield)\b",
                0.7,
            ),
        ]
    })
}

/// Match outcome for one candidate.
#[derive(Debug, Clone, Default)]
pub struct PatternMatches {
    /// Max detector strength, capped at [`PATTERN_SCORE_CAP`].
    pub score: f64,
    /// Names of every detector that matched.
    pub matched: Vec<String>,
}

/// Run the detectors whose keywords appear in the query tokens against
/// the snippet prefix.
pub fn detect(query_tokens: &[String], snippet: &str, scan_bytes: usize) -> PatternMatches {
    let prefix = snippet_prefix(snippet, scan_bytes);
    let mut matches = PatternMatches::default();

    for detector in registry() {
        let activated = detector
            .keywords
            .iter()
            .any(|kw| query_tokens.iter().any(|t| t == kw));
        if !activated {
            continue;
        }
        if detector.regex.is_match(prefix) {
            matches.matched.push(detector.name.to_string());
            matches.score = matches.score.max(detector.strength);
        }
    }

    matches.score = matches.score.min(PATTERN_SCORE_CAP);
    matches
}

/// Largest prefix of at most `scan_bytes` bytes that ends on a char
/// boundary.
fn snippet_prefix(snippet: &str, scan_bytes: usize) -> &str {
    if snippet.len() <= scan_bytes {
        return snippet;
    }
    let mut end = scan_bytes;
    while end > 0 && !snippet.is_char_boundary(end) {
        end -= 1;
    }
    &snippet[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn retry_pattern_detected() {
        let snippet = "async fn call() { for attempt in 0..max_attempts { /* backoff */ } }";
        let matches = detect(&tokens(&["retry", "logic"]), snippet, 10_240);
        assert_eq!(matches.matched, vec!["retry"]);
        assert!(matches.score > 0.0 && matches.score <= PATTERN_SCORE_CAP);
    }

    #[test]
    fn detector_needs_query_keyword() {
        // The snippet matches the retry regex, but the query never asked.
        let snippet = "let delay = backoff.next();";
        let matches = detect(&tokens(&["parser", "grammar"]), snippet, 10_240);
        assert!(matches.matched.is_empty());
        assert_eq!(matches.score, 0.0);
    }

    #[test]
    fn score_never_exceeds_cap() {
        let snippet = "struct ConnFactory; fn create_conn() {} struct PoolBuilder; fn build() {}";
        let matches = detect(&tokens(&["factory", "builder"]), snippet, 10_240);
        assert!(matches.matched.len() >= 2);
        assert!(matches.score <= PATTERN_SCORE_CAP);
    }

    #[test]
    fn oversized_snippet_is_capped() {
        // A 1 MiB snippet with the only match past the scan bound.
        let mut snippet = " ".repeat(1024 * 1024);
        snippet.push_str("retry backoff");
        let matches = detect(&tokens(&["retry"]), &snippet, 10_240);
        assert!(matches.matched.is_empty());
    }

    #[test]
    fn prefix_respects_char_boundaries() {
        let snippet = "é".repeat(8000); // 2 bytes each
        let prefix = snippet_prefix(&snippet, 10_241);
        assert!(prefix.len() <= 10_241);
        assert!(prefix.is_char_boundary(prefix.len()));
    }
}
