//! Keyword-table intent classification.
//!
//! Pure function, no I/O. Tables are checked in a fixed priority order
//! (Debug > Test > Refactor > Document > Implement > Understand); the
//! first table with a match wins and `Understand` is the default.

use quarry_core::Intent;

/// A keyword table for one intent. Single-word entries must match a
/// whole query token; entries with spaces match as substrings of the
/// lowercased query.
struct IntentTable {
    intent: Intent,
    words: &'static [&'static str],
    phrases: &'static [&'static str],
}

/// Priority-ordered tables. Order matters: "test the error handling"
/// classifies as Debug, not Test, because Debug is checked first.
const TABLES: [IntentTable; 6] = [
    IntentTable {
        intent: Intent::Debug,
        words: &[
            "error",
            "exception",
            "traceback",
            "broken",
            "crash",
            "panic",
            "bug",
            "fails",
            "failing",
            "failure",
            "debug",
        ],
        phrases: &["stack trace", "not working", "goes wrong"],
    },
    IntentTable {
        intent: Intent::Test,
        words: &["test", "tests", "spec", "assert", "mock", "fixture", "coverage"],
        phrases: &["unit test", "integration test"],
    },
    IntentTable {
        intent: Intent::Refactor,
        words: &["refactor", "rewrite", "simplify", "restructure", "cleanup", "extract"],
        phrases: &["clean up"],
    },
    IntentTable {
        intent: Intent::Document,
        words: &["doc", "docs", "docstring", "documentation", "comment", "describe", "readme"],
        phrases: &[],
    },
    IntentTable {
        intent: Intent::Implement,
        words: &["implement", "build", "create", "add", "write", "make"],
        phrases: &[],
    },
    IntentTable {
        intent: Intent::Understand,
        words: &["explain", "understand", "why"],
        phrases: &["how does", "how do", "what is", "what does"],
    },
];

/// Classifies query text into an [`Intent`].
#[derive(Debug, Default, Clone, Copy)]
pub struct IntentEngine;

impl IntentEngine {
    pub fn new() -> Self {
        Self
    }

    /// Classify a query. One lowercase pass plus table scans;
    /// sub-millisecond even for kilobyte inputs.
    pub fn classify(&self, query_text: &str) -> Intent {
        let lower = query_text.to_lowercase();
        let tokens: Vec<&str> = lower
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|t| !t.is_empty())
            .collect();

        for table in &TABLES {
            let word_hit = table
                .words
                .iter()
                .any(|w| tokens.iter().any(|t| t == w));
            let phrase_hit = table.phrases.iter().any(|p| lower.contains(p));
            if word_hit || phrase_hit {
                return table.intent;
            }
        }

        Intent::Understand
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(text: &str) -> Intent {
        IntentEngine::new().classify(text)
    }

    #[test]
    fn keyword_tables_map_to_intents() {
        assert_eq!(classify("implement a connection pool"), Intent::Implement);
        assert_eq!(classify("stack trace in the parser"), Intent::Debug);
        assert_eq!(classify("how does the scheduler work"), Intent::Understand);
        assert_eq!(classify("refactor the session manager"), Intent::Refactor);
        assert_eq!(classify("unit test for the tokenizer"), Intent::Test);
        assert_eq!(classify("describe the retry module"), Intent::Document);
    }

    #[test]
    fn priority_order_first_match_wins() {
        // Debug beats Test, Test beats Implement.
        assert_eq!(classify("test the error path"), Intent::Debug);
        assert_eq!(classify("write a test for the cache"), Intent::Test);
    }

    #[test]
    fn default_is_understand() {
        assert_eq!(classify("connection pool sizing"), Intent::Understand);
        assert_eq!(classify(""), Intent::Understand);
    }

    #[test]
    fn whole_token_matching_avoids_substrings() {
        // "latest" must not trigger the Test table.
        assert_eq!(classify("latest schema version"), Intent::Understand);
        // "adder" must not trigger Implement's "add".
        assert_eq!(classify("full adder circuit"), Intent::Understand);
    }
}
