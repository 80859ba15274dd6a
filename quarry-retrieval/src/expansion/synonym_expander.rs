//! Code-aware synonym expansion.
//!
//! Maps common abbreviations to related terms so short queries recall
//! more. E.g., "auth middleware" picks up "authentication login session".

use std::collections::HashMap;

fn synonym_map() -> HashMap<&'static str, &'static [&'static str]> {
    let mut m = HashMap::new();
    m.insert(
        "auth",
        &["authentication", "authorization", "login", "session", "token"][..],
    );
    m.insert("db", &["database", "sql", "query", "schema", "migration"]);
    m.insert("api", &["endpoint", "route", "handler", "rest", "client"]);
    m.insert("config", &["configuration", "settings", "options", "env"]);
    m.insert("err", &["error", "exception", "failure", "panic"]);
    m.insert("cache", &["caching", "memoize", "eviction", "ttl", "lru"]);
    m.insert("async", &["concurrent", "parallel", "future", "await", "task"]);
    m.insert("perf", &["performance", "latency", "throughput", "benchmark"]);
    m.insert("log", &["logging", "tracing", "span", "structured"]);
    m.insert("retry", &["backoff", "timeout", "attempt", "transient"]);
    m.insert("queue", &["channel", "buffer", "producer", "consumer"]);
    m.insert("serde", &["serialize", "deserialize", "json", "encoding"]);
    m
}

/// Expand a query with related terms, bounded to avoid query bloat.
/// Returns `None` when no query word has synonyms.
pub fn expand(query: &str) -> Option<String> {
    let map = synonym_map();
    let words: Vec<&str> = query.split_whitespace().collect();
    let mut expansions: Vec<&str> = Vec::new();

    for word in &words {
        let lower = word.to_lowercase();
        if let Some(synonyms) = map.get(lower.as_str()) {
            for syn in *synonyms {
                if !words.iter().any(|w| w.eq_ignore_ascii_case(syn))
                    && !expansions.contains(syn)
                {
                    expansions.push(syn);
                }
            }
        }
    }

    if expansions.is_empty() {
        return None;
    }

    expansions.truncate(5);
    Some(format!("{} {}", query, expansions.join(" ")))
}
