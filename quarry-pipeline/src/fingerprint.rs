//! Query fingerprinting.
//!
//! The fingerprint is the cache key and the `query_id` feedback refers
//! to. It hashes the normalized query minus the flags that do not change
//! the sealed result (`disable_cache`, `include_timings`,
//! `include_explanations`; explanations are recomputed on demand).

use quarry_core::models::{DetailLevel, Query};

/// Stable blake3 hex fingerprint of a query.
pub fn fingerprint(query: &Query) -> String {
    let mut hasher = blake3::Hasher::new();

    hash_field(&mut hasher, "text", &normalize_text(&query.text));
    hash_field(
        &mut hasher,
        "file",
        query.current_file.as_deref().unwrap_or(""),
    );
    hash_field(&mut hasher, "lang", query.language.as_deref().unwrap_or(""));
    hash_field(
        &mut hasher,
        "repo",
        query.repository.as_deref().unwrap_or(""),
    );
    hash_field(
        &mut hasher,
        "intent",
        query.intent.map(|i| i.as_str()).unwrap_or(""),
    );
    hash_field(&mut hasher, "max", &query.max_results.to_string());
    let detail = match query.detail {
        DetailLevel::Full => "full",
        DetailLevel::Compact => "compact",
        DetailLevel::Ultra => "ultra",
    };
    hash_field(&mut hasher, "detail", detail);
    hash_field(&mut hasher, "bm25", if query.bm25_only { "1" } else { "0" });
    hash_field(
        &mut hasher,
        "deps",
        if query.include_dependencies { "1" } else { "0" },
    );

    hasher.finalize().to_hex().to_string()
}

fn hash_field(hasher: &mut blake3::Hasher, name: &str, value: &str) {
    hasher.update(name.as_bytes());
    hasher.update(b"\x1f");
    hasher.update(value.as_bytes());
    hasher.update(b"\x1e");
}

/// Trim and collapse whitespace runs; case is preserved because it is
/// meaningful for identifier queries.
fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_does_not_change_the_fingerprint() {
        let a = Query::new("retry  with\tbackoff ");
        let b = Query::new("retry with backoff");
        assert_eq!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn cache_and_timing_flags_are_excluded() {
        let base = Query::new("retry with backoff");
        let mut flagged = base.clone();
        flagged.disable_cache = true;
        flagged.include_timings = true;
        flagged.include_explanations = true;
        assert_eq!(fingerprint(&base), fingerprint(&flagged));
    }

    #[test]
    fn semantic_fields_change_the_fingerprint() {
        let base = Query::new("retry with backoff");

        let mut other = base.clone();
        other.repository = Some("acme".into());
        assert_ne!(fingerprint(&base), fingerprint(&other));

        let mut other = base.clone();
        other.bm25_only = true;
        assert_ne!(fingerprint(&base), fingerprint(&other));

        let mut other = base.clone();
        other.max_results = 20;
        assert_ne!(fingerprint(&base), fingerprint(&other));
    }

    #[test]
    fn fingerprint_shape_is_feedback_compatible() {
        let fp = fingerprint(&Query::new("anything"));
        assert!(quarry_core::models::feedback::is_fingerprint(&fp));
    }
}
