//! Registry of recently served results.
//!
//! Reward apportionment needs the factor values of the result a feedback
//! record refers to. The pipeline registers each served response here
//! (keyed by query fingerprint); the collector looks entries up when
//! feedback arrives. Bounded and TTL'd; feedback on long-forgotten
//! queries simply carries no factor attribution.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;

use quarry_core::models::{FactorVector, RankedResult};
use quarry_core::Intent;

/// What we remember about one served response.
#[derive(Debug)]
pub struct ServedQuery {
    pub intent: Intent,
    /// Factor vectors by result id.
    pub factors: HashMap<String, FactorVector>,
}

/// Bounded map from query fingerprint to served results.
pub struct ServedRegistry {
    cache: Cache<String, Arc<ServedQuery>>,
}

impl ServedRegistry {
    pub fn new(max_entries: u64, ttl: Duration) -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(max_entries)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Remember a served response.
    pub fn insert(&self, fingerprint: &str, intent: Intent, results: &[RankedResult]) {
        let factors = results
            .iter()
            .map(|r| (r.result.id.clone(), r.factors.clone()))
            .collect();
        self.cache.insert(
            fingerprint.to_string(),
            Arc::new(ServedQuery { intent, factors }),
        );
    }

    /// Factor values for one result of one served query.
    pub fn lookup(&self, fingerprint: &str, result_id: &str) -> Option<FactorVector> {
        self.cache
            .get(fingerprint)
            .and_then(|served| served.factors.get(result_id).cloned())
    }

    /// Intent the query was served under.
    pub fn intent_for(&self, fingerprint: &str) -> Option<Intent> {
        self.cache.get(fingerprint).map(|served| served.intent)
    }
}

impl Default for ServedRegistry {
    fn default() -> Self {
        // Roomy enough to cover any realistic feedback delay.
        Self::new(2048, Duration::from_secs(3600))
    }
}
