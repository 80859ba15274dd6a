//! Column-wise min-max normalization across the candidate set.
//!
//! Every factor is normalized within the current result set. A column
//! with no spread (min == max) maps to 0.5 for every candidate; this is
//! also what makes a single-candidate set blend to exactly 0.5. Unknown
//! recency normalizes to 0.5 without influencing the min-max of the
//! known timestamps.

use quarry_core::models::{FactorScore, FactorVector};

use crate::ranking::scorer::{confidence, RawScores};

/// Normalize raw score columns into [0,1] factor vectors.
pub(crate) fn normalize(raws: &[RawScores]) -> Vec<FactorVector> {
    let text = min_max(raws.iter().map(|r| r.text));
    let semantic = min_max(raws.iter().map(|r| r.semantic));
    let context = min_max(raws.iter().map(|r| r.context));
    let import = min_max(raws.iter().map(|r| r.import));
    let proximity = min_max(raws.iter().map(|r| r.proximity));
    let quality = min_max(raws.iter().map(|r| r.quality));
    let pattern = min_max(raws.iter().map(|r| r.pattern));
    let recency = min_max_optional(raws.iter().map(|r| r.recency));

    raws.iter()
        .enumerate()
        .map(|(i, raw)| FactorVector {
            text_relevance: FactorScore::new(text[i], confidence::TEXT),
            semantic_similarity: FactorScore::new(semantic[i], raw.semantic_confidence),
            context_overlap: FactorScore::new(context[i], raw.context_confidence),
            import_similarity: FactorScore::new(import[i], confidence::IMPORT),
            proximity: FactorScore::new(proximity[i], confidence::PROXIMITY),
            recency: FactorScore::new(recency[i], confidence::RECENCY),
            quality: FactorScore::new(quality[i], raw.quality_confidence),
            pattern_match: FactorScore::new(pattern[i], confidence::PATTERN),
        })
        .collect()
}

/// Min-max one column. Degenerate columns (min == max) map to 0.5.
fn min_max(values: impl Iterator<Item = f64>) -> Vec<f64> {
    let values: Vec<f64> = values.collect();
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if values.is_empty() || min == max {
        return vec![0.5; values.len()];
    }
    values.iter().map(|v| (v - min) / (max - min)).collect()
}

/// Like `min_max`, with unknown entries pinned to 0.5.
fn min_max_optional(values: impl Iterator<Item = Option<f64>>) -> Vec<f64> {
    let values: Vec<Option<f64>> = values.collect();
    let known: Vec<f64> = values.iter().filter_map(|v| *v).collect();

    let min = known.iter().copied().fold(f64::INFINITY, f64::min);
    let max = known.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    values
        .iter()
        .map(|v| match v {
            None => 0.5,
            Some(_) if known.is_empty() || min == max => 0.5,
            Some(v) => (v - min) / (max - min),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(text: f64) -> RawScores {
        RawScores {
            text,
            semantic: 0.0,
            semantic_confidence: 0.6,
            context: 0.0,
            context_confidence: 0.0,
            import: 0.0,
            proximity: 0.0,
            recency: None,
            quality: 0.0,
            quality_confidence: 0.0,
            pattern: 0.0,
            matched_patterns: Vec::new(),
        }
    }

    #[test]
    fn spread_maps_to_unit_interval() {
        let raws = vec![raw(10.0), raw(8.0), raw(9.0)];
        let factors = normalize(&raws);
        assert_eq!(factors[0].text_relevance.value, 1.0);
        assert_eq!(factors[1].text_relevance.value, 0.0);
        assert_eq!(factors[2].text_relevance.value, 0.5);
    }

    #[test]
    fn degenerate_column_is_half() {
        let raws = vec![raw(7.0), raw(7.0)];
        let factors = normalize(&raws);
        assert_eq!(factors[0].text_relevance.value, 0.5);
        assert_eq!(factors[1].text_relevance.value, 0.5);
    }

    #[test]
    fn single_candidate_is_half_everywhere() {
        let raws = vec![raw(42.0)];
        let factors = normalize(&raws);
        for factor in quarry_core::Factor::ALL {
            assert_eq!(factors[0].get(factor).value, 0.5);
        }
    }

    #[test]
    fn unknown_recency_is_half_and_does_not_skew() {
        let mut a = raw(1.0);
        a.recency = Some(1_000.0);
        let mut b = raw(2.0);
        b.recency = Some(2_000.0);
        let c = raw(3.0); // unknown recency

        let factors = normalize(&[a, b, c]);
        assert_eq!(factors[0].recency.value, 0.0);
        assert_eq!(factors[1].recency.value, 1.0);
        assert_eq!(factors[2].recency.value, 0.5);
    }
}
