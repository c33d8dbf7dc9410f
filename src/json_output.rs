//! JSON output format for mined patterns
//!
//! Machine-readable rendering of a memory-mode result, selected with
//! `--format json`. The file-mode text format is unaffected.

use crate::pattern::PatternSet;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A single closed pattern
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonPattern {
    /// Itemsets in pattern order, items ascending within each
    pub itemsets: Vec<Vec<u32>>,
    /// Absolute support (number of sequences)
    pub support: usize,
}

/// Summary statistics for the mining run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSummary {
    pub pattern_count: usize,
    pub min_support: usize,
    pub sequence_count: usize,
    pub elapsed_us: u128,
}

/// Root JSON output structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonOutput {
    /// Format version identifier
    pub version: String,
    /// Format name
    pub format: String,
    pub patterns: Vec<JsonPattern>,
    pub summary: JsonSummary,
}

impl JsonOutput {
    /// Render a collected pattern set with its run context
    pub fn from_patterns(
        patterns: &PatternSet,
        min_support: usize,
        sequence_count: usize,
        elapsed: Duration,
    ) -> Self {
        let rendered: Vec<JsonPattern> = patterns
            .iter()
            .map(|pattern| JsonPattern {
                itemsets: pattern
                    .itemsets()
                    .iter()
                    .map(|itemset| itemset.items().to_vec())
                    .collect(),
                support: pattern.absolute_support(),
            })
            .collect();
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            format: "cerrado-json-v1".to_string(),
            summary: JsonSummary {
                pattern_count: rendered.len(),
                min_support,
                sequence_count,
                elapsed_us: elapsed.as_micros(),
            },
            patterns: rendered,
        }
    }

    /// Serialize to a pretty-printed JSON string
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::SequentialPattern;
    use std::collections::HashSet;

    #[test]
    fn test_json_round_trip() {
        let mut set = PatternSet::new();
        let mut pattern = SequentialPattern::singleton(1, HashSet::new());
        pattern = pattern.extended_in_last_itemset(2);
        let mut pattern = pattern.extended_with_new_itemset(5);
        pattern.set_sequence_ids([0usize, 3].into_iter().collect());
        set.add(pattern);

        let output = JsonOutput::from_patterns(&set, 2, 4, Duration::from_micros(1500));
        assert_eq!(output.format, "cerrado-json-v1");
        assert_eq!(output.summary.pattern_count, 1);
        assert_eq!(output.summary.elapsed_us, 1500);
        assert_eq!(output.patterns[0].itemsets, vec![vec![1, 2], vec![5]]);
        assert_eq!(output.patterns[0].support, 2);

        let text = output.to_json().unwrap();
        let parsed: JsonOutput = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.patterns[0].itemsets, output.patterns[0].itemsets);
        assert_eq!(parsed.summary.min_support, 2);
    }
}
