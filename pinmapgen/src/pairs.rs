//! Differential Pair Detection
//!
//! Finds electrically paired nets from naming convention alone. Templates are
//! plain data, evaluated in order; the first template that pairs a net wins
//! and a net joins at most one pair per pass.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::pinmap::DifferentialPair;

/// A (positive suffix, negative suffix) naming convention.
///
/// Matching is ASCII case-insensitive. The shared base name is whatever
/// precedes the suffix and may be empty, so `CANH`/`CANL` pair as well as
/// `BUS_CANH`/`BUS_CANL`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffPairTemplate {
    pub name: String,
    pub positive_suffix: String,
    pub negative_suffix: String,
}

impl DiffPairTemplate {
    pub fn new(name: &str, positive_suffix: &str, negative_suffix: &str) -> Self {
        Self {
            name: name.to_string(),
            positive_suffix: positive_suffix.to_string(),
            negative_suffix: negative_suffix.to_string(),
        }
    }

    /// Base name if `net` ends with the positive suffix.
    pub fn positive_base<'a>(&self, net: &'a str) -> Option<&'a str> {
        strip_suffix_ignore_case(net, &self.positive_suffix)
    }

    /// Base name if `net` ends with the negative suffix.
    pub fn negative_base<'a>(&self, net: &'a str) -> Option<&'a str> {
        strip_suffix_ignore_case(net, &self.negative_suffix)
    }

    fn negative_for(&self, base: &str) -> String {
        format!("{}{}", base, self.negative_suffix)
    }
}

/// Reference template order.
pub fn builtin_templates() -> Vec<DiffPairTemplate> {
    vec![
        DiffPairTemplate::new("p_n", "_P", "_N"),
        DiffPairTemplate::new("dp_dn", "_DP", "_DN"),
        DiffPairTemplate::new("dp_dm", "DP", "DM"),
        DiffPairTemplate::new("canh_canl", "CANH", "CANL"),
        DiffPairTemplate::new("can_h_can_l", "CAN_H", "CAN_L"),
        DiffPairTemplate::new("plus_minus", "_PLUS", "_MINUS"),
    ]
}

fn strip_suffix_ignore_case<'a>(name: &'a str, suffix: &str) -> Option<&'a str> {
    if suffix.is_empty() || name.len() < suffix.len() {
        return None;
    }
    let split = name.len() - suffix.len();
    if !name.is_char_boundary(split) {
        return None;
    }
    let (base, tail) = name.split_at(split);
    tail.eq_ignore_ascii_case(suffix).then_some(base)
}

/// Template-driven differential pair detector.
#[derive(Debug, Clone)]
pub struct DifferentialPairDetector {
    templates: Vec<DiffPairTemplate>,
}

impl Default for DifferentialPairDetector {
    fn default() -> Self {
        Self::new(builtin_templates())
    }
}

impl DifferentialPairDetector {
    pub fn new(templates: Vec<DiffPairTemplate>) -> Self {
        Self { templates }
    }

    pub fn templates(&self) -> &[DiffPairTemplate] {
        &self.templates
    }

    /// Detect pairs among `nets`.
    ///
    /// Pairs are returned in the scan order of their positive net, so the
    /// result depends only on the input order, never on hashing.
    pub fn detect<S: AsRef<str>>(&self, nets: &[S]) -> Vec<DifferentialPair> {
        let names: Vec<&str> = nets.iter().map(|n| n.as_ref()).collect();
        let mut paired = vec![false; names.len()];
        let mut found: Vec<(usize, usize)> = Vec::new();

        for template in &self.templates {
            let mut tried: HashSet<String> = HashSet::new();

            for (i, name) in names.iter().enumerate() {
                if paired[i] {
                    continue;
                }
                let Some(base) = template.positive_base(name) else {
                    continue;
                };
                if !tried.insert(base.to_ascii_uppercase()) {
                    continue;
                }

                let target = template.negative_for(base);
                let partner = names.iter().enumerate().position(|(j, other)| {
                    j != i && !paired[j] && other.eq_ignore_ascii_case(&target)
                });

                if let Some(j) = partner {
                    tracing::debug!(
                        template = %template.name,
                        positive = names[i],
                        negative = names[j],
                        "detected differential pair"
                    );
                    paired[i] = true;
                    paired[j] = true;
                    found.push((i, j));
                }
            }
        }

        found.sort_by_key(|(pos, _)| *pos);
        found
            .into_iter()
            .map(|(pos, neg)| DifferentialPair {
                positive: names[pos].to_string(),
                negative: names[neg].to_string(),
            })
            .collect()
    }

    /// Whether a net's name follows any template's positive or negative convention.
    pub fn looks_differential(&self, net: &str) -> bool {
        self.templates
            .iter()
            .any(|t| t.positive_base(net).is_some() || t.negative_base(net).is_some())
    }

    /// Nets that look differential but did not end up in any of `pairs`.
    pub fn lonely_signals<'a, S: AsRef<str>>(
        &self,
        nets: &'a [S],
        pairs: &[DifferentialPair],
    ) -> Vec<&'a str> {
        let in_pair: HashSet<&str> = pairs
            .iter()
            .flat_map(|p| [p.positive.as_str(), p.negative.as_str()])
            .collect();

        nets.iter()
            .map(|n| n.as_ref())
            .filter(|n| !in_pair.contains(n) && self.looks_differential(n))
            .collect()
    }
}
