//! Equality join on rounded coordinates and temporal key.

use std::collections::HashMap;

use super::{
    key::{coordinate_distance, JoinKey},
    table::MatchedPair,
    Keyed,
};

/// Pairs every primary record with every secondary record sharing its key.
///
/// `distance` is recorded but not bounded: records in the same cell always
/// match. Output follows primary input order, then secondary input order.
pub(super) fn join(primary: &[Keyed<'_>], secondary: &[Keyed<'_>]) -> Vec<MatchedPair> {
    let mut index: HashMap<JoinKey, Vec<&Keyed<'_>>> = HashMap::new();
    for s in secondary {
        index.entry(s.key).or_default().push(s);
    }

    let mut pairs = Vec::new();
    for p in primary {
        let Some(candidates) = index.get(&p.key) else {
            continue;
        };

        for s in candidates {
            let distance = coordinate_distance(p.record, s.record);
            pairs.push(MatchedPair::new(p.record, s.record, p.key, distance));
        }
    }

    pairs
}
