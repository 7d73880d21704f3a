//! Nearest-neighbour join within a coordinate tolerance.

use std::collections::HashMap;

use super::{
    key::{coordinate_distance, TemporalKey},
    table::MatchedPair,
    Keyed,
};
use crate::record::GeoRecord;

/// Pairs each primary record with its nearest secondary record sharing the
/// temporal key, if that record lies within `tolerance`.
///
/// Both sides are sorted by (latitude, longitude) and the output follows the
/// sorted primary order. Ties go to the first candidate in sorted order.
pub(super) fn join(
    mut primary: Vec<Keyed<'_>>,
    secondary: Vec<Keyed<'_>>,
    tolerance: f64,
) -> Vec<MatchedPair> {
    sort_by_position(&mut primary);

    let mut by_time: HashMap<TemporalKey, Vec<Keyed<'_>>> = HashMap::new();
    for s in secondary {
        by_time.entry(s.key.time()).or_default().push(s);
    }
    for candidates in by_time.values_mut() {
        sort_by_position(candidates);
    }

    primary
        .iter()
        .filter_map(|p| {
            let candidates = by_time.get(&p.key.time())?;
            let (s, distance) = nearest(candidates, p.record, tolerance)?;
            Some(MatchedPair::new(p.record, s.record, p.key, distance))
        })
        .collect()
}

fn sort_by_position(records: &mut [Keyed<'_>]) {
    records.sort_by(|a, b| {
        a.record
            .latitude
            .total_cmp(&b.record.latitude)
            .then(a.record.longitude.total_cmp(&b.record.longitude))
    });
}

/// Scans the latitude band `[lat - tolerance, lat + tolerance]` of `sorted`.
fn nearest<'k, 'r>(
    sorted: &'k [Keyed<'r>],
    target: &GeoRecord,
    tolerance: f64,
) -> Option<(&'k Keyed<'r>, f64)> {
    let lower = target.latitude - tolerance;
    let upper = target.latitude + tolerance;
    let start = sorted.partition_point(|c| c.record.latitude < lower);

    let mut best: Option<(&Keyed<'r>, f64)> = None;
    for candidate in &sorted[start..] {
        if candidate.record.latitude > upper {
            break;
        }

        let distance = coordinate_distance(target, candidate.record);
        if distance > tolerance {
            continue;
        }
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((candidate, distance));
        }
    }

    best
}
