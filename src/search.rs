//! Nearest-neighbor search
//!
//! Searches are written against [`CandidateSource`], not against the store
//! directly. The store yields every record it holds (linear scan); an indexed
//! structure could yield a pruned set instead and reuse the same ranking.

use crate::vector::VectorRecord;
use log::warn;
use serde::Serialize;
use std::cmp::Ordering;

/// Something a search can draw `(index, record)` candidates from.
///
/// Candidates must be yielded in ascending index order. Ties in distance are
/// resolved in favour of the candidate yielded first.
pub trait CandidateSource {
    fn candidates(&self) -> impl Iterator<Item = (usize, &VectorRecord)>;
}

impl CandidateSource for [VectorRecord] {
    fn candidates(&self) -> impl Iterator<Item = (usize, &VectorRecord)> {
        self.iter().enumerate()
    }
}

/// A search hit, borrowed from the source it was found in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Neighbor<'a> {
    /// Insertion index of the record.
    pub index: usize,
    pub distance: f64,
    #[serde(rename = "vector")]
    pub record: &'a VectorRecord,
}

/// Ascending distance order with NaN after every number.
fn cmp_distance(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (a_nan, b_nan) => a_nan.cmp(&b_nan),
    }
}

/// Scores every candidate whose dimension matches the query.
///
/// Mismatched candidates are skipped with a warning; they never abort the scan.
fn comparable<'a, S>(source: &'a S, query: &VectorRecord) -> impl Iterator<Item = Neighbor<'a>>
where
    S: CandidateSource + ?Sized,
{
    source.candidates().filter_map(move |(index, record)| {
        match query.distance(record) {
            Ok(distance) => Some(Neighbor { index, distance, record }),
            Err(e) => {
                warn!("skipping vector {}: {}", index, e);
                None
            }
        }
    })
}

/// Finds the candidate closest to `query`.
///
/// Returns `None` when the source is empty or when no candidate shares the
/// query's dimension. The first candidate reaching the minimum distance wins.
///
/// # Examples
///
/// ```
/// use vecstore::{nearest, VectorRecord};
///
/// let records = vec![
///     VectorRecord::from_values(vec![0.0, 0.0]),
///     VectorRecord::from_values(vec![3.0, 4.0]),
/// ];
/// let query = VectorRecord::from_values(vec![2.0, 3.0]);
///
/// let hit = nearest(records.as_slice(), &query).unwrap();
/// assert_eq!(hit.index, 1);
/// ```
pub fn nearest<'a, S>(source: &'a S, query: &VectorRecord) -> Option<Neighbor<'a>>
where
    S: CandidateSource + ?Sized,
{
    let mut best: Option<Neighbor<'a>> = None;
    for candidate in comparable(source, query) {
        // strict less-than keeps the earliest of equal distances
        if best.is_none_or(|b| cmp_distance(candidate.distance, b.distance).is_lt()) {
            best = Some(candidate);
        }
    }
    best
}

/// Finds up to `top_k` candidates closest to `query`, ascending by distance.
///
/// Equal distances keep candidate order, so earlier insertions rank first.
pub fn k_nearest<'a, S>(source: &'a S, query: &VectorRecord, top_k: usize) -> Vec<Neighbor<'a>>
where
    S: CandidateSource + ?Sized,
{
    if top_k == 0 {
        return Vec::new();
    }

    let mut best: Vec<Neighbor<'a>> = Vec::with_capacity(top_k.saturating_add(1).min(1024));
    for candidate in comparable(source, query) {
        if best.len() == top_k
            && cmp_distance(best[top_k - 1].distance, candidate.distance).is_le()
        {
            continue;
        }
        let insert_index =
            best.partition_point(|n| cmp_distance(n.distance, candidate.distance).is_le());
        best.insert(insert_index, candidate);
        best.truncate(top_k);
    }
    best
}

#[cfg(test)]
mod search_test {
    use super::*;

    fn records(rows: &[&[f64]]) -> Vec<VectorRecord> {
        rows.iter().map(|r| VectorRecord::from_values(r.to_vec())).collect()
    }

    // ========== Nearest Tests ==========

    #[test]
    fn test_nearest_empty_source() {
        let empty: Vec<VectorRecord> = Vec::new();
        let query = VectorRecord::from_values(vec![1.0]);

        assert!(nearest(empty.as_slice(), &query).is_none());
    }

    #[test]
    fn test_nearest_picks_minimum() {
        let rs = records(&[&[10.0, 10.0], &[1.0, 1.0], &[5.0, 5.0]]);
        let query = VectorRecord::from_values(vec![0.0, 0.0]);

        let hit = nearest(rs.as_slice(), &query).unwrap();
        assert_eq!(hit.index, 1);
        assert!((hit.distance - 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_nearest_tie_goes_to_first() {
        // both at distance 1 from the origin
        let rs = records(&[&[5.0, 5.0], &[1.0, 0.0], &[0.0, 1.0]]);
        let query = VectorRecord::from_values(vec![0.0, 0.0]);

        let hit = nearest(rs.as_slice(), &query).unwrap();
        assert_eq!(hit.index, 1);
        assert_eq!(hit.distance, 1.0);
    }

    #[test]
    fn test_nearest_skips_mismatched_dimensions() {
        let rs = records(&[&[0.0, 0.0, 0.0], &[9.0, 9.0], &[0.0]]);
        let query = VectorRecord::from_values(vec![8.0, 8.0]);

        let hit = nearest(rs.as_slice(), &query).unwrap();
        assert_eq!(hit.index, 1);
    }

    #[test]
    fn test_nearest_all_mismatched() {
        let rs = records(&[&[1.0, 2.0, 3.0]]);
        let query = VectorRecord::from_values(vec![1.0, 2.0]);

        assert!(nearest(rs.as_slice(), &query).is_none());
    }

    #[test]
    fn test_nearest_nan_never_wins() {
        let rs = records(&[&[f64::NAN], &[100.0]]);
        let query = VectorRecord::from_values(vec![0.0]);

        let hit = nearest(rs.as_slice(), &query).unwrap();
        assert_eq!(hit.index, 1);
    }

    // ========== K-Nearest Tests ==========

    #[test]
    fn test_k_nearest_sorted_ascending() {
        let rs = records(&[&[3.0], &[1.0], &[4.0], &[1.5], &[9.0]]);
        let query = VectorRecord::from_values(vec![0.0]);

        let hits = k_nearest(rs.as_slice(), &query, 3);
        let indices: Vec<usize> = hits.iter().map(|n| n.index).collect();
        assert_eq!(indices, vec![1, 3, 0]);

        for w in hits.windows(2) {
            assert!(w[0].distance <= w[1].distance);
        }
    }

    #[test]
    fn test_k_nearest_ties_keep_insertion_order() {
        let rs = records(&[&[2.0], &[-1.0], &[1.0], &[-1.0]]);
        let query = VectorRecord::from_values(vec![0.0]);

        let hits = k_nearest(rs.as_slice(), &query, 4);
        let indices: Vec<usize> = hits.iter().map(|n| n.index).collect();
        assert_eq!(indices, vec![1, 2, 3, 0]);

        let top_two = k_nearest(rs.as_slice(), &query, 2);
        let indices: Vec<usize> = top_two.iter().map(|n| n.index).collect();
        assert_eq!(indices, vec![1, 2]);
    }

    #[test]
    fn test_k_nearest_larger_than_source() {
        let rs = records(&[&[1.0], &[2.0]]);
        let query = VectorRecord::from_values(vec![0.0]);

        assert_eq!(k_nearest(rs.as_slice(), &query, 10).len(), 2);
    }

    #[test]
    fn test_k_nearest_zero() {
        let rs = records(&[&[1.0]]);
        let query = VectorRecord::from_values(vec![1.0]);

        assert!(k_nearest(rs.as_slice(), &query, 0).is_empty());
    }

    #[test]
    fn test_k_nearest_skips_mismatched_dimensions() {
        let rs = records(&[&[1.0, 1.0], &[2.0], &[3.0, 3.0]]);
        let query = VectorRecord::from_values(vec![0.0, 0.0]);

        let hits = k_nearest(rs.as_slice(), &query, 5);
        let indices: Vec<usize> = hits.iter().map(|n| n.index).collect();
        assert_eq!(indices, vec![0, 2]);
    }
}
