//! F1 agreement between a reference solution and a candidate.

use std::collections::HashSet;
use std::hash::Hash;

/// Harmonic mean of precision and recall of `candidate` against `reference`.
///
/// Both inputs are treated as sets, so repeated vertices count once. Returns
/// `0.0` if either set is empty or the two are disjoint.
pub fn f1_score<T: Eq + Hash>(reference: &[T], candidate: &[T]) -> f64 {
    let reference: HashSet<&T> = reference.iter().collect();
    let candidate: HashSet<&T> = candidate.iter().collect();
    if reference.is_empty() || candidate.is_empty() {
        return 0.0;
    }

    let hits = candidate.intersection(&reference).count() as f64;
    let precision = hits / candidate.len() as f64;
    let recall = hits / reference.len() as f64;
    if precision + recall == 0.0 {
        return 0.0;
    }
    2.0 * precision * recall / (precision + recall)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_values() {
        assert_eq!(f1_score::<u32>(&[], &[1, 2]), 0.0);
        assert_eq!(f1_score::<u32>(&[1, 2], &[]), 0.0);
        assert_eq!(f1_score::<u32>(&[], &[]), 0.0);
        assert_eq!(f1_score(&[1, 3, 5], &[5, 1, 3]), 1.0);
        assert_eq!(f1_score(&[1, 3], &[2, 4]), 0.0);
    }

    #[test]
    fn partial_overlap() {
        // precision 1/2, recall 1/3
        let f1 = f1_score(&[1, 2, 3], &[1, 9]);
        assert!((f1 - 0.4).abs() < 1e-12);
    }

    #[test]
    fn duplicates_count_once() {
        assert_eq!(f1_score(&[1, 1, 2], &[2, 1, 2]), 1.0);
    }
}
