//! This is the vector module
//! Provide the stored point type and Euclidean distance

use crate::error::{Result, VectorError};
use serde::Serialize;

/// One point in R^n.
///
/// The dimension is fixed when the record is built. There is no mutable
/// access to the components afterwards, so a record handed to the store
/// stays exactly as it was inserted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct VectorRecord {
    values: Vec<f64>,
}

impl VectorRecord {
    /// Creates a zero-filled record with `dimension` components.
    ///
    /// A dimension of zero is allowed. Two zero-dimension records are at
    /// distance `0.0` from each other; against anything else they mismatch.
    ///
    /// # Examples
    ///
    /// ```
    /// use vecstore::VectorRecord;
    ///
    /// let v = VectorRecord::new(3);
    /// assert_eq!(v.dimension(), 3);
    /// assert_eq!(v.values(), &[0.0, 0.0, 0.0]);
    /// ```
    pub fn new(dimension: usize) -> Self {
        VectorRecord { values: vec![0.0; dimension] }
    }

    /// Builds a record from already parsed components.
    pub fn from_values(values: Vec<f64>) -> Self {
        VectorRecord { values }
    }

    pub fn dimension(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Euclidean distance to `other`.
    ///
    /// # Returns
    ///
    /// * `Ok(f64)` - `sqrt(sum((self[i] - other[i])^2))`
    /// * `Err(VectorError::DimensionMismatch)` - if the dimensions differ,
    ///   with `expected` set to this record's dimension
    ///
    /// # Examples
    ///
    /// ```
    /// use vecstore::VectorRecord;
    ///
    /// let a = VectorRecord::from_values(vec![0.0, 0.0]);
    /// let b = VectorRecord::from_values(vec![3.0, 4.0]);
    /// assert_eq!(a.distance(&b).unwrap(), 5.0);
    ///
    /// let c = VectorRecord::from_values(vec![1.0]);
    /// assert!(a.distance(&c).is_err());
    /// ```
    pub fn distance(&self, other: &VectorRecord) -> Result<f64> {
        euclidean_distance(&self.values, &other.values)
    }
}

impl From<Vec<f64>> for VectorRecord {
    fn from(values: Vec<f64>) -> Self {
        VectorRecord::from_values(values)
    }
}

/// Euclidean distance
/// dist = sqrt(sum((left[i] - right[i])^2)) for i = 0..left.len()
/// Can only process vectors with same dimensions
/// Differences are scaled by the largest one before squaring
pub fn euclidean_distance(left: &[f64], right: &[f64]) -> Result<f64> {
    if left.len() != right.len() {
        return Err(VectorError::DimensionMismatch {
            expected: left.len(),
            actual: right.len(),
        });
    }

    let diffs = || left.iter().zip(right.iter()).map(|(x, y)| x - y);

    // scale by the largest |diff| so squaring cannot overflow or underflow
    let scale = diffs().fold(0.0, |max: f64, d| if d.abs() > max { d.abs() } else { max });

    if scale == 0.0 || scale.is_infinite() {
        // all-zero diffs stay exactly +0.0, an overflowed diff stays infinite
        let squared = diffs().fold(0.0, |acc, d| acc + d * d);
        return Ok(squared.sqrt());
    }

    let scaled = diffs()
        .map(|d| d / scale)
        .fold(0.0, |acc, r| acc + r * r);

    Ok(scale * scaled.sqrt())
}

#[cfg(test)]
mod vector_test {
    use super::*;

    // ========== Construction Tests ==========

    #[test]
    fn test_new_is_zero_filled() {
        let v = VectorRecord::new(4);

        assert_eq!(v.dimension(), 4);
        assert!(v.values().iter().all(|x| *x == 0.0));
    }

    #[test]
    fn test_new_zero_dimension() {
        let v = VectorRecord::new(0);

        assert_eq!(v.dimension(), 0);
        assert!(v.is_empty());
    }

    #[test]
    fn test_from_values_keeps_order() {
        let v: VectorRecord = vec![1.5, -2.0, 3.25].into();

        assert_eq!(v.dimension(), 3);
        assert_eq!(v.values(), &[1.5, -2.0, 3.25]);
    }

    // ========== Distance Tests ==========

    #[test]
    fn test_distance_basic() {
        // ||[3,4] - [0,0]|| = 5
        let a = VectorRecord::from_values(vec![0.0, 0.0]);
        let b = VectorRecord::from_values(vec![3.0, 4.0]);

        assert_eq!(a.distance(&b).unwrap(), 5.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = VectorRecord::from_values(vec![1.0, -2.0, 7.5]);
        let b = VectorRecord::from_values(vec![-4.0, 0.5, 2.0]);

        assert_eq!(a.distance(&b).unwrap(), b.distance(&a).unwrap());
    }

    #[test]
    fn test_distance_to_self_is_exactly_zero() {
        let a = VectorRecord::from_values(vec![0.1, 1e300, -3.7, f64::MIN_POSITIVE]);

        assert_eq!(a.distance(&a).unwrap(), 0.0);
    }

    #[test]
    fn test_distance_zero_dimension() {
        let a = VectorRecord::new(0);
        let b = VectorRecord::new(0);
        let d = a.distance(&b).unwrap();

        assert_eq!(d, 0.0);
        assert!(d.is_sign_positive());
    }

    #[test]
    fn test_distance_dimension_mismatch() {
        let a = VectorRecord::from_values(vec![1.0, 2.0, 3.0]);
        let b = VectorRecord::from_values(vec![1.0, 2.0]);

        assert_eq!(
            a.distance(&b),
            Err(VectorError::DimensionMismatch { expected: 3, actual: 2 })
        );
        assert_eq!(
            b.distance(&a),
            Err(VectorError::DimensionMismatch { expected: 2, actual: 3 })
        );
    }

    #[test]
    fn test_distance_empty_against_non_empty() {
        let a = VectorRecord::new(0);
        let b = VectorRecord::from_values(vec![1.0]);

        assert!(a.distance(&b).is_err());
        assert!(b.distance(&a).is_err());
    }

    #[test]
    fn test_distance_large_components_do_not_overflow() {
        // naive squaring of 1e155 overflows to inf
        let zero = VectorRecord::from_values(vec![0.0]);
        let far = VectorRecord::from_values(vec![1e155]);
        let query = VectorRecord::from_values(vec![2e155]);

        assert_eq!(zero.distance(&far).unwrap(), 1e155);
        assert_eq!(query.distance(&zero).unwrap(), 2e155);
        assert_eq!(query.distance(&far).unwrap(), 1e155);

        let a = VectorRecord::from_values(vec![0.0, 0.0]);
        let b = VectorRecord::from_values(vec![3e200, 4e200]);
        let d = a.distance(&b).unwrap();
        assert!(((d - 5e200) / 5e200).abs() < 1e-15);
        assert_eq!(d, b.distance(&a).unwrap());
    }

    #[test]
    fn test_distance_tiny_components_do_not_underflow() {
        let a = VectorRecord::from_values(vec![0.0, 0.0]);
        let b = VectorRecord::from_values(vec![3e-200, 4e-200]);
        let d = a.distance(&b).unwrap();

        assert!(d > 0.0);
        assert!(((d - 5e-200) / 5e-200).abs() < 1e-15);
    }

    #[test]
    fn test_distance_beyond_f64_range_is_infinite() {
        let a = VectorRecord::from_values(vec![-f64::MAX]);
        let b = VectorRecord::from_values(vec![f64::MAX]);

        assert_eq!(a.distance(&b).unwrap(), f64::INFINITY);
    }

    #[test]
    fn test_euclidean_distance_slices() {
        // sqrt(1 + 4 + 4) = 3
        let result = euclidean_distance(&[1.0, 2.0, 3.0], &[2.0, 4.0, 5.0]).unwrap();

        assert!((result - 3.0).abs() < 1e-12);
    }
}
