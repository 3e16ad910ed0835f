//! Min-max score normalization

use crate::catalog::occupation::UserScores;

/// Rescale present values to [0, 1] using min and max over present entries only.
///
/// Absent entries map to 0. When every present value is identical (including the
/// single-value case) all entries, absent ones too, map to 1.0. A vector with no
/// present values maps to all zeros.
pub fn normalize(values: &[Option<f64>]) -> Vec<f64> {
    let present = values.iter().flatten().copied();
    let bounds = present.fold(None, |acc: Option<(f64, f64)>, v| match acc {
        None => Some((v, v)),
        Some((min, max)) => Some((min.min(v), max.max(v))),
    });

    let Some((min, max)) = bounds else {
        return vec![0.0; values.len()];
    };

    if min == max {
        return vec![1.0; values.len()];
    }

    let range = max - min;
    values
        .iter()
        .map(|v| v.map_or(0.0, |s| (s - min) / range))
        .collect()
}

pub fn normalize_user(scores: &UserScores) -> Vec<f64> {
    normalize(&scores.as_present())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_and_max_map_to_bounds() {
        let normalized = normalize(&[Some(20.0), Some(60.0), Some(100.0), Some(40.0), Some(20.0), Some(80.0)]);
        assert_eq!(normalized[0], 0.0);
        assert_eq!(normalized[2], 1.0);
        assert!((normalized[1] - 0.5).abs() < 1e-12);
        assert!(normalized.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_absent_entries_map_to_zero() {
        let normalized = normalize(&[Some(50.0), None, Some(100.0), None, Some(75.0), None]);
        assert_eq!(normalized, vec![0.0, 0.0, 1.0, 0.0, 0.5, 0.0]);
    }

    #[test]
    fn test_flat_vector_maps_to_one() {
        assert_eq!(normalize(&[Some(50.0); 6]), vec![1.0; 6]);
        assert_eq!(normalize(&[None, Some(30.0), None, None, None, None]), vec![1.0; 6]);
    }

    #[test]
    fn test_all_absent_maps_to_zero() {
        assert_eq!(normalize(&[None; 6]), vec![0.0; 6]);
    }

    #[test]
    fn test_normalize_user() {
        let scores = UserScores::new([90.0, 10.0, 10.0, 10.0, 10.0, 10.0]);
        assert_eq!(normalize_user(&scores), vec![1.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
    }
}
