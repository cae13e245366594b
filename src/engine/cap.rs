use crate::types::DensityPoint;

/// Cap extreme depths at `round(q3 + 1.5 * iqr)` so a handful of hot bins
/// do not flatten the visual scale of the whole curve.
///
/// Quartiles are plain order statistics on the value-sorted copy
/// (`floor(n/4)` and `ceil(3n/4)`), not interpolated quantiles. Display
/// thresholds depend on these exact positions; do not "fix" them. Values
/// are only capped from above, never floored. Fewer than 5 points, or a
/// flat distribution (`q1 == q3`), pass through uncapped. The input is
/// never mutated and the result is always sorted by position.
pub fn cap_outliers(points: &[DensityPoint]) -> Vec<DensityPoint> {
    if points.len() < 5 {
        return points.to_vec();
    }

    let mut values = points.to_vec();
    values.sort_by_key(|p| p.depth);

    let n = values.len();
    let q1 = values[n / 4].depth;
    let q3 = values[(3 * n).div_ceil(4)].depth;

    if q3 != q1 {
        let iqr = (q3 - q1) as f64;
        let ceiling = (q3 as f64 + iqr * 1.5).round() as u64;
        for point in values.iter_mut() {
            if point.depth > ceiling {
                point.depth = ceiling;
            }
        }
    }

    values.sort_by_key(|p| p.pos);
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(pairs: &[(u64, u64)]) -> Vec<DensityPoint> {
        pairs.iter().map(|&(p, d)| DensityPoint::new(p, d)).collect()
    }

    #[test]
    fn test_cap_small_input_passthrough() {
        let input = points(&[(0, 1), (1, 1000), (2, 3)]);
        assert_eq!(cap_outliers(&input), input);
    }

    #[test]
    fn test_cap_five_point_example_unchanged() {
        // At n = 5 the upper order statistic lands on the spike itself, so
        // the ceiling clears every value and the input comes back as-is.
        let input = points(&[(0, 1), (1, 1), (2, 1), (3, 1), (4, 100)]);
        assert_eq!(cap_outliers(&input), input);
    }

    #[test]
    fn test_cap_flat_distribution_passthrough() {
        // q1 == q3: nothing to cap, result re-sorted by position
        let input = points(&[(3, 2), (0, 2), (4, 2), (1, 2), (2, 2), (5, 2)]);
        let capped = cap_outliers(&input);
        let expected = points(&[(0, 2), (1, 2), (2, 2), (3, 2), (4, 2), (5, 2)]);
        assert_eq!(capped, expected);
    }

    #[test]
    fn test_cap_suppresses_spike() {
        let mut pairs: Vec<(u64, u64)> = (0..20).map(|i| (i, i % 5 + 1)).collect();
        pairs.push((20, 10_000));
        let input = points(&pairs);

        let capped = cap_outliers(&input);
        assert_eq!(capped.len(), input.len());

        let mut sorted = input.clone();
        sorted.sort_by_key(|p| p.depth);
        let q1 = sorted[sorted.len() / 4].depth;
        let q3 = sorted[(3 * sorted.len()).div_ceil(4)].depth;
        let ceiling = (q3 as f64 + (q3 - q1) as f64 * 1.5).round() as u64;

        for (original, capped) in input.iter().zip(&capped) {
            assert!(capped.depth <= ceiling);
            assert!(capped.depth <= original.depth);
        }
    }

    #[test]
    fn test_cap_output_sorted_by_position() {
        let input = points(&[(4, 9), (0, 1), (2, 500), (1, 2), (3, 3), (5, 4)]);
        let capped = cap_outliers(&input);
        for pair in capped.windows(2) {
            assert!(pair[0].pos < pair[1].pos);
        }
    }

    #[test]
    fn test_cap_does_not_mutate_input() {
        let input = points(&[(0, 1), (1, 2), (2, 3), (3, 4), (4, 10_000), (5, 2)]);
        let snapshot = input.clone();
        let _ = cap_outliers(&input);
        assert_eq!(input, snapshot);
    }
}
