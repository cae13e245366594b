use crate::types::DensityPoint;

/// Aggregate `points` into consecutive windows of `factor` points.
///
/// Each output point takes the position of its window's first point and the
/// sum of the window's depths. This is sum-aggregation, not averaging;
/// callers that want a mean divide by `factor` themselves. A `factor` of 0
/// or 1 returns the input unchanged. A final partial window still
/// contributes one point, so the output length is `ceil(len / factor)`.
pub fn reduce_points(points: &[DensityPoint], factor: usize) -> Vec<DensityPoint> {
    if factor <= 1 {
        return points.to_vec();
    }

    let mut results = Vec::with_capacity(points.len().div_ceil(factor));
    for window in points.chunks(factor) {
        let sum: u64 = window.iter().map(|p| p.depth).sum();
        results.push(DensityPoint::new(window[0].pos, sum));
    }
    results
}
