use super::{cap_outliers, reduce_points, simplify_rdp};
use crate::reference::{ReferenceSequence, ReferenceSet};
use crate::types::{DensityOptions, DensityPoint, DisplaySeries};

/// A capped result is only adopted above this many points; on small point
/// sets the order-statistic quartile approximation is unreliable.
const CAP_ADOPTION_MIN_POINTS: usize = 500;

/// Build a display-ready density series for one reference.
///
/// Pipeline order is fixed: outlier capping, then point reduction to the
/// `max_points` budget, then curve simplification, then terminal zero-fill
/// at the reference boundary.
pub fn estimate_reference_density(
    reference: &ReferenceSequence,
    options: &DensityOptions,
) -> DisplaySeries {
    let mut points = reference.points(options.kind).to_vec();

    if options.remove_spikes {
        let capped = cap_outliers(&points);
        if capped.len() > CAP_ADOPTION_MIN_POINTS {
            points = capped;
        }
    }

    points = reduce_to_budget(points, options.max_points);
    if let Some(epsilon) = options.rdp_epsilon {
        points = simplify_rdp(&points, epsilon);
    }

    zero_fill_tail(&mut points, reference.length);
    points
}

/// Build one genome-wide density series across all references in the set.
///
/// The global `max_points` budget is split proportionally by each
/// reference's share of the genome, each reference runs the per-reference
/// reduce/simplify/zero-fill steps against its local budget, and positions
/// are offset into one linear coordinate space. Spike suppression is a
/// whole-genome property: capping runs once over the concatenated series,
/// never per reference.
pub fn estimate_genome_density(set: &ReferenceSet, options: &DensityOptions) -> DisplaySeries {
    let mut all_points = Vec::new();
    let mut offset = 0u64;

    for reference in set.references() {
        let mut points = reference.points(options.kind).to_vec();

        if let Some(max) = options.max_points {
            let local_budget = max as f64 * set.genome_percent(reference);
            let factor = if local_budget > 0.0 {
                (points.len() as f64 / local_budget).round() as usize
            } else {
                // A reference too small to earn any budget collapses to a
                // single summed point.
                points.len().max(1)
            };
            points = reduce_points(&points, factor);
        }

        if let Some(epsilon) = options.rdp_epsilon {
            points = simplify_rdp(&points, epsilon);
        }

        zero_fill_tail(&mut points, reference.length);

        all_points.extend(
            points
                .iter()
                .map(|p| DensityPoint::new(p.pos + offset, p.depth)),
        );
        offset += reference.length;
    }

    if options.remove_spikes {
        all_points = cap_outliers(&all_points);
    }

    all_points
}

fn reduce_to_budget(points: Vec<DensityPoint>, max_points: Option<usize>) -> Vec<DensityPoint> {
    match max_points {
        Some(max) if max > 0 => {
            let factor = (points.len() as f64 / max as f64).round() as usize;
            reduce_points(&points, factor)
        }
        _ => points,
    }
}

/// Append explicit zero-depth points so every curve returns to baseline at
/// the reference boundary. Omitting this causes interpolation artifacts at
/// chromosome ends: the chart would connect the last real bin straight to
/// the next reference's first point.
fn zero_fill_tail(points: &mut DisplaySeries, length: u64) {
    if length == 0 {
        return;
    }

    match points.last().map(|p| p.pos) {
        None => {
            points.push(DensityPoint::new(0, 0));
            if length > 1 {
                points.push(DensityPoint::new(length - 1, 0));
            }
        }
        Some(last) if last + 1 < length => {
            points.push(DensityPoint::new(last + 1, 0));
            if last + 2 < length {
                points.push(DensityPoint::new(length - 1, 0));
            }
        }
        Some(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(name: &str, length: u64, pairs: &[(u64, u64)]) -> ReferenceSequence {
        let points: Vec<DensityPoint> =
            pairs.iter().map(|&(p, d)| DensityPoint::new(p, d)).collect();
        ReferenceSequence::new(name, length, 0, points.clone(), points).unwrap()
    }

    #[test]
    fn test_single_point_reference_zero_fill() {
        let r = reference("chr1", 1000, &[(0, 5)]);
        let options = DensityOptions {
            max_points: Some(10),
            ..Default::default()
        };
        let series = estimate_reference_density(&r, &options);
        assert_eq!(
            series,
            vec![
                DensityPoint::new(0, 5),
                DensityPoint::new(1, 0),
                DensityPoint::new(999, 0),
            ]
        );
    }

    #[test]
    fn test_empty_reference_still_returns_baseline() {
        let r = reference("chr1", 1000, &[]);
        let series = estimate_reference_density(&r, &DensityOptions::default());
        assert_eq!(series, vec![DensityPoint::new(0, 0), DensityPoint::new(999, 0)]);
    }

    #[test]
    fn test_no_zero_fill_when_curve_reaches_end() {
        let r = reference("chr1", 100, &[(0, 1), (99, 2)]);
        let options = DensityOptions {
            max_points: None,
            ..Default::default()
        };
        let series = estimate_reference_density(&r, &options);
        assert_eq!(series.last(), Some(&DensityPoint::new(99, 2)));
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn test_adjacent_tail_emits_single_zero() {
        let r = reference("chr1", 100, &[(0, 1), (98, 2)]);
        let options = DensityOptions {
            max_points: None,
            ..Default::default()
        };
        let series = estimate_reference_density(&r, &options);
        assert_eq!(series.last(), Some(&DensityPoint::new(99, 0)));
        assert_eq!(series.len(), 3);
    }

    #[test]
    fn test_reduction_applies_budget() {
        let pairs: Vec<(u64, u64)> = (0..1000).map(|i| (i, 1)).collect();
        let r = reference("chr1", 1000, &pairs);
        let options = DensityOptions {
            max_points: Some(100),
            ..Default::default()
        };
        let series = estimate_reference_density(&r, &options);
        // 1000 points reduced by factor 10, plus the terminal zero pair
        assert_eq!(series.len(), 100 + 2);
        assert_eq!(series[0], DensityPoint::new(0, 10));
    }

    #[test]
    fn test_small_set_skips_cap_adoption() {
        // 6 points with one spike: the capped result is far below the
        // adoption threshold, so the raw points survive.
        let r = reference("chr1", 100, &[(0, 1), (1, 1), (2, 2), (3, 1), (4, 90), (5, 1)]);
        let options = DensityOptions {
            remove_spikes: true,
            max_points: None,
            ..Default::default()
        };
        let series = estimate_reference_density(&r, &options);
        assert!(series.iter().any(|p| p.depth == 90));
    }

    #[test]
    fn test_genome_series_offsets_positions() {
        let set = ReferenceSet::new(vec![
            reference("1", 1000, &[(0, 5), (999, 1)]),
            reference("2", 500, &[(0, 7)]),
        ]);
        let options = DensityOptions {
            max_points: None,
            ..Default::default()
        };
        let series = estimate_genome_density(&set, &options);

        // Positions strictly ascending through the concatenation
        for pair in series.windows(2) {
            assert!(pair[0].pos < pair[1].pos);
        }
        // Second reference's first point offset by the first's length
        assert!(series.contains(&DensityPoint::new(1000, 7)));
        // Its terminal zero sits at the end of the global space
        assert_eq!(series.last(), Some(&DensityPoint::new(1000 + 499, 0)));
    }

    #[test]
    fn test_genome_budget_split_is_proportional() {
        let pairs_a: Vec<(u64, u64)> = (0..800).map(|i| (i, 1)).collect();
        let pairs_b: Vec<(u64, u64)> = (0..200).map(|i| (i, 1)).collect();
        let set = ReferenceSet::new(vec![
            reference("1", 8000, &pairs_a),
            reference("2", 2000, &pairs_b),
        ]);
        let options = DensityOptions {
            max_points: Some(100),
            ..Default::default()
        };
        let series = estimate_genome_density(&set, &options);

        // ref 1: 800 points / budget 80 -> factor 10 -> 80 points (+2 fill)
        // ref 2: 200 points / budget 20 -> factor 10 -> 20 points (+2 fill)
        assert_eq!(series.len(), 80 + 2 + 20 + 2);
    }
}
