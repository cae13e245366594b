use rand::Rng;

use crate::reference::{ReferenceSequence, names_match, reconcile_name};
use crate::types::{SampleRegion, SamplingOptions};

/// Placeholder emitted when a restriction list matches nothing. Downstream
/// statistics computation receives a well-formed (if empty-yielding)
/// request instead of hanging on an empty region list.
pub const EMPTY_RESTRICTION_NAME: &str = "__empty_restriction__";

/// Select a bounded, sorted list of regions to sample for statistics.
///
/// Deterministic in structure only: random draws come from the supplied
/// `rng`, so tests seed a [`rand::rngs::StdRng`] while production draws
/// from entropy. Three regimes per reference:
///
/// - whole-reference, when `full_analysis` is set or the reference is
///   smaller than the total bin budget;
/// - seeded + random, for large references (sparse-seed regions first,
///   then uniform draws that may overlap or overrun the reference end);
/// - restriction-only, when a BED-style restriction list is present.
///
/// With more than one reference selected, `bin_count` is divided evenly
/// across references so aggregate effort stays within budget; the
/// user-facing `sampling_multiplier` then scales the per-reference draw
/// count.
pub fn sample_regions<R: Rng + ?Sized>(
    references: &[&ReferenceSequence],
    options: &SamplingOptions,
    rng: &mut R,
) -> Vec<SampleRegion> {
    if references.is_empty() {
        return Vec::new();
    }

    let per_reference = if references.len() > 1 {
        (options.bin_count as f64 / references.len() as f64).round() as u32
    } else {
        options.bin_count
    };
    let effective_bins = per_reference * options.sampling_multiplier.max(1);

    let mut regions = if let Some(restriction) = &options.region_restriction {
        let prepared = prepare_restriction(restriction, references, options);
        restricted_regions(
            &prepared,
            effective_bins * references.len() as u32,
            options.bin_size,
            rng,
        )
    } else {
        let mut regions = Vec::new();
        for reference in references {
            sample_reference(reference, options, effective_bins, &mut regions, rng);
        }
        regions
    };

    regions.sort_by(|a, b| {
        a.reference_name
            .cmp(&b.reference_name)
            .then(a.start.cmp(&b.start))
    });
    regions
}

fn sample_reference<R: Rng + ?Sized>(
    reference: &ReferenceSequence,
    options: &SamplingOptions,
    effective_bins: u32,
    regions: &mut Vec<SampleRegion>,
    rng: &mut R,
) {
    let start = options.start.unwrap_or(0);
    let end = options.end.unwrap_or(reference.length);
    let length = end.saturating_sub(start);

    if options.full_analysis || length < options.bin_size * effective_bins as u64 {
        if end > start {
            regions.push(SampleRegion::new(reference.name.clone(), start, end));
        }
        return;
    }

    // Sparse references would likely be missed by random draws alone; seed
    // with the known non-zero bins first.
    if let Some(sparse) = &reference.sparse_points {
        for point in sparse {
            regions.push(SampleRegion::new(
                reference.name.clone(),
                point.pos,
                point.pos + options.bin_size,
            ));
        }
    }

    for _ in 0..effective_bins {
        let s = start + rng.gen_range(0..length);
        regions.push(SampleRegion::new(
            reference.name.clone(),
            s,
            s + options.bin_size,
        ));
    }
}

/// Reconcile restriction-interval names against the loaded references'
/// naming convention and, for a single-reference request with an explicit
/// window, clip the restriction to that window.
fn prepare_restriction(
    restriction: &[SampleRegion],
    references: &[&ReferenceSequence],
    options: &SamplingOptions,
) -> Vec<SampleRegion> {
    let reference = references[0];

    let window = if references.len() == 1 {
        let start = options.start.unwrap_or(0);
        let end = options.end.unwrap_or(reference.length);
        Some((start, end))
    } else {
        None
    };

    let mut prepared = Vec::new();
    for interval in restriction {
        let name = reconcile_name(&interval.reference_name, &reference.name);
        match window {
            None => prepared.push(SampleRegion::new(name, interval.start, interval.end)),
            Some((start, end)) => {
                if names_match(&reference.name, &interval.reference_name)
                    && interval.start < end
                    && interval.end > start
                {
                    prepared.push(SampleRegion::new(
                        name,
                        interval.start.max(start),
                        interval.end.min(end),
                    ));
                }
            }
        }
    }
    prepared
}

/// Draw regions only from the restriction intervals: pick a random
/// interval, then greedily consume forward through same-reference
/// intervals until `bin_size` restricted bases accumulate, clipping to
/// interval boundaries.
fn restricted_regions<R: Rng + ?Sized>(
    restriction: &[SampleRegion],
    bin_count: u32,
    bin_size: u64,
    rng: &mut R,
) -> Vec<SampleRegion> {
    if restriction.is_empty() {
        return vec![SampleRegion::new(EMPTY_RESTRICTION_NAME, 1, 10)];
    }

    let mut regions = Vec::with_capacity(bin_count as usize);
    for _ in 0..bin_count {
        let mut idx = rng.gen_range(0..restriction.len());
        let first = &restriction[idx];
        let name = first.reference_name.clone();
        let new_start = first.start;
        let mut new_end = first.start;
        let mut space_left = bin_size as i64;

        while space_left > 0 {
            match restriction.get(idx) {
                Some(interval) if interval.reference_name == name => {
                    let end = (interval.start + bin_size).min(interval.end);
                    new_end = end;
                    space_left -= (end.saturating_sub(interval.start)) as i64;
                    idx += 1;
                }
                _ => break,
            }
        }

        if new_end > new_start {
            regions.push(SampleRegion::new(name, new_start, new_end));
        }
    }
    regions
}
