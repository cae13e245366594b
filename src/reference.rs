use std::cmp::Ordering;

use crate::types::{DensityKind, DensityPoint};
use crate::{Error, Result};

/// References with fewer than this many non-zero bins are marked sparse and
/// get seeded (rather than purely random) sampling.
pub const SPARSE_POINT_THRESHOLD: usize = 100;

/// One chromosome/contig with its index-derived density signal.
///
/// Density points are populated once at index-load time and never mutated
/// afterward; every engine operation works on copies.
#[derive(Debug, Clone)]
pub struct ReferenceSequence {
    pub name: String,
    /// Authoritative length in bp, or the index-derived fallback
    pub length: u64,
    /// Stable ordinal from the source index
    pub index: usize,
    /// Depths summed from the 16 kb leaf bins
    pub coarse_points: Vec<DensityPoint>,
    /// Depths from linear-index offset deltas
    pub linear_points: Vec<DensityPoint>,
    /// Non-zero points, recorded only for sparse references
    pub sparse_points: Option<Vec<DensityPoint>>,
}

impl ReferenceSequence {
    /// Build a validated reference. Rejects structurally corrupt input
    /// (points on a zero-length reference, out-of-order or out-of-bounds
    /// positions) since that indicates a corrupt upstream index.
    pub fn new(
        name: impl Into<String>,
        length: u64,
        index: usize,
        coarse_points: Vec<DensityPoint>,
        linear_points: Vec<DensityPoint>,
    ) -> Result<Self> {
        let name = name.into();
        validate_points(&name, length, &coarse_points)?;
        validate_points(&name, length, &linear_points)?;

        let mut reference = Self {
            name,
            length,
            index,
            coarse_points,
            linear_points,
            sparse_points: None,
        };
        reference.mark_sparse_points();
        Ok(reference)
    }

    /// Select one of the two density representations.
    pub fn points(&self, kind: DensityKind) -> &[DensityPoint] {
        match kind {
            DensityKind::Coarse => &self.coarse_points,
            DensityKind::LinearIndex => &self.linear_points,
        }
    }

    /// Record the non-zero points of a data-sparse reference so the region
    /// sampler can seed from them instead of relying on random draws alone.
    fn mark_sparse_points(&mut self) {
        let non_zero: Vec<DensityPoint> = self
            .coarse_points
            .iter()
            .filter(|p| p.depth > 0)
            .copied()
            .collect();

        if non_zero.len() < SPARSE_POINT_THRESHOLD {
            self.sparse_points = Some(non_zero);
        }
    }
}

fn validate_points(name: &str, length: u64, points: &[DensityPoint]) -> Result<()> {
    if !points.is_empty() && length == 0 {
        return Err(Error::InvalidReference(format!(
            "{}: density points on a zero-length reference",
            name
        )));
    }

    let mut prev: Option<u64> = None;
    for point in points {
        if point.pos >= length {
            return Err(Error::InvalidReference(format!(
                "{}: position {} beyond reference length {}",
                name, point.pos, length
            )));
        }
        if let Some(p) = prev {
            if point.pos <= p {
                return Err(Error::InvalidReference(format!(
                    "{}: positions not strictly ascending at {}",
                    name, point.pos
                )));
            }
        }
        prev = Some(point.pos);
    }

    Ok(())
}

/// The full set of references loaded from one file, in display order.
#[derive(Debug, Clone, Default)]
pub struct ReferenceSet {
    references: Vec<ReferenceSequence>,
}

impl ReferenceSet {
    /// Build a set, ordering references numerically (chr1, chr2, ... then
    /// X, Y, MT in their original order).
    pub fn new(mut references: Vec<ReferenceSequence>) -> Self {
        references.sort_by(|a, b| compare_reference_names(&a.name, &b.name));
        Self { references }
    }

    pub fn references(&self) -> &[ReferenceSequence] {
        &self.references
    }

    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&ReferenceSequence> {
        self.references.iter().find(|r| names_match(&r.name, name))
    }

    pub fn genome_length(&self) -> u64 {
        self.references.iter().map(|r| r.length).sum()
    }

    /// This reference's share of the total genome length, rounded to four
    /// decimals so per-reference point budgets sum to the global budget
    /// within rounding error.
    pub fn genome_percent(&self, reference: &ReferenceSequence) -> f64 {
        let total = self.genome_length();
        if total == 0 {
            return 0.0;
        }
        round_decimals(reference.length as f64 / total as f64, 4)
    }

    /// References whose length share falls within `[min_percent, max_percent]`.
    /// The front end uses this to skip tiny contigs in genome-wide views.
    pub fn references_in_range(
        &self,
        min_percent: f64,
        max_percent: f64,
    ) -> Vec<&ReferenceSequence> {
        let total = self.genome_length();
        if total == 0 {
            return Vec::new();
        }
        self.references
            .iter()
            .filter(|r| {
                let percent = r.length as f64 / total as f64;
                percent >= min_percent && percent <= max_percent
            })
            .collect()
    }
}

pub(crate) fn round_decimals(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}

/// Strip a leading `chr`/`Chr`/`CHR` prefix, if any.
pub fn strip_chr(name: &str) -> &str {
    if name.len() >= 3 && name[..3].eq_ignore_ascii_case("chr") {
        &name[3..]
    } else {
        name
    }
}

/// True when two reference names match with or without the `chr` prefix.
pub fn names_match(a: &str, b: &str) -> bool {
    a == b || strip_chr(a) == strip_chr(b)
}

/// Rewrite an external (BED) reference name to the naming convention the
/// loaded file uses, so restriction intervals from either convention match.
pub fn reconcile_name(bed_name: &str, file_name: &str) -> String {
    let file_has_chr = file_name.len() >= 3 && file_name[..3].eq_ignore_ascii_case("chr");
    let bed_has_chr = bed_name.len() >= 3 && bed_name[..3].eq_ignore_ascii_case("chr");

    match (file_has_chr, bed_has_chr) {
        (true, true) => format!("{}{}", &file_name[..3], &bed_name[3..]),
        (false, true) => bed_name[3..].to_string(),
        (true, false) => format!("{}{}", &file_name[..3], bed_name),
        (false, false) => bed_name.to_string(),
    }
}

/// Numeric names ascending first, non-numeric names (X, Y, MT, ...) after,
/// preserving input order among non-numeric names.
fn compare_reference_names(a: &str, b: &str) -> Ordering {
    let x = strip_chr(a);
    let y = strip_chr(b);
    match (parse_numeric(x), parse_numeric(y)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn parse_numeric(name: &str) -> Option<f64> {
    name.parse::<f64>().ok().filter(|v| v.is_finite())
}
