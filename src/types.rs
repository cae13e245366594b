use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One density sample: a bin position (bp) and the raw depth recorded for
/// that bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DensityPoint {
    pub pos: u64,
    pub depth: u64,
}

impl DensityPoint {
    pub fn new(pos: u64, depth: u64) -> Self {
        Self { pos, depth }
    }
}

/// A display-ready, bounded-size density series.
pub type DisplaySeries = Vec<DensityPoint>;

/// The two parallel density representations derived from a file index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DensityKind {
    /// Depths summed from the chunk byte spans of the 16 kb leaf bins
    #[default]
    Coarse,
    /// Depths from compressed-offset deltas of the linear index windows
    LinearIndex,
}

/// One genomic interval selected for statistics sampling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleRegion {
    #[serde(rename = "referenceName")]
    pub reference_name: String,
    pub start: u64,
    pub end: u64,
}

impl SampleRegion {
    pub fn new(reference_name: impl Into<String>, start: u64, end: u64) -> Self {
        Self {
            reference_name: reference_name.into(),
            start,
            end,
        }
    }
}

/// Configuration consumed by the region sampler.
#[derive(Debug, Clone)]
pub struct SamplingOptions {
    /// Width of one sampled bin in base pairs
    pub bin_size: u64,
    /// Number of random bins to draw per statistics request
    pub bin_count: u32,
    /// User-triggered "sample more" scaling of the random draw count
    pub sampling_multiplier: u32,
    /// Restrict sampling to a sub-region of a single reference
    pub start: Option<u64>,
    pub end: Option<u64>,
    /// Sample every reference in full regardless of size
    pub full_analysis: bool,
    /// BED-style external constraint; when present, regions are drawn only
    /// from these intervals
    pub region_restriction: Option<Vec<SampleRegion>>,
}

impl Default for SamplingOptions {
    fn default() -> Self {
        Self {
            bin_size: 80_000,
            bin_count: 50,
            sampling_multiplier: 1,
            start: None,
            end: None,
            full_analysis: false,
            region_restriction: None,
        }
    }
}

/// Configuration consumed by the density estimator.
#[derive(Debug, Clone)]
pub struct DensityOptions {
    pub kind: DensityKind,
    /// Apply the IQR ceiling to suppress extreme bins
    pub remove_spikes: bool,
    /// Target display point budget; `None` skips reduction
    pub max_points: Option<usize>,
    /// Curve-simplification tolerance; `None` skips simplification
    pub rdp_epsilon: Option<f64>,
}

impl Default for DensityOptions {
    fn default() -> Self {
        Self {
            kind: DensityKind::Coarse,
            remove_spikes: false,
            max_points: Some(5_000),
            rdp_epsilon: None,
        }
    }
}

/// Request handed to the external statistics backend: the sampled regions
/// plus the reference and sample names the backend needs to scope its scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsRequest {
    #[serde(rename = "refNames")]
    pub reference_names: Vec<String>,
    pub regions: Vec<SampleRegion>,
    #[serde(rename = "sampleNames", default, skip_serializing_if = "Vec::is_empty")]
    pub sample_names: Vec<String>,
}

/// Fixed-shape result returned by the statistics backend. Field names match
/// the backend's JSON exactly; this crate renders none of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantStats {
    #[serde(rename = "TotalRecords")]
    pub total_records: u64,
    #[serde(rename = "TsTvRatio")]
    pub ts_tv_ratio: Option<f64>,
    pub var_type: BTreeMap<String, u64>,
    pub af_hist: AlleleFrequencyHistogram,
    pub mut_spec: BTreeMap<String, Vec<u64>>,
    pub qual_dist: QualityDistribution,
    pub indel_size: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlleleFrequencyHistogram {
    #[serde(rename = "afHistBins")]
    pub bins: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityDistribution {
    #[serde(rename = "regularBins")]
    pub bins: BTreeMap<String, u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_region_serializes_camel_case() {
        let region = SampleRegion::new("chr1", 100, 200);
        let json = serde_json::to_value(&region).unwrap();
        assert_eq!(json["referenceName"], "chr1");
        assert_eq!(json["start"], 100);
        assert_eq!(json["end"], 200);
    }

    #[test]
    fn test_variant_stats_round_trip() {
        let raw = r#"{
            "TotalRecords": 1234,
            "TsTvRatio": 2.1,
            "var_type": {"SNP": 1000, "INS": 120, "DEL": 114},
            "af_hist": {"afHistBins": {"0": 10, "50": 4}},
            "mut_spec": {"A": [0, 2, 3], "C": [1, 0, 5]},
            "qual_dist": {"regularBins": {"10": 7, "20": 42}},
            "indel_size": {"-3": 2, "4": 9}
        }"#;
        let stats: VariantStats = serde_json::from_str(raw).unwrap();
        assert_eq!(stats.total_records, 1234);
        assert_eq!(stats.ts_tv_ratio, Some(2.1));
        assert_eq!(stats.var_type["SNP"], 1000);
        assert_eq!(stats.af_hist.bins["0"], 10);
        assert_eq!(stats.qual_dist.bins["20"], 42);
        assert_eq!(stats.indel_size["-3"], 2);
    }

    #[test]
    fn test_variant_stats_missing_ratio() {
        let raw = r#"{
            "TotalRecords": 0,
            "TsTvRatio": null,
            "var_type": {},
            "af_hist": {"afHistBins": {}},
            "mut_spec": {},
            "qual_dist": {"regularBins": {}},
            "indel_size": {}
        }"#;
        let stats: VariantStats = serde_json::from_str(raw).unwrap();
        assert_eq!(stats.ts_tv_ratio, None);
    }
}
