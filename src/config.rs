use clap::Parser;
use std::path::PathBuf;

use crate::types::{DensityKind, DensityOptions, SampleRegion, SamplingOptions};

#[derive(Debug, Clone, Parser)]
#[command(name = "vcfsumr")]
#[command(about = "sampling-based summary of a compressed, indexed VCF file")]
pub struct Config {
    /// Path to the bgzip-compressed VCF file
    pub vcf: PathBuf,

    /// Path to the tabix index (defaults to <vcf>.tbi)
    #[arg(long, env = "VCFSUMR_INDEX")]
    pub index: Option<PathBuf>,

    /// BED file restricting where sampling may occur
    #[arg(long, env = "VCFSUMR_BED")]
    pub bed: Option<PathBuf>,

    /// Reference to summarize; genome-wide when omitted
    #[arg(short, long)]
    pub reference: Option<String>,

    /// Start of a sub-region restriction within --reference
    #[arg(long)]
    pub start: Option<u64>,

    /// End of a sub-region restriction within --reference
    #[arg(long)]
    pub end: Option<u64>,

    /// Width of one sampled bin in base pairs
    #[arg(long, env = "VCFSUMR_BIN_SIZE", default_value = "80000")]
    pub bin_size: u64,

    /// Number of random bins per statistics request
    #[arg(long, env = "VCFSUMR_BIN_COUNT", default_value = "50")]
    pub bin_count: u32,

    /// "Sample more" multiplier for the random draw count
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..=4))]
    pub sampling_multiplier: u32,

    /// Sample every reference in full regardless of size
    #[arg(long)]
    pub full_analysis: bool,

    /// Files smaller than this many bytes are always sampled in full
    #[arg(long, env = "VCFSUMR_MIN_SAMPLING_SIZE", default_value = "1000000")]
    pub min_sampling_size: u64,

    /// Display point budget for density curves
    #[arg(long, default_value = "5000")]
    pub max_points: usize,

    /// Curve-simplification tolerance; disabled when omitted
    #[arg(long)]
    pub rdp_epsilon: Option<f64>,

    /// Cap density spikes with the IQR ceiling
    #[arg(long)]
    pub remove_spikes: bool,

    /// Use the linear-index density representation instead of the coarse
    /// bin-based one
    #[arg(long)]
    pub linear_index: bool,

    /// Seed for region sampling; drawn from entropy when omitted
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

impl Config {
    pub fn effective_index_path(&self) -> PathBuf {
        self.index.clone().unwrap_or_else(|| {
            let mut path = self.vcf.as_os_str().to_os_string();
            path.push(".tbi");
            PathBuf::from(path)
        })
    }

    pub fn density_options(&self) -> DensityOptions {
        DensityOptions {
            kind: if self.linear_index {
                DensityKind::LinearIndex
            } else {
                DensityKind::Coarse
            },
            remove_spikes: self.remove_spikes,
            max_points: Some(self.max_points),
            rdp_epsilon: self.rdp_epsilon,
        }
    }

    pub fn sampling_options(&self, restriction: Option<Vec<SampleRegion>>) -> SamplingOptions {
        SamplingOptions {
            bin_size: self.bin_size,
            bin_count: self.bin_count,
            sampling_multiplier: self.sampling_multiplier,
            start: self.start,
            end: self.end,
            full_analysis: self.full_analysis,
            region_restriction: restriction,
        }
    }
}
