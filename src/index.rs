//! Tabix-index density loader.
//!
//! A tabix index already encodes a coarse picture of where a compressed
//! VCF's records live: every 16 kb window of a reference maps to a span of
//! compressed bytes. Those byte spans are a cheap proxy for variant
//! density, which is what makes a multi-gigabyte file summarizable in
//! seconds without a linear scan.
//!
//! Two parallel representations are derived per reference:
//!
//! - **coarse**: one point per 16 kb leaf bin of the binning index, depth =
//!   summed compressed byte span of the bin's chunks;
//! - **linear-index**: one point per 16 kb linear-index window, depth =
//!   compressed byte delta between consecutive window offsets.

use std::collections::HashMap;
use std::path::Path;

use noodles::bgzf;
use noodles::csi::BinningIndex;
use noodles::csi::binning_index::index::ReferenceSequence as IndexReferenceSequence;
use noodles::csi::binning_index::index::reference_sequence::index::LinearIndex;
use noodles::tabix;
use noodles::vcf;
use tokio::fs::File;

use crate::reference::{ReferenceSequence, ReferenceSet, names_match};
use crate::types::DensityPoint;
use crate::{Error, Result};

/// Resolution of one density bin: the 16 kb window of the tabix linear
/// index.
pub const BIN_SIZE_BP: u64 = 1 << 14;

/// Bin ids of the 16 kb leaf level of the tabix binning scheme
/// (min shift 14, depth 5).
const LEAF_BIN_FIRST: usize = 4681;
const LEAF_BIN_LAST: usize = 37448;

pub struct TabixDensityReader;

impl TabixDensityReader {
    /// Read a tabix index and build a [`ReferenceSet`] with both density
    /// representations for every reference the index names.
    ///
    /// `contig_lengths` supplies authoritative lengths (usually from the
    /// VCF header); the fallback is the span covered by the linear index.
    /// References with no density points are kept, so downstream
    /// "select all references" logic stays well-defined.
    pub async fn load(
        index_path: &Path,
        contig_lengths: &HashMap<String, u64>,
    ) -> Result<ReferenceSet> {
        let index = tabix::r#async::read(index_path)
            .await
            .map_err(|e| Error::Internal(format!("failed to read tabix index: {}", e)))?;

        let header = index
            .header()
            .ok_or_else(|| Error::Internal("tabix index has no header".to_string()))?;

        let mut references = Vec::new();
        for (i, raw_name) in header.reference_sequence_names().iter().enumerate() {
            let name = String::from_utf8_lossy(raw_name.as_ref()).into_owned();

            let reference_sequence = index.reference_sequences().get(i).ok_or_else(|| {
                Error::InvalidReference(format!("index has no reference sequence for {}", name))
            })?;

            let coarse_points = leaf_bin_points(reference_sequence);
            let linear_points = linear_index_points(reference_sequence.index());

            let fallback_length = reference_sequence.index().len() as u64 * BIN_SIZE_BP;
            let length = lookup_length(contig_lengths, &name).unwrap_or(fallback_length);

            references.push(ReferenceSequence::new(
                name,
                length,
                i,
                coarse_points,
                linear_points,
            )?);
        }

        tracing::debug!("loaded {} references from tabix index", references.len());
        Ok(ReferenceSet::new(references))
    }

    /// Load the index, pulling authoritative lengths from the VCF header's
    /// `##contig` records when the data file is readable.
    pub async fn load_with_header(vcf_path: &Path, index_path: &Path) -> Result<ReferenceSet> {
        let contig_lengths = match Self::read_contig_lengths(vcf_path).await {
            Ok(lengths) => lengths,
            Err(e) => {
                tracing::warn!("using index-derived reference lengths: {}", e);
                HashMap::new()
            }
        };
        Self::load(index_path, &contig_lengths).await
    }

    /// Read contig `ID`/`length` pairs from the VCF header.
    pub async fn read_contig_lengths(vcf_path: &Path) -> Result<HashMap<String, u64>> {
        let file = File::open(vcf_path)
            .await
            .map_err(|e| Error::Internal(format!("failed to open VCF file: {}", e)))?;

        let mut reader = vcf::r#async::io::Reader::new(bgzf::r#async::Reader::new(file));
        let header = reader
            .read_header()
            .await
            .map_err(|e| Error::Internal(format!("failed to read VCF header: {}", e)))?;

        let mut lengths = HashMap::new();
        for (name, contig) in header.contigs() {
            if let Some(length) = contig.length() {
                lengths.insert(name.to_string(), length as u64);
            }
        }
        Ok(lengths)
    }
}

fn lookup_length(contig_lengths: &HashMap<String, u64>, name: &str) -> Option<u64> {
    contig_lengths.get(name).copied().or_else(|| {
        contig_lengths
            .iter()
            .find(|(contig, _)| names_match(contig, name))
            .map(|(_, length)| *length)
    })
}

/// One point per 16 kb leaf bin: depth is the compressed byte span of the
/// bin's chunks, summed.
fn leaf_bin_points(reference_sequence: &IndexReferenceSequence<LinearIndex>) -> Vec<DensityPoint> {
    let mut points: Vec<DensityPoint> = reference_sequence
        .bins()
        .iter()
        .filter(|(id, _)| (LEAF_BIN_FIRST..=LEAF_BIN_LAST).contains(*id))
        .map(|(id, bin)| {
            let depth: u64 = bin
                .chunks()
                .iter()
                .map(|chunk| {
                    chunk
                        .end()
                        .compressed()
                        .saturating_sub(chunk.start().compressed())
                })
                .sum();
            DensityPoint::new((id - LEAF_BIN_FIRST) as u64 * BIN_SIZE_BP, depth)
        })
        .collect();

    points.sort_by_key(|p| p.pos);
    points
}

/// One point per linear-index window: depth is the compressed byte delta
/// between consecutive window offsets. The trailing window has no
/// successor offset, so a reference with `n` entries yields `n - 1`
/// points; the display pipeline's terminal zero-fill covers the tail.
fn linear_index_points(offsets: &[bgzf::VirtualPosition]) -> Vec<DensityPoint> {
    offsets
        .windows(2)
        .enumerate()
        .map(|(i, pair)| {
            let depth = pair[1].compressed().saturating_sub(pair[0].compressed());
            DensityPoint::new(i as u64 * BIN_SIZE_BP, depth)
        })
        .collect()
}
