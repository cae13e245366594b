//! Statistics backend abstraction.
//!
//! Exact statistics over the sampled regions are computed externally (the
//! backend streams the regions through a tabix query and aggregates the
//! matching records). This crate only assembles the request from its
//! sampled regions and consumes the backend's fixed-shape result; the
//! operation is asynchronous and cancelable at the caller's discretion.

use async_trait::async_trait;

use crate::Result;
use crate::reference::ReferenceSequence;
use crate::types::{SampleRegion, StatsRequest, VariantStats};

/// Backend that computes sampled variant statistics for a region list.
#[async_trait]
pub trait StatsService: Send + Sync {
    async fn variant_stats(&self, request: &StatsRequest) -> Result<VariantStats>;
}

/// Assemble the backend request for a set of sampled regions.
pub fn build_stats_request(
    references: &[&ReferenceSequence],
    regions: Vec<SampleRegion>,
    sample_names: Vec<String>,
) -> StatsRequest {
    StatsRequest {
        reference_names: references.iter().map(|r| r.name.clone()).collect(),
        regions,
        sample_names,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DensityPoint;

    #[test]
    fn test_build_stats_request() {
        let a = ReferenceSequence::new("chr1", 1000, 0, vec![DensityPoint::new(0, 1)], vec![])
            .unwrap();
        let b = ReferenceSequence::new("chr2", 500, 1, vec![], vec![]).unwrap();

        let regions = vec![SampleRegion::new("chr1", 0, 100)];
        let request = build_stats_request(&[&a, &b], regions.clone(), vec!["s1".to_string()]);

        assert_eq!(request.reference_names, ["chr1", "chr2"]);
        assert_eq!(request.regions, regions);
        assert_eq!(request.sample_names, ["s1"]);
    }
}
