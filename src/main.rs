use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vcfsumr::{
    Config,
    bed::read_restriction_bed,
    engine::{estimate_genome_density, estimate_reference_density, sample_regions},
    index::TabixDensityReader,
    reference::{ReferenceSequence, ReferenceSet},
    stats::build_stats_request,
};

/// Genome-wide views skip contigs below this share of the total length.
const MIN_REFERENCE_PERCENT: f64 = 0.005;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config = Config::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let index_path = config.effective_index_path();
    tracing::info!("Reading tabix index {:?}", index_path);

    let set = TabixDensityReader::load_with_header(&config.vcf, &index_path).await?;
    tracing::info!(
        "Loaded {} references, genome length {}",
        set.len(),
        set.genome_length()
    );

    // Small files are cheap enough to sample exhaustively
    let file_size = tokio::fs::metadata(&config.vcf).await?.len();
    if file_size < config.min_sampling_size {
        tracing::info!("File below sampling threshold, forcing full analysis");
        config.full_analysis = true;
    }

    let restriction = match &config.bed {
        Some(path) => {
            let regions = read_restriction_bed(path)?;
            tracing::info!("Loaded {} restriction intervals from {:?}", regions.len(), path);
            Some(regions)
        }
        None => None,
    };

    let references = select_references(&set, config.reference.as_deref())?;

    let density_options = config.density_options();
    let density = if config.reference.is_some() {
        estimate_reference_density(references[0], &density_options)
    } else {
        estimate_genome_density(&set, &density_options)
    };

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let sampling_options = config.sampling_options(restriction);
    let regions = sample_regions(&references, &sampling_options, &mut rng);
    tracing::info!("Sampled {} regions", regions.len());

    let stats_request = build_stats_request(&references, regions, Vec::new());

    let summary = json!({
        "references": set.references().iter().map(|r| json!({
            "name": r.name,
            "length": r.length,
            "points": r.coarse_points.len(),
            "sparse": r.sparse_points.is_some(),
        })).collect::<Vec<_>>(),
        "density": density,
        "statsRequest": stats_request,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}

fn select_references<'a>(
    set: &'a ReferenceSet,
    name: Option<&str>,
) -> anyhow::Result<Vec<&'a ReferenceSequence>> {
    match name {
        Some(name) => {
            let reference = set
                .get(name)
                .ok_or_else(|| anyhow::anyhow!("reference not found: {}", name))?;
            Ok(vec![reference])
        }
        None => Ok(set.references_in_range(MIN_REFERENCE_PERCENT, 1.0)),
    }
}
