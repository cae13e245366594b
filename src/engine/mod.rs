//! Data-reduction and sampling engine.
//!
//! Everything in this module is a synchronous, pure function over in-memory
//! point arrays: no I/O, no shared mutable state, inputs never mutated. The
//! UI layer may call these many times in quick succession (brush drags,
//! reference switches); each call fully replaces the previous result.
//!
//! # Components
//!
//! - [`reduce_points`] - windowed aggregation to a display point budget
//! - [`cap_outliers`] - IQR-based ceiling on extreme bins
//! - [`simplify_rdp`] - perpendicular-distance polyline reduction
//! - [`estimate_reference_density`] / [`estimate_genome_density`] - the
//!   composed density pipelines
//! - [`sample_regions`] - bounded region selection for statistics sampling

mod cap;
mod density;
mod reduce;
mod sample;
mod simplify;

pub use cap::cap_outliers;
pub use density::{estimate_genome_density, estimate_reference_density};
pub use reduce::reduce_points;
pub use sample::{EMPTY_RESTRICTION_NAME, sample_regions};
pub use simplify::simplify_rdp;
