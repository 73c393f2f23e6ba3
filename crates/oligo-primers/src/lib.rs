//! PCR primer-pair search over a DNA target.
//!
//! [`finder::PrimerPairFinder`] enumerates candidate primers on both strands
//! of a region, filters them on length, melting temperature, uniqueness and
//! 3' terminal pattern, then pairs forward and reverse candidates into
//! amplicons of an acceptable size.

pub mod finder;
pub mod params;
pub mod primer;
pub mod progress;
pub mod thermo;

pub use finder::{PrimerPairFinder, SearchOutcome, SearchStatus};
pub use params::SearchParameters;
pub use primer::{Primer, PrimerFactory, PrimerPair, PrimerSite};
pub use progress::{CancellationToken, Progress, ProgressSink};

use oligo_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrimerError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Invalid search parameters: {0}")]
    InvalidParameters(String),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}
