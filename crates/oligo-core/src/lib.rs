pub mod enzyme;
pub mod operations;
pub mod pattern;
pub mod range;
pub mod search;
pub mod sequence;

pub use enzyme::RestrictionEnzyme;
pub use pattern::DnaPattern;
pub use range::ClosedRange;
pub use sequence::*;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid sequence: {0}")]
    InvalidSequence(String),
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
    #[error("Invalid restriction enzyme: {0}")]
    InvalidEnzyme(String),
    #[error("Position out of range: {0}")]
    OutOfRange(String),
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}
