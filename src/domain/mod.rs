//! Domain types of the classification service.
//!
//! - [`labels`]: the ordered, immutable label vocabulary
//! - [`prediction`]: probability vectors and the externally visible result

pub mod labels;
pub mod prediction;

pub use labels::LabelVocabulary;
pub use prediction::{PredictionResult, ScoreVector};
