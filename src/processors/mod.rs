//! Image and score processing stages.
//!
//! - [`preprocess`] turns raw upload bytes into the fixed-shape model input
//! - [`normalization`] applies the per-channel standardization
//! - [`postprocess`] reduces logits to probabilities and picks the winner

pub mod normalization;
pub mod postprocess;
pub mod preprocess;

pub use normalization::NormalizeImage;
pub use postprocess::{argmax, softmax};
pub use preprocess::ImagePreprocessor;
