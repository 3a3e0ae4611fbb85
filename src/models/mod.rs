//! Model wrappers.
//!
//! A model wrapper owns an inference engine and turns its raw output into a
//! domain value. It never touches image bytes or labels.

pub mod classification;

pub use classification::{ClassificationModel, ClassificationModelBuilder};
