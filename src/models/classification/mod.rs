//! Image classification models.

pub mod classifier;

pub use classifier::{ClassificationModel, ClassificationModelBuilder};
