//! The classification pipeline.
//!
//! [`ClassificationPipeline`] is the single pure core:
//! raw bytes → tensor → probabilities → labeled result.
//! [`RecordingPipeline`] decorates it with optional persistence and runs the
//! blocking core off the async executor.

pub mod classification;
pub mod recording;

pub use classification::ClassificationPipeline;
pub use recording::RecordingPipeline;
