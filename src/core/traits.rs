//! Traits defining the seams of the classification pipeline.

use crate::core::{ClassifierError, Tensor2D, Tensor4D};
use std::fmt::Debug;

/// Trait for inference engine operations.
///
/// An engine evaluates a frozen classifier: it maps a normalized input batch
/// to raw, unnormalized per-class scores. Implementations must be read-only
/// with respect to the model weights, so a single engine can be shared by
/// every request in the process.
pub trait InferenceEngine: Send + Sync + Debug {
    /// Runs a forward pass and returns logits shaped `(batch, num_classes)`.
    fn infer(&self, input: &Tensor4D) -> Result<Tensor2D, ClassifierError>;

    /// Human-readable description of the engine (model name, backend).
    fn engine_info(&self) -> String;

    /// Input shape the engine accepts, when it is statically known.
    ///
    /// Returning `None` defers to the pipeline's fixed input shape.
    fn expected_input_shape(&self) -> Option<Vec<usize>> {
        None
    }
}
