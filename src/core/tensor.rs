//! Tensor aliases shared by the preprocessing and inference stages.

/// 2-dimensional tensor (batch x classes).
pub type Tensor2D = ndarray::Array2<f32>;

/// 4-dimensional tensor (batch x channels x height x width).
pub type Tensor4D = ndarray::Array4<f32>;
