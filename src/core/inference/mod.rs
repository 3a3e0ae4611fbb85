//! ONNX Runtime inference engine.
//!
//! [`OrtInfer`] owns a small pool of runtime sessions created from one model
//! file. Each session sits behind its own mutex, so a forward pass never
//! shares a session with another concurrent request.

pub mod ort_infer;

pub use ort_infer::OrtInfer;
