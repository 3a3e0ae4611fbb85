use super::*;
use ndarray::ArrayView2;
use ort::value::TensorRef;

impl OrtInfer {
    fn run_inference_with_processor<T>(
        &self,
        x: &Tensor4D,
        processor: impl FnOnce(&[i64], &[f32]) -> Result<T, ClassifierError>,
    ) -> Result<T, ClassifierError> {
        let input_shape = x.shape().to_vec();

        let input_tensor = TensorRef::from_array_view(x.view()).map_err(|e| {
            ClassifierError::inference_error(
                &self.model_name,
                &format!("failed to convert input tensor with shape {input_shape:?}"),
                e,
            )
        })?;

        let inputs = ort::inputs![self.input_name.as_str() => input_tensor];

        let idx = self
            .next_idx
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed)
            % self.sessions.len();
        let mut session_guard = self.sessions[idx].lock().map_err(|_| {
            ClassifierError::invalid_output(
                &self.model_name,
                format!(
                    "failed to acquire session lock for session {}/{}",
                    idx,
                    self.sessions.len()
                ),
            )
        })?;

        let outputs = session_guard.run(inputs).map_err(|e| {
            ClassifierError::inference_error(
                &self.model_name,
                &format!(
                    "forward pass failed with input '{}' -> output '{}'",
                    self.input_name, self.output_name
                ),
                e,
            )
        })?;

        let (output_shape, output_data) = outputs[self.output_name.as_str()]
            .try_extract_tensor::<f32>()
            .map_err(|e| {
                ClassifierError::inference_error(
                    &self.model_name,
                    &format!("failed to extract output tensor '{}' as f32", self.output_name),
                    e,
                )
            })?;

        processor(&output_shape[..], output_data)
    }

    /// Runs a forward pass expecting `(batch, num_classes)` logits.
    pub fn infer_2d(&self, x: &Tensor4D) -> Result<Tensor2D, ClassifierError> {
        let batch_size = x.shape()[0];
        let input_shape = x.shape().to_vec();
        self.run_inference_with_processor(x, |output_shape, output_data| {
            if output_shape.len() != 2 {
                return Err(ClassifierError::invalid_output(
                    &self.model_name,
                    format!(
                        "expected 2D logits for input shape {input_shape:?}, got shape {output_shape:?}"
                    ),
                ));
            }

            let num_classes = output_shape[1] as usize;
            let expected_len = batch_size * num_classes;

            if output_data.len() != expected_len {
                return Err(ClassifierError::invalid_output(
                    &self.model_name,
                    format!(
                        "output data size mismatch: expected {}, got {}",
                        expected_len,
                        output_data.len()
                    ),
                ));
            }

            let array_view = ArrayView2::from_shape((batch_size, num_classes), output_data)?;
            Ok(array_view.to_owned())
        })
    }
}
