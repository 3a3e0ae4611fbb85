//! Probability vectors and the prediction result built from them.

use super::labels::LabelVocabulary;
use crate::core::{ClassifierError, ClassifierResult};
use crate::processors::postprocess::{argmax, softmax};
use serde::{Deserialize, Serialize};

/// Probability distribution over the label vocabulary.
///
/// Entries are in `[0, 1]` and sum to one up to floating-point tolerance.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreVector(Vec<f32>);

impl ScoreVector {
    /// Wraps values that are already probabilities.
    pub fn from_probabilities(probabilities: Vec<f32>) -> Self {
        Self(probabilities)
    }

    /// Applies softmax to raw logits.
    pub fn from_logits(logits: &[f32]) -> Self {
        Self(softmax(logits))
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The externally visible outcome of classifying one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub predicted_class: String,
    pub confidence_score: f32,
}

impl PredictionResult {
    /// Selects the most probable label.
    ///
    /// Ties resolve to the lowest index.
    ///
    /// # Errors
    ///
    /// * [`ClassifierError::VocabularyMismatch`] if the lengths differ.
    /// * [`ClassifierError::Inference`] if no entry is a number.
    pub fn build(scores: &ScoreVector, vocabulary: &LabelVocabulary) -> ClassifierResult<Self> {
        if scores.len() != vocabulary.len() {
            return Err(ClassifierError::VocabularyMismatch {
                scores: scores.len(),
                labels: vocabulary.len(),
            });
        }

        let idx = argmax(scores.as_slice()).ok_or_else(|| {
            ClassifierError::invalid_output("prediction", "score vector has no numeric maximum")
        })?;

        // Lengths were checked above, so the index is always in range.
        let label = vocabulary.get(idx).ok_or(ClassifierError::VocabularyMismatch {
            scores: scores.len(),
            labels: vocabulary.len(),
        })?;

        Ok(Self {
            predicted_class: label.to_string(),
            confidence_score: scores.as_slice()[idx],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ErrorKind;

    fn vocab(labels: &[&str]) -> LabelVocabulary {
        LabelVocabulary::new(labels.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    #[test]
    fn test_build_selects_highest_probability() {
        let scores = ScoreVector::from_probabilities(vec![0.1, 0.7, 0.2]);
        let result = PredictionResult::build(&scores, &vocab(&["cat", "dog", "bird"])).unwrap();
        assert_eq!(
            result,
            PredictionResult {
                predicted_class: "dog".to_string(),
                confidence_score: 0.7,
            }
        );
    }

    #[test]
    fn test_build_tie_breaks_to_lowest_index() {
        let scores = ScoreVector::from_probabilities(vec![0.5, 0.5]);
        let labels = vocab(&["a", "b"]);
        for _ in 0..100 {
            let result = PredictionResult::build(&scores, &labels).unwrap();
            assert_eq!(result.predicted_class, "a");
            assert_eq!(result.confidence_score, 0.5);
        }
    }

    #[test]
    fn test_build_rejects_length_mismatch() {
        let scores = ScoreVector::from_probabilities(vec![0.2, 0.3, 0.5]);
        let err = PredictionResult::build(&scores, &vocab(&["a", "b"])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::VocabularyMismatch);
        assert!(matches!(
            err,
            ClassifierError::VocabularyMismatch {
                scores: 3,
                labels: 2
            }
        ));
    }

    #[test]
    fn test_from_logits_is_a_distribution() {
        let scores = ScoreVector::from_logits(&[1.0, 4.0, -2.0]);
        let sum: f32 = scores.as_slice().iter().sum();
        assert!((sum - 1.0).abs() < 1e-4);
        let result = PredictionResult::build(&scores, &vocab(&["x", "y", "z"])).unwrap();
        assert_eq!(result.predicted_class, "y");
        assert!(result.confidence_score > 0.9);
    }

    #[test]
    fn test_serializes_exactly_two_fields() {
        let result = PredictionResult {
            predicted_class: "golden retriever".to_string(),
            confidence_score: 0.5,
        };
        let value = serde_json::to_value(&result).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert_eq!(object["predicted_class"], "golden retriever");
        assert_eq!(object["confidence_score"], 0.5);
    }
}
