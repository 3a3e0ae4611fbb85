//! End-to-end check against a real ResNet-50 export.
//!
//! ```bash
//! IMGCLS_MODEL_PATH=models/resnet50.onnx \
//! IMGCLS_LABELS_PATH=models/imagenet_classes.txt \
//! IMGCLS_SAMPLE_IMAGE=samples/golden_retriever.jpg \
//! cargo test --test real_model_test -- --ignored
//! ```

use imgcls::domain::LabelVocabulary;
use imgcls::models::ClassificationModelBuilder;
use imgcls::pipeline::ClassificationPipeline;
use std::path::PathBuf;

/// ImageNet class indices 151..=268 are dog breeds.
const DOG_CLASSES: std::ops::RangeInclusive<usize> = 151..=268;

fn env_path(name: &str) -> PathBuf {
    PathBuf::from(std::env::var(name).unwrap_or_else(|_| panic!("{name} must be set")))
}

#[test]
#[ignore = "requires a ResNet-50 ONNX export and a sample image"]
fn test_golden_retriever_is_classified_as_a_dog() {
    let model = ClassificationModelBuilder::new()
        .build(&env_path("IMGCLS_MODEL_PATH"))
        .unwrap();
    let vocabulary = LabelVocabulary::from_file(&env_path("IMGCLS_LABELS_PATH")).unwrap();
    assert_eq!(vocabulary.len(), 1000);
    let pipeline = ClassificationPipeline::new(model, vocabulary);

    let bytes = std::fs::read(env_path("IMGCLS_SAMPLE_IMAGE")).unwrap();
    let result = pipeline.classify_bytes(&bytes).unwrap();
    assert!(result.confidence_score > 0.0);

    let index = pipeline
        .vocabulary()
        .iter()
        .position(|label| label == result.predicted_class)
        .unwrap();
    assert!(
        DOG_CLASSES.contains(&index),
        "expected a dog breed, got '{}' (index {index})",
        result.predicted_class
    );

    let again = pipeline.classify_bytes(&bytes).unwrap();
    assert_eq!(again, result);
}
