//! Landmark payload handling and label decoding around a single classifier call.

pub mod decoder;
pub mod labels;
pub mod landmarks;

pub use landmarks::{FeatureVector, Landmark, LandmarkPayload, FEATURE_DIM, LANDMARK_COUNT};

use crate::classifier::Classifier;
use crate::error::PredictError;
use tracing::info;

/// Classify one feature vector and decode the result.
///
/// Blocking: callers on an async runtime should run this on a blocking worker.
pub fn recognize(model: &dyn Classifier, features: &FeatureVector) -> Result<String, PredictError> {
    let output = model.predict(features.as_slice())?;
    let label = decoder::decode(output.as_ref());
    info!(prediction = %label, raw = ?output, "recognized sign");
    Ok(label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::testing::{FailingClassifier, FixedClassifier};
    use crate::classifier::ClassifierOutput;

    fn zeros() -> FeatureVector {
        FeatureVector::from_landmarks(&[Landmark { x: 0.0, y: 0.0, z: 0.0 }; LANDMARK_COUNT])
    }

    #[test]
    fn test_recognize_decodes_index() {
        let model = FixedClassifier::new(Some(ClassifierOutput::Indexed(4)));
        assert_eq!(recognize(&model, &zeros()).unwrap(), "ha");
        assert_eq!(model.calls(), 1);
    }

    #[test]
    fn test_recognize_is_idempotent() {
        let model = FixedClassifier::new(Some(ClassifierOutput::Indexed(33)));
        let first = recognize(&model, &zeros()).unwrap();
        let second = recognize(&model, &zeros()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_recognize_propagates_inference_error() {
        let err = recognize(&FailingClassifier, &zeros()).unwrap_err();
        assert!(matches!(err, PredictError::Inference(_)));
    }
}
