//! Pre-trained sign classifier: artifact loading and evaluation.

pub mod artifact;
pub mod svm;

pub use artifact::{load_model, ClassSet, Estimator, ModelArtifact, SignModel};

use crate::error::InferenceError;
use serde::Serialize;
use std::fmt;

/// One prediction as emitted by a model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ClassifierOutput {
    /// Class index into the label table.
    Indexed(i64),
    /// Label the model was trained with directly.
    Labeled(String),
}

impl fmt::Display for ClassifierOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Indexed(i) => write!(f, "{i}"),
            Self::Labeled(s) => f.write_str(s),
        }
    }
}

/// A model that maps one feature vector to at most one class.
pub trait Classifier: Send + Sync {
    /// Feature count the model was trained on.
    fn n_features(&self) -> usize;

    /// Predict a single sample. `Ok(None)` means the model produced no output.
    fn predict(&self, features: &[f64]) -> Result<Option<ClassifierOutput>, InferenceError>;
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Always returns the same output and counts calls.
    pub struct FixedClassifier {
        output: Option<ClassifierOutput>,
        calls: AtomicUsize,
    }

    impl FixedClassifier {
        pub fn new(output: Option<ClassifierOutput>) -> Self {
            Self {
                output,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Classifier for FixedClassifier {
        fn n_features(&self) -> usize {
            crate::recognition::FEATURE_DIM
        }

        fn predict(&self, _features: &[f64]) -> Result<Option<ClassifierOutput>, InferenceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.output.clone())
        }
    }

    /// Fails every call with a shape mismatch.
    pub struct FailingClassifier;

    impl Classifier for FailingClassifier {
        fn n_features(&self) -> usize {
            64
        }

        fn predict(&self, features: &[f64]) -> Result<Option<ClassifierOutput>, InferenceError> {
            Err(InferenceError::ShapeMismatch {
                expected: 64,
                actual: features.len(),
            })
        }
    }

    /// Panics on every call.
    pub struct PanickingClassifier;

    impl Classifier for PanickingClassifier {
        fn n_features(&self) -> usize {
            crate::recognition::FEATURE_DIM
        }

        fn predict(&self, _features: &[f64]) -> Result<Option<ClassifierOutput>, InferenceError> {
            panic!("numeric failure inside model");
        }
    }
}
