//! Load the exported sign classifier from its JSON artifact.

use crate::classifier::svm::{LinearParams, SvcParams};
use crate::classifier::{Classifier, ClassifierOutput};
use crate::error::{ArtifactError, InferenceError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Artifact layout version this build understands.
pub const FORMAT_VERSION: u32 = 1;

/// On-disk representation of a fitted classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    pub n_features: usize,
    pub classes: ClassSet,
    pub estimator: Estimator,
}

/// Class values the model was trained with, in class-position order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassSet {
    Indexed(Vec<i64>),
    Labeled(Vec<String>),
}

impl ClassSet {
    pub fn len(&self) -> usize {
        match self {
            Self::Indexed(v) => v.len(),
            Self::Labeled(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Indexed(_) => "indexed",
            Self::Labeled(_) => "labeled",
        }
    }

    fn output(&self, position: usize) -> Option<ClassifierOutput> {
        match self {
            Self::Indexed(v) => v.get(position).copied().map(ClassifierOutput::Indexed),
            Self::Labeled(v) => v.get(position).cloned().map(ClassifierOutput::Labeled),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Estimator {
    Svc(SvcParams),
    Linear(LinearParams),
}

impl Estimator {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Svc(_) => "svc",
            Self::Linear(_) => "linear",
        }
    }
}

impl ModelArtifact {
    /// Check that every shape agrees with `n_features` and the class list.
    pub fn validate(&self) -> Result<(), ArtifactError> {
        if self.format_version != FORMAT_VERSION {
            return Err(ArtifactError::Invalid(format!(
                "unsupported format_version {} (expected {FORMAT_VERSION})",
                self.format_version
            )));
        }
        if self.n_features == 0 {
            return Err(ArtifactError::Invalid("n_features must be positive".into()));
        }
        if self.classes.len() < 2 {
            return Err(ArtifactError::Invalid(format!(
                "a classifier needs at least two classes, got {}",
                self.classes.len()
            )));
        }
        match &self.estimator {
            Estimator::Svc(svc) => svc.validate(self.n_features, self.classes.len()),
            Estimator::Linear(lin) => lin.validate(self.n_features, self.classes.len()),
        }
    }
}

/// A validated, ready-to-evaluate sign classifier.
#[derive(Debug, Clone)]
pub struct SignModel {
    artifact: ModelArtifact,
    path: PathBuf,
}

impl SignModel {
    pub fn from_artifact(artifact: ModelArtifact, path: impl Into<PathBuf>) -> Result<Self, ArtifactError> {
        artifact.validate()?;
        Ok(Self {
            artifact,
            path: path.into(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn classes(&self) -> &ClassSet {
        &self.artifact.classes
    }

    pub fn estimator(&self) -> &Estimator {
        &self.artifact.estimator
    }

    /// Indexed classes that fall outside a label table of `table_len` entries.
    pub fn indices_outside(&self, table_len: usize) -> Vec<i64> {
        match &self.artifact.classes {
            ClassSet::Indexed(v) => v
                .iter()
                .copied()
                .filter(|&i| usize::try_from(i).map_or(true, |u| u >= table_len))
                .collect(),
            ClassSet::Labeled(_) => Vec::new(),
        }
    }
}

impl Classifier for SignModel {
    fn n_features(&self) -> usize {
        self.artifact.n_features
    }

    fn predict(&self, features: &[f64]) -> Result<Option<ClassifierOutput>, InferenceError> {
        if features.len() != self.artifact.n_features {
            return Err(InferenceError::ShapeMismatch {
                expected: self.artifact.n_features,
                actual: features.len(),
            });
        }
        let position = match &self.artifact.estimator {
            Estimator::Svc(svc) => svc.predict_position(features)?,
            Estimator::Linear(lin) => lin.predict_position(features)?,
        };
        Ok(self.artifact.classes.output(position))
    }
}

/// Read, parse and validate a model artifact.
pub fn load_model(path: &Path) -> Result<SignModel, ArtifactError> {
    let raw = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ArtifactError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ArtifactError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let artifact: ModelArtifact =
        serde_json::from_str(&raw).map_err(|source| ArtifactError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    let model = SignModel::from_artifact(artifact, path)?;
    info!(
        path = %path.display(),
        estimator = model.estimator().kind(),
        classes = model.classes().len(),
        n_features = model.n_features(),
        "loaded sign model"
    );
    Ok(model)
}
