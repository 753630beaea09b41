//! Error types for model loading, inference, and request handling.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to load a model artifact from disk.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("model file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read model file {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse model file {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid model artifact: {0}")]
    Invalid(String),
}

/// Failure inside a single classifier call.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("feature shape mismatch: model expects {expected} features, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("non-finite decision value ({0})")]
    NonFinite(String),

    #[error("inference worker failed: {0}")]
    Worker(String),
}

/// Failure of one `/predict_sign` request.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("model is not loaded")]
    ModelUnavailable,

    #[error("malformed request body")]
    MalformedRequest(#[source] serde_json::Error),

    #[error("request body is not a JSON object")]
    NotAnObject,

    #[error("no landmark data in request")]
    MissingLandmarks,

    #[error("expected {expected} features, got {actual}")]
    FeatureCount { expected: usize, actual: usize },

    #[error("inference failed")]
    Inference(#[from] InferenceError),
}

impl PredictError {
    /// True for failures caused by the caller's payload.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedRequest(_)
                | Self::NotAnObject
                | Self::MissingLandmarks
                | Self::FeatureCount { .. }
        )
    }

    /// Short message safe to return to the browser.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::ModelUnavailable => "モデルがロードされていません。",
            Self::MalformedRequest(_) | Self::NotAnObject => {
                "リクエストの形式が正しくありません。"
            }
            Self::MissingLandmarks => "ランドマークデータがありません。",
            Self::FeatureCount { .. } => "ランドマークの数が正しくありません。",
            Self::Inference(_) => "推論中にエラーが発生しました。",
        }
    }
}
