//! Shared application state.

use crate::classifier::{load_model, Classifier};
use crate::config::ServerConfig;
use crate::error::ArtifactError;
use crate::recognition::labels;
use std::sync::Arc;
use tracing::{error, warn};

/// State shared by every request. Read-only after construction.
pub struct AppState {
    /// The classifier, `None` if it failed to load at startup.
    pub model: Option<Arc<dyn Classifier>>,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(config: ServerConfig, model: Option<Arc<dyn Classifier>>) -> Self {
        Self { model, config }
    }

    /// Load the model named by `config`. A failed load leaves the model
    /// unavailable; the server still starts.
    pub fn load(config: ServerConfig) -> Self {
        let model = match load_model(&config.model_path) {
            Ok(model) => {
                let skew = model.indices_outside(labels::len());
                if !skew.is_empty() {
                    warn!(
                        indices = ?skew,
                        table_len = labels::len(),
                        "model can emit class indices outside the label table"
                    );
                }
                Some(Arc::new(model) as Arc<dyn Classifier>)
            }
            Err(ArtifactError::NotFound { path }) => {
                error!(
                    path = %path.display(),
                    "model file not found; check the path. Recognition requests will fail"
                );
                None
            }
            Err(e) => {
                let e = anyhow::Error::new(e);
                error!(error = %format!("{e:#}"), "failed to load model; recognition requests will fail");
                None
            }
        };
        Self::new(config, model)
    }

    pub fn model_loaded(&self) -> bool {
        self.model.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_model_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig::builder()
            .model_path(dir.path().join("missing.json"))
            .build();
        let state = AppState::load(config);
        assert!(!state.model_loaded());
    }

    #[test]
    fn test_load_corrupt_model_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, "not a model").unwrap();
        let state = AppState::load(ServerConfig::builder().model_path(&path).build());
        assert!(state.model.is_none());
    }

    #[test]
    fn test_load_valid_model() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(
            &path,
            r#"{"format_version": 1, "n_features": 1, "classes": [0, 1],
                "estimator": {"type": "linear", "coef": [[1.0]], "intercept": [0.0]}}"#,
        )
        .unwrap();
        let state = AppState::load(ServerConfig::builder().model_path(&path).build());
        assert!(state.model_loaded());
    }
}
