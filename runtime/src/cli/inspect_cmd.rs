//! `yubimoji inspect`: check that a model artifact is loadable and matches the label table.

use crate::cli::output::{self, Styled};
use crate::classifier::{load_model, Classifier, ClassSet, Estimator, SignModel};
use crate::recognition::{labels, FEATURE_DIM};
use anyhow::{bail, Result};
use serde::Serialize;
use std::path::Path;

/// Summary of a loaded model.
#[derive(Debug, Clone, Serialize)]
pub struct ModelSummary {
    pub path: String,
    pub size_bytes: u64,
    pub estimator: &'static str,
    pub kernel: Option<&'static str>,
    pub n_features: usize,
    pub class_kind: &'static str,
    pub class_count: usize,
    pub support_vectors: Option<usize>,
    pub out_of_table: Vec<i64>,
}

impl ModelSummary {
    pub fn from_model(model: &SignModel, size_bytes: u64) -> Self {
        let (kernel, support_vectors) = match model.estimator() {
            Estimator::Svc(svc) => (Some(svc.kernel.name()), Some(svc.support_vector_count())),
            Estimator::Linear(_) => (None, None),
        };
        Self {
            path: model.path().display().to_string(),
            size_bytes,
            estimator: model.estimator().kind(),
            kernel,
            n_features: model.n_features(),
            class_kind: model.classes().kind(),
            class_count: model.classes().len(),
            support_vectors,
            out_of_table: model.indices_outside(labels::len()),
        }
    }

    /// True when the model accepts landmark feature vectors. Indices missing
    /// from the label table only degrade to the unknown sentinel.
    pub fn ready(&self) -> bool {
        self.n_features == FEATURE_DIM
    }
}

/// Run the inspect command.
pub fn run(model_path: &Path) -> Result<()> {
    let loaded = load_model(model_path).map_err(anyhow::Error::from);
    let size_bytes = std::fs::metadata(model_path).map(|m| m.len()).unwrap_or(0);

    if output::is_json() {
        let value = match &loaded {
            Ok(model) => serde_json::json!({
                "loaded": true,
                "model": ModelSummary::from_model(model, size_bytes),
            }),
            Err(e) => serde_json::json!({
                "loaded": false,
                "path": model_path.display().to_string(),
                "error": format!("{e:#}"),
            }),
        };
        output::print_json(&value);
        return match loaded {
            Ok(model) if ModelSummary::from_model(&model, size_bytes).ready() => Ok(()),
            _ => bail!("model is not ready"),
        };
    }

    let s = Styled::new();
    output::print_header(&s);
    output::print_section(&s, "Model");

    let model = match loaded {
        Ok(model) => model,
        Err(e) => {
            output::print_check(s.fail_sym(), "Artifact:", &model_path.display().to_string());
            output::print_detail(&format!("{e:#}"));
            output::print_status(&s, "NOT READY", "model failed to load");
            bail!("model failed to load");
        }
    };

    let summary = ModelSummary::from_model(&model, size_bytes);
    output::print_check(
        s.ok_sym(),
        "Artifact:",
        &format!("{} ({})", summary.path, output::format_size(summary.size_bytes)),
    );

    let estimator = match summary.kernel {
        Some(kernel) => format!("{} ({kernel} kernel)", summary.estimator),
        None => summary.estimator.to_string(),
    };
    output::print_check(s.ok_sym(), "Estimator:", &estimator);
    if let Some(n) = summary.support_vectors {
        output::print_check(s.ok_sym(), "Support vectors:", &n.to_string());
    }

    if summary.n_features == FEATURE_DIM {
        output::print_check(s.ok_sym(), "Features:", &summary.n_features.to_string());
    } else {
        output::print_check(
            s.fail_sym(),
            "Features:",
            &format!("{} (landmark requests carry {FEATURE_DIM})", summary.n_features),
        );
    }

    output::print_check(
        s.ok_sym(),
        "Classes:",
        &format!("{} {}", summary.class_count, summary.class_kind),
    );

    eprintln!();
    output::print_section(&s, "Label table");
    match model.classes() {
        ClassSet::Labeled(_) => {
            output::print_check(s.ok_sym(), "Mapping:", "model emits labels directly");
        }
        ClassSet::Indexed(_) if summary.out_of_table.is_empty() => {
            output::print_check(
                s.ok_sym(),
                "Mapping:",
                &format!("all indices within {} labels", labels::len()),
            );
        }
        ClassSet::Indexed(_) => {
            output::print_check(
                s.warn_sym(),
                "Mapping:",
                &format!("indices {:?} have no label", summary.out_of_table),
            );
            output::print_detail("These predictions will be reported as unknown.");
        }
    }

    if summary.ready() {
        output::print_status(&s, "READY", "model can serve landmark requests");
        Ok(())
    } else {
        output::print_status(&s, "NOT READY", "see failed checks above");
        bail!("model is not ready")
    }
}
