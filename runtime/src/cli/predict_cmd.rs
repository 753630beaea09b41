//! `yubimoji predict <payload.json>`: classify a saved landmark payload offline.

use crate::cli::output::{self, Styled};
use crate::classifier::load_model;
use crate::recognition::{self, LandmarkPayload};
use anyhow::{Context, Result};
use std::path::Path;

/// Classify the landmark payload in `input` with the model at `model_path`.
pub fn predict_file(input: &Path, model_path: &Path) -> Result<String> {
    let model = load_model(model_path)
        .with_context(|| format!("loading model from {}", model_path.display()))?;

    let body =
        std::fs::read(input).with_context(|| format!("reading {}", input.display()))?;
    let features = LandmarkPayload::from_slice(&body)
        .and_then(LandmarkPayload::into_features)
        .with_context(|| format!("invalid landmark payload in {}", input.display()))?;
    recognition::recognize(&model, &features).context("inference failed")
}

/// Run the predict command.
pub fn run(input: &Path, model_path: &Path) -> Result<()> {
    let prediction = predict_file(input, model_path)?;

    if output::is_json() {
        output::print_json(&serde_json::json!({ "prediction": prediction }));
        return Ok(());
    }

    let s = Styled::new();
    if output::is_verbose() {
        eprintln!("  Model: {}", model_path.display());
        eprintln!("  Input: {}", input.display());
    }
    if output::is_quiet() {
        println!("{prediction}");
    } else {
        println!("  {} {}", s.ok_sym(), s.green(&prediction));
    }
    Ok(())
}
