//! Turn raw classifier output into the string shown to the user.

use crate::classifier::ClassifierOutput;
use crate::recognition::labels;
use tracing::{debug, warn};

/// Class index outside the label table.
pub const UNKNOWN: &str = "不明";
/// Classifier returned nothing.
pub const INFERENCE_FAILED: &str = "推論失敗";
/// `prediction` value on every error response.
pub const ERROR: &str = "エラー";

/// Resolve a classifier output to a label or sentinel.
pub fn decode(output: Option<&ClassifierOutput>) -> String {
    match output {
        Some(ClassifierOutput::Indexed(index)) => match labels::label(*index) {
            Some(label) => label.to_string(),
            None => {
                warn!(
                    index,
                    table_len = labels::len(),
                    "predicted class index is outside the label table; model and label table may be out of sync"
                );
                UNKNOWN.to_string()
            }
        },
        Some(ClassifierOutput::Labeled(label)) => {
            debug!(%label, "model returned a label directly");
            label.clone()
        }
        None => INFERENCE_FAILED.to_string(),
    }
}
