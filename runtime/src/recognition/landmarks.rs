//! Parse landmark payloads and flatten them into classifier feature vectors.

use crate::error::PredictError;
use serde::{Deserialize, Serialize};

/// Joints per tracked hand (wrist first, then thumb to pinky).
pub const LANDMARK_COUNT: usize = 21;
/// Coordinates carried by each joint.
pub const COORDS_PER_LANDMARK: usize = 3;
/// Feature count the classifier is trained on.
pub const FEATURE_DIM: usize = LANDMARK_COUNT * COORDS_PER_LANDMARK;

/// One normalized hand joint as sent by the browser.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Flattened `(x, y, z)` sequence for a single sample.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    /// Concatenate each landmark's coordinates in input order.
    pub fn from_landmarks(landmarks: &[Landmark]) -> Self {
        let mut feats = Vec::with_capacity(landmarks.len() * COORDS_PER_LANDMARK);
        for lm in landmarks {
            feats.extend_from_slice(&[lm.x, lm.y, lm.z]);
        }
        Self(feats)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Shape as a one-row matrix, `[1, n_features]`.
    pub fn shape(&self) -> [usize; 2] {
        [1, self.0.len()]
    }
}

/// Parsed body of a `/predict_sign` request.
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkPayload {
    pub landmarks: Vec<Landmark>,
}

impl LandmarkPayload {
    /// Parse a raw request body.
    ///
    /// `landmarks` that is absent or falsy (`null`, `false`, `0`, `""`, `[]`,
    /// `{}`) is reported as missing; any other shape that isn't a list of
    /// `{x, y, z}` objects is malformed.
    pub fn from_slice(body: &[u8]) -> Result<Self, PredictError> {
        let value: serde_json::Value =
            serde_json::from_slice(body).map_err(PredictError::MalformedRequest)?;
        let object = value.as_object().ok_or(PredictError::NotAnObject)?;

        let raw = match object.get("landmarks") {
            Some(v) if !is_falsy(v) => v.clone(),
            _ => return Err(PredictError::MissingLandmarks),
        };

        let landmarks: Vec<Landmark> =
            serde_json::from_value(raw).map_err(PredictError::MalformedRequest)?;
        Ok(Self { landmarks })
    }

    /// Build the feature vector, rejecting anything but a full hand.
    pub fn into_features(self) -> Result<FeatureVector, PredictError> {
        let features = FeatureVector::from_landmarks(&self.landmarks);
        if features.len() != FEATURE_DIM {
            return Err(PredictError::FeatureCount {
                expected: FEATURE_DIM,
                actual: features.len(),
            });
        }
        Ok(features)
    }
}

fn is_falsy(value: &serde_json::Value) -> bool {
    use serde_json::Value;
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand(n: usize) -> serde_json::Value {
        let points: Vec<_> = (0..n)
            .map(|i| serde_json::json!({"x": i as f64, "y": i as f64 + 0.5, "z": -(i as f64)}))
            .collect();
        serde_json::json!({ "landmarks": points })
    }

    #[test]
    fn test_full_hand_flattens_to_63() {
        let body = serde_json::to_vec(&hand(LANDMARK_COUNT)).unwrap();
        let feats = LandmarkPayload::from_slice(&body)
            .unwrap()
            .into_features()
            .unwrap();
        assert_eq!(feats.len(), FEATURE_DIM);
        assert_eq!(feats.shape(), [1, 63]);
        assert_eq!(&feats.as_slice()[..6], &[0.0, 0.5, -0.0, 1.0, 1.5, -1.0]);
        assert_eq!(feats.as_slice()[60], 20.0);
    }

    #[test]
    fn test_missing_and_falsy_landmarks() {
        for body in [
            r#"{}"#,
            r#"{"landmarks": null}"#,
            r#"{"landmarks": []}"#,
            r#"{"landmarks": false}"#,
            r#"{"landmarks": ""}"#,
        ] {
            let err = LandmarkPayload::from_slice(body.as_bytes()).unwrap_err();
            assert!(matches!(err, PredictError::MissingLandmarks), "{body}");
        }
    }

    #[test]
    fn test_malformed_bodies() {
        let err = LandmarkPayload::from_slice(b"not json").unwrap_err();
        assert!(matches!(err, PredictError::MalformedRequest(_)));

        let err = LandmarkPayload::from_slice(b"[1, 2, 3]").unwrap_err();
        assert!(matches!(err, PredictError::NotAnObject));

        let err = LandmarkPayload::from_slice(br#"{"landmarks": [{"x": 1, "y": 2}]}"#)
            .unwrap_err();
        assert!(matches!(err, PredictError::MalformedRequest(_)));
    }

    #[test]
    fn test_extra_fields_ignored() {
        let body = br#"{"landmarks": [{"x": 0.1, "y": 0.2, "z": 0.3, "visibility": 0.9}]}"#;
        let payload = LandmarkPayload::from_slice(body).unwrap();
        assert_eq!(payload.landmarks, vec![Landmark { x: 0.1, y: 0.2, z: 0.3 }]);
    }

    #[test]
    fn test_partial_hand_rejected() {
        let body = serde_json::to_vec(&hand(20)).unwrap();
        let err = LandmarkPayload::from_slice(&body)
            .unwrap()
            .into_features()
            .unwrap_err();
        assert!(matches!(
            err,
            PredictError::FeatureCount {
                expected: 63,
                actual: 60
            }
        ));
    }
}
