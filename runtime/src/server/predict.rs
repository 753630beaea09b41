//! `POST /predict_sign`: landmarks in, fingerspelling label out.

use crate::error::{InferenceError, PredictError};
use crate::recognition::{self, decoder, LandmarkPayload};
use crate::server::state::AppState;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Body of every `/predict_sign` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub prediction: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PredictResponse {
    pub fn ok(prediction: impl Into<String>) -> Self {
        Self {
            prediction: prediction.into(),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            prediction: decoder::ERROR.to_string(),
            error: Some(message.into()),
        }
    }
}

impl PredictError {
    pub fn status(&self) -> StatusCode {
        if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for PredictError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(PredictResponse::error(self.public_message()));
        let err = anyhow::Error::new(self);
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %format!("{err:#}"), "recognition request failed");
        } else {
            warn!(status = status.as_u16(), error = %format!("{err:#}"), "rejected recognition request");
        }
        (status, body).into_response()
    }
}

pub async fn predict_sign(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    match handle(&state, &body).await {
        Ok(label) => Json(PredictResponse::ok(label)).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn handle(state: &AppState, body: &[u8]) -> Result<String, PredictError> {
    let model = state.model.clone().ok_or(PredictError::ModelUnavailable)?;
    let features = LandmarkPayload::from_slice(body)?.into_features()?;
    debug!(shape = ?features.shape(), "received landmarks for prediction");

    tokio::task::spawn_blocking(move || recognition::recognize(model.as_ref(), &features))
        .await
        .map_err(|e| InferenceError::Worker(e.to_string()))?
}
