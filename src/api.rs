//! Wire contract with the recognition backend.
//!
//! Three same-origin JSON endpoints: model metadata, a random drawing prompt,
//! and sketch recognition. A payload whose `error` field is set counts as a
//! failure even on HTTP 200. There is no retry policy anywhere: every error
//! collapses into one user-facing line via [`ApiError::user_message`] and the
//! game state is left where it was.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

pub const MODEL_INFO_URL: &str = "/api/model-info";
pub const RANDOM_OBJECT_URL: &str = "/api/random-object";
pub const RECOGNIZE_URL: &str = "/api/recognize-drawing";

// --- Wire types ---------------------------------------------------------------

/// One drawing sample on the wire. `strokeEnd` tags the last sample of each
/// stroke; both optional fields are omitted when unset.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WirePoint {
    pub x: f64,
    pub y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
    #[serde(rename = "strokeEnd", skip_serializing_if = "Option::is_none")]
    pub stroke_end: Option<bool>,
}

/// Body of `POST /api/recognize-drawing`.
#[derive(Clone, Debug, Serialize)]
pub struct RecognizeRequest {
    pub drawing: Vec<WirePoint>,
    /// The object the player was asked to draw.
    pub object: String,
}

/// Reply from `POST /api/recognize-drawing`. Everything is optional on the
/// wire; the per-class confidences only appear when the model reports them.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RecognizeResponse {
    pub prediction: Option<String>,
    pub expected_object: Option<String>,
    #[serde(default)]
    pub is_correct: bool,
    pub confidence: Option<f64>,
    pub apple_confidence: Option<f64>,
    pub banana_confidence: Option<f64>,
    pub message: Option<String>,
    pub error: Option<String>,
}

/// Reply from `GET /api/random-object`.
#[derive(Clone, Debug, Deserialize)]
pub struct PromptResponse {
    #[serde(default)]
    pub success: bool,
    pub object: String,
    pub emoji: String,
}

/// Reply from `GET /api/model-info`. Fields beyond `error` are best-effort:
/// the backend reports whatever its loaded model exposes. Keras input shapes
/// carry a leading `null` for the batch dimension.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ModelInfo {
    pub error: Option<String>,
    #[serde(default)]
    pub classes: Vec<String>,
    pub input_shape: Option<Vec<Option<i64>>>,
    pub total_parameters: Option<u64>,
}

// --- Errors -------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("recognition service returned HTTP {status}")]
    Status { status: u16, body: String },
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("{0}")]
    Service(String),
}

impl ApiError {
    fn from_js(value: JsValue) -> Self {
        // Fetch rejections are JS Error objects; fall back to Debug formatting.
        let msg = value
            .dyn_ref::<js_sys::Error>()
            .map(|e| String::from(e.message()))
            .or_else(|| value.as_string())
            .unwrap_or_else(|| format!("{value:?}"));
        Self::Network(msg)
    }

    /// The single line shown to the player for this failure.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => "Could not reach the recognition service.".into(),
            Self::Status { status, .. } => {
                format!("Recognition service error (HTTP {status}).")
            }
            Self::Decode(_) => "The recognition service sent an unreadable reply.".into(),
            Self::Service(msg) => msg.clone(),
        }
    }
}

// --- Fetch client -------------------------------------------------------------

fn get(url: &str) -> Result<Request, ApiError> {
    Request::new_with_str(url).map_err(ApiError::from_js)
}

fn post_json(url: &str, body: &str) -> Result<Request, ApiError> {
    let init = RequestInit::new();
    init.set_method("POST");
    init.set_body(&JsValue::from_str(body));
    let req = Request::new_with_str_and_init(url, &init).map_err(ApiError::from_js)?;
    req.headers()
        .set("Content-Type", "application/json")
        .map_err(ApiError::from_js)?;
    Ok(req)
}

async fn fetch_json<T: for<'de> Deserialize<'de>>(req: Request) -> Result<T, ApiError> {
    let win = web_sys::window().ok_or_else(|| ApiError::Network("no window".into()))?;
    let resp: Response = JsFuture::from(win.fetch_with_request(&req))
        .await
        .map_err(ApiError::from_js)?
        .dyn_into()
        .map_err(ApiError::from_js)?;
    let text = JsFuture::from(resp.text().map_err(ApiError::from_js)?)
        .await
        .map_err(ApiError::from_js)?;
    let body = text.as_string().unwrap_or_default();
    if !resp.ok() {
        return Err(ApiError::Status {
            status: resp.status(),
            body,
        });
    }
    Ok(serde_json::from_str(&body)?)
}

/// `GET /api/model-info`.
pub async fn fetch_model_info() -> Result<ModelInfo, ApiError> {
    let mut info: ModelInfo = fetch_json(get(MODEL_INFO_URL)?).await?;
    if let Some(err) = info.error.take() {
        return Err(ApiError::Service(err));
    }
    Ok(info)
}

/// `GET /api/random-object`.
pub async fn fetch_prompt() -> Result<PromptResponse, ApiError> {
    let prompt: PromptResponse = fetch_json(get(RANDOM_OBJECT_URL)?).await?;
    if !prompt.success {
        return Err(ApiError::Service("prompt service reported failure".into()));
    }
    Ok(prompt)
}

/// `POST /api/recognize-drawing`.
pub async fn recognize(req: &RecognizeRequest) -> Result<RecognizeResponse, ApiError> {
    let body = serde_json::to_string(req)?;
    let mut resp: RecognizeResponse = fetch_json(post_json(RECOGNIZE_URL, &body)?).await?;
    if let Some(err) = resp.error.take() {
        return Err(ApiError::Service(err));
    }
    Ok(resp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_messages_are_single_lines() {
        let cases = [
            ApiError::Network("TypeError: Failed to fetch".into()),
            ApiError::Status {
                status: 500,
                body: "internal".into(),
            },
            ApiError::Service("No drawing data provided".into()),
        ];
        for err in cases {
            let msg = err.user_message();
            assert!(!msg.is_empty());
            assert!(!msg.contains('\n'));
        }
    }

    #[test]
    fn service_error_text_passes_through_verbatim() {
        let err = ApiError::Service("No drawing data provided".into());
        assert_eq!(err.user_message(), "No drawing data provided");
    }

    #[test]
    fn status_error_names_the_http_code() {
        let err = ApiError::Status {
            status: 404,
            body: String::new(),
        };
        assert!(err.user_message().contains("404"));
    }
}
