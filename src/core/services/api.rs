use serde::de::DeserializeOwned;
use serde::Deserialize;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use crate::config::AppConfig;
use crate::core::error::StoreError;
use crate::core::models::Task;

/// Either the API's `{ success, data }` envelope or a bare payload.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Payload<T> {
    Envelope { data: T },
    Bare(T),
}

impl<T> Payload<T> {
    fn into_inner(self) -> T {
        match self {
            Payload::Envelope { data } => data,
            Payload::Bare(data) => data,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Raw HTTP outcome before it is mapped onto the store taxonomy.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

// JSON client for the ToggleNest REST API on top of the browser fetch API
#[derive(Debug, Clone)]
pub struct ApiClient {
    config: AppConfig,
}

impl ApiClient {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    fn network_error(&self) -> StoreError {
        StoreError::Network { base_url: self.config.api_base_url.clone() }
    }

    fn bearer_token(&self) -> Option<String> {
        web_sys::window()?
            .local_storage()
            .ok()??
            .get_item(&self.config.token_storage_key)
            .ok()?
            .filter(|token| !token.is_empty())
    }

    // Generic request executor; any failure before a response arrives is a network error
    pub async fn send(
        &self,
        method: &str,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<ApiResponse, StoreError> {
        let url = self.config.endpoint(path);
        let token = self.bearer_token();

        tracing::debug!(method, url = %url, has_token = token.is_some(), "api request");

        let opts = RequestInit::new();
        opts.set_method(method);
        opts.set_mode(RequestMode::Cors);
        if let Some(body) = body {
            opts.set_body(&JsValue::from_str(&body.to_string()));
        }

        let request = Request::new_with_str_and_init(&url, &opts).map_err(|_| self.network_error())?;
        let headers = request.headers();
        headers
            .set("Content-Type", "application/json")
            .map_err(|_| self.network_error())?;
        if let Some(token) = token {
            headers
                .set("Authorization", &format!("Bearer {}", token))
                .map_err(|_| self.network_error())?;
        }

        let window = web_sys::window().ok_or_else(|| self.network_error())?;
        let response: Response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| {
                tracing::error!(url = %url, error = ?e, "cannot reach backend");
                self.network_error()
            })?
            .dyn_into()
            .map_err(|_| self.network_error())?;

        let text_promise = response.text().map_err(|_| self.network_error())?;
        let body = JsFuture::from(text_promise)
            .await
            .map_err(|_| self.network_error())?
            .as_string()
            .unwrap_or_default();

        let status = response.status();
        if (200..300).contains(&status) {
            tracing::debug!(status, url = %url, "api response");
        } else {
            tracing::warn!(status, url = %url, "api error response");
        }

        Ok(ApiResponse { status, body })
    }
}

/// Unwraps a success body, accepting both the envelope and a bare payload.
pub fn decode_payload<T: DeserializeOwned>(endpoint: &str, body: &str) -> Result<T, StoreError> {
    serde_json::from_str::<Payload<T>>(body)
        .map(Payload::into_inner)
        .map_err(|e| StoreError::Decode {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })
}

/// Decodes a task list, skipping entries that do not parse as a [`Task`]
/// rather than failing the whole board.
pub fn decode_task_list(endpoint: &str, body: &str) -> Result<Vec<Task>, StoreError> {
    let raw: Vec<serde_json::Value> = decode_payload(endpoint, body)?;
    let total = raw.len();

    let tasks: Vec<Task> = raw
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<Task>(value) {
            Ok(task) => Some(task),
            Err(e) => {
                tracing::warn!(error = %e, "skipping task that failed to parse");
                None
            }
        })
        .collect();

    if tasks.len() != total {
        tracing::warn!(dropped = total - tasks.len(), total, "some tasks were not shown");
    }

    Ok(tasks)
}

/// Maps a non-success response onto the store taxonomy.
pub fn error_from_response(response: &ApiResponse, task_id: Option<&str>) -> StoreError {
    let message = serde_json::from_str::<ErrorBody>(&response.body)
        .unwrap_or_default()
        .message;
    StoreError::from_status(response.status, message, task_id)
}
