use thiserror::Error;

/// Failures reported by a [`TaskStore`](crate::core::services::TaskStore).
///
/// None of these are fatal to the board: every failure path ends in a reload
/// and a user-visible notice.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No response at all: the API is unreachable or the request was blocked.
    #[error("Cannot connect to server at {base_url}")]
    Network { base_url: String },

    /// The API answered with a non-success status other than 404.
    #[error("{message} (HTTP {status})")]
    Server { status: u16, message: String },

    /// The task id no longer exists on the server.
    #[error("Task {task_id} not found")]
    NotFound { task_id: String },

    /// A success response whose body was not the expected shape.
    #[error("Unexpected response from {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },
}

impl StoreError {
    /// Only transport failures are worth retrying; the server already
    /// answered every other kind.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Network { .. })
    }

    /// Builds a `Server`/`NotFound` error from an HTTP status and the
    /// optional `message` field of the error body.
    pub fn from_status(status: u16, body_message: Option<String>, task_id: Option<&str>) -> StoreError {
        if status == 404 {
            if let Some(task_id) = task_id {
                return StoreError::NotFound { task_id: task_id.to_string() };
            }
        }

        let message = body_message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| default_message(status).to_string());
        StoreError::Server { status, message }
    }
}

fn default_message(status: u16) -> &'static str {
    match status {
        401 => "Session expired. Please login again.",
        403 => "Access forbidden. You do not have permission.",
        404 => "Resource not found.",
        500 => "Server error. Please try again later.",
        _ => "Something went wrong",
    }
}
