use thiserror::Error;

/// Errors from a single backend request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, timeout, TLS).
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("Backend returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body did not match the expected shape.
    #[error("Malformed response: {0}")]
    Decode(String),
}

impl ApiError {
    /// True when the backend explicitly rejected the request, as opposed
    /// to the request never arriving.
    pub fn is_rejection(&self) -> bool {
        matches!(self, ApiError::Status { .. })
    }
}

/// Terminal outcome of a resilient read that exhausted its attempt budget.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Giving up after {attempts} attempts: {last}")]
    ExhaustedRetries {
        attempts: u32,
        #[source]
        last: ApiError,
    },
}

impl FetchError {
    /// User-facing message for inline error states on screens.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::ExhaustedRetries { attempts, .. } => {
                format!("Could not reach the server after {attempts} attempts")
            }
        }
    }
}
