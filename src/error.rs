use thiserror::Error;

/// Client-side validation failures. These never reach the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Name is required")]
    NameRequired,
    #[error("Name must be 50 characters or less")]
    NameTooLong,
    #[error("Name must contain only letters (no spaces or special characters)")]
    NameNotLetters,
    #[error("Password must be at least 6 characters long")]
    PasswordTooShort,
    #[error("Password must contain at least one uppercase letter")]
    PasswordMissingUppercase,
    #[error("Password must contain at least one lowercase letter")]
    PasswordMissingLowercase,
    #[error("Password must contain at least one number")]
    PasswordMissingDigit,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Quantity cannot be negative: {0}")]
    NegativeQuantity(i64),
    #[error("Quantity is too large: {0}")]
    QuantityTooLarge(i64),
    #[error("Invalid user ID format: {0}")]
    InvalidUserId(String),
}

/// Unified error type for API, capture and I/O operations
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// Non-2xx status, with the server's message when it sent one
    #[error("HTTP error {status}: {message}")]
    HttpStatus {
        status: reqwest::StatusCode,
        message: String,
    },
    /// 403 from the collection endpoint
    #[error("This collection is private")]
    PrivateCollection,
    /// 404 from a user-scoped endpoint
    #[error("User not found")]
    UserNotFound,
    /// Server answered with `success: false`
    #[error("{0}")]
    Application(String),
    /// Failed to parse JSON response
    #[error("Malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
    /// Response parsed but an expected field is absent
    #[error("Malformed response: missing field `{0}`")]
    MissingField(&'static str),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Image source could not be opened or read
    #[error("Capture error: {0}")]
    Capture(String),
}

impl ApiError {
    /// True for failures where the request never got an answer.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;
