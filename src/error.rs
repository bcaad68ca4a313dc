use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a call to the clinic backend.
///
/// The backend does not distinguish validation, not-found or conflict errors in
/// a way the console relies on, so every failure is either a transport problem
/// or a non-2xx status carrying the response body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP error! status: {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status(),
            _ => None,
        }
    }
}

/// Client-side form validation. Never reaches the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} cannot be empty")]
    Empty(&'static str),

    #[error("{field} must be at least {min} characters")]
    TooShort { field: &'static str, min: usize },

    #[error("{field} must be less than {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("Invalid date format")]
    InvalidDate,

    #[error("Invalid time format")]
    InvalidTime,

    #[error("Passwords do not match")]
    PasswordMismatch,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("corrupt session data: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Error)]
pub enum PurchaseError {
    #[error("no purchase in progress")]
    NotOpen,

    #[error("purchase cannot be confirmed before the review step")]
    NotReviewing,

    #[error("{0} is out of stock")]
    OutOfStock(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("stock update failed: {0}")]
    StockUpdate(#[source] ApiError),

    #[error("sale was not recorded after stock update: {0}")]
    SaleCreate(#[source] ApiError),

    #[error("sale was not recorded after stock update (intent {intent}): {source}")]
    PartialFailure {
        intent: String,
        #[source]
        source: ApiError,
    },

    #[error("purchase ledger error: {0}")]
    Ledger(String),
}

#[derive(Debug, Error)]
pub enum PortalError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} cannot be empty")]
    Empty(&'static str),

    #[error("Invalid {var} '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}
