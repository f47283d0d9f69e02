/// Failure resolving a token address into [`crate::api::TokenInfo`].
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("Invalid token address: {0}")]
    InvalidAddress(String),

    #[error("No trading pairs found for {0}")]
    NotFound(String),

    #[error("DexScreener API error: {0}")]
    Status(u16),

    #[error("Unexpected DexScreener response: {0}")]
    Decode(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Failure while loading the user list. Only ever observed inside
/// [`crate::fetch::FetchState::Error`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("User source unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed user record: {0}")]
    Malformed(String),
}

#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("OPENAI_API_KEY is not set")]
    MissingCredential,

    #[error("Completion API error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unexpected completion response: {0}")]
    Decode(String),

    #[error("Completion response contained no choices")]
    EmptyChoices,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl CompletionError {
    /// Transport failures and overloaded/rate-limited responses are worth
    /// another attempt; everything else fails the same way twice.
    pub fn is_retryable(&self) -> bool {
        match self {
            CompletionError::Http(_) => true,
            CompletionError::Status { status, .. } => RETRYABLE_STATUSES.contains(status),
            _ => false,
        }
    }
}

impl LookupError {
    pub fn is_retryable(&self) -> bool {
        match self {
            LookupError::Http(_) => true,
            LookupError::Status(status) => RETRYABLE_STATUSES.contains(status),
            _ => false,
        }
    }
}

pub(crate) const RETRYABLE_STATUSES: [u16; 4] = [429, 502, 503, 504];
