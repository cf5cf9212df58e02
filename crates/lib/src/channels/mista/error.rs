use crate::urn::UrnError;

/// Everything that can go wrong normalizing a webhook or sending a message.
#[derive(Debug, thiserror::Error)]
pub enum MistaError {
    #[error("missing required field '{field}'")]
    Validation { field: &'static str },
    #[error("invalid sender '{from}': {source}")]
    InvalidSenderIdentity {
        from: String,
        #[source]
        source: UrnError,
    },
    #[error("invalid date format: '{0}'")]
    MalformedTimestamp(String),
    #[error(
        "unknown status '{0}', must be one of 'Success', 'Sent', 'Buffered', 'Rejected', 'Failed', or 'Expired'"
    )]
    UnknownStatus(String),
    #[error("no API key set for Mista channel {0}")]
    MissingCredential(String),
    #[error("mista request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("mista rejected the request: {0}")]
    ProviderRejected(String),
    #[error("malformed mista response: {0}")]
    MalformedProviderResponse(String),
}
