use thiserror::Error;

/// Why a submission ended in the error alert.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("service call failed: {0}")]
    Service(#[from] anyhow::Error),
    #[error("service returned an empty response")]
    EmptyResponse,
    #[error("could not build request payload: {0}")]
    Unexpected(String),
    #[error("submission was dropped before it finished")]
    Cancelled,
}
