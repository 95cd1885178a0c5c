use gmb_client::ClientError;
use gmb_core::{CredentialsError, ResourceNameError};
use thiserror::Error;

/// Outcome classification for [`crate::LocationStore::fetch`].
#[derive(Debug, Error)]
pub enum LocationError {
    /// No usable session; nothing was sent.
    #[error("unauthenticated: {0}")]
    Unauthenticated(#[from] CredentialsError),

    /// Non-2xx or transport failure, reflected in the store's `Failed` state.
    #[error("{message}")]
    Remote {
        message: String,
        status: Option<u16>,
    },

    /// HTTP 400 or 500. The view should be abandoned for the error page
    /// instead of rendering the failure.
    #[error("location request failed with status {status}; leave the view")]
    Abandoned { status: u16 },
}

#[derive(Debug, Error)]
pub enum WorkflowError {
    /// A session value was absent; checked before any request.
    #[error("missing credentials: {0}")]
    MissingCredentials(#[from] CredentialsError),

    #[error("no review is selected")]
    NoSelection,

    #[error("malformed resource name: {0}")]
    MalformedResourceName(#[from] ResourceNameError),

    #[error("remote failure: {0}")]
    Remote(#[from] ClientError),
}

/// The server's own message when it sent one, else the error text.
pub(crate) fn remote_message(err: &ClientError) -> String {
    err.server_message()
        .map_or_else(|| err.to_string(), str::to_owned)
}
