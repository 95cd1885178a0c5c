//! Lifecycle state for fetching one business location.

use gmb_client::{ClientError, GmbClient};
use gmb_core::Session;

use crate::error::LocationError;

/// Message stored when a failure carries no server-supplied text.
pub const FETCH_FAILED_FALLBACK: &str = "An error occurred while fetching location details.";

/// Statuses that abandon the view instead of rendering `Failed`.
const ABANDON_STATUSES: [u16; 2] = [400, 500];

#[derive(Debug, Clone, Default, PartialEq)]
pub enum LocationState {
    #[default]
    Idle,
    Loading,
    Loaded(serde_json::Value),
    Failed(String),
    /// The backend answered 400 or 500; the caller navigates away.
    Abandoned { status: u16 },
}

/// Request/state store for a single location record.
///
/// `Idle → Loading → {Loaded, Failed, Abandoned}`. Calling [`fetch`] again
/// from any terminal state re-enters `Loading`; [`reset`] returns to `Idle`.
///
/// [`fetch`]: LocationStore::fetch
/// [`reset`]: LocationStore::reset
#[derive(Debug, Default)]
pub struct LocationStore {
    state: LocationState,
}

impl LocationStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> &LocationState {
        &self.state
    }

    /// The last loaded payload.
    #[must_use]
    pub fn data(&self) -> Option<&serde_json::Value> {
        match &self.state {
            LocationState::Loaded(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            LocationState::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn reset(&mut self) {
        self.state = LocationState::Idle;
    }

    /// Fetch `location_id` and record the outcome; read the payload back
    /// with [`LocationStore::data`].
    ///
    /// # Errors
    ///
    /// - [`LocationError::Unauthenticated`] when the session lacks a
    ///   credential; no request is sent and the store records `Failed`.
    /// - [`LocationError::Abandoned`] for HTTP 400 or 500.
    /// - [`LocationError::Remote`] for any other failure; the store records
    ///   `Failed` with the server's message or [`FETCH_FAILED_FALLBACK`].
    pub async fn fetch(
        &mut self,
        client: &GmbClient,
        session: &Session,
        location_id: &str,
    ) -> Result<(), LocationError> {
        self.state = LocationState::Loading;

        let creds = match session.credentials() {
            Ok(creds) => creds,
            Err(e) => {
                tracing::warn!(location_id, error = %e, "location fetch without credentials");
                self.state = LocationState::Failed(e.to_string());
                return Err(LocationError::Unauthenticated(e));
            }
        };

        let result = client.get_location(&creds, location_id).await;
        self.apply(location_id, result)
    }

    fn apply(
        &mut self,
        location_id: &str,
        result: Result<serde_json::Value, ClientError>,
    ) -> Result<(), LocationError> {
        let err = match result {
            Ok(payload) => {
                self.state = LocationState::Loaded(payload);
                return Ok(());
            }
            Err(err) => err,
        };

        let status = err.status();
        if let Some(status) = status.filter(|s| ABANDON_STATUSES.contains(s)) {
            tracing::warn!(location_id, status, "location fetch abandoned");
            self.state = LocationState::Abandoned { status };
            return Err(LocationError::Abandoned { status });
        }

        let message = err
            .server_message()
            .unwrap_or(FETCH_FAILED_FALLBACK)
            .to_string();
        tracing::warn!(location_id, ?status, error = %err, "location fetch failed");
        self.state = LocationState::Failed(message.clone());
        Err(LocationError::Remote { message, status })
    }
}
