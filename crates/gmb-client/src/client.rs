//! Typed wrapper over the dashboard's `gmb/*` REST endpoints.
//!
//! Each method takes the validated [`Credentials`] explicitly. Non-2xx
//! responses become [`ClientError::Status`] carrying the body's `message`
//! field when there is one, so callers can show the server's own wording.

use std::time::Duration;

use gmb_core::{Credentials, Review, ReviewsEnvelope};
use reqwest::{header::AUTHORIZATION, Client, Response, Url};
use serde::Serialize;

use crate::error::ClientError;

const ACCESS_TOKEN_HEADER: &str = "gmb_access_token";

/// Client for the dashboard backend.
///
/// Use [`GmbClient::new`] with the configured base URL, or point it at a
/// mock server in tests.
#[derive(Debug, Clone)]
pub struct GmbClient {
    client: Client,
    base_url: Url,
}

#[derive(Serialize)]
struct ReplyBody<'a> {
    reply: &'a str,
}

impl GmbClient {
    /// Creates a client rooted at `base_url`.
    ///
    /// `timeout` of `None` leaves the transport default in place.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClientError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn new(
        base_url: &str,
        user_agent: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, ClientError> {
        let mut builder = Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        // Exactly one trailing slash so `join` appends instead of replacing
        // the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ClientError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl {
                url: normalised,
                reason: "URL cannot be used as a base".to_string(),
            });
        }

        Ok(Self { client, base_url })
    }

    /// Fetches the location record for `place_id`.
    ///
    /// The session token goes in `Authorization` verbatim (no scheme); the
    /// access token and account id travel as query parameters.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Status`] on a non-2xx response.
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::Deserialize`] if the body is not JSON.
    pub async fn get_location(
        &self,
        creds: &Credentials,
        place_id: &str,
    ) -> Result<serde_json::Value, ClientError> {
        let mut url = self.endpoint(&["gmb", "get-location"]);
        url.query_pairs_mut()
            .append_pair("access_token", &creds.gmb_access_token)
            .append_pair("place_id", place_id)
            .append_pair("gmb_account_id", &creds.gmb_account_id);

        let response = self
            .client
            .get(url.clone())
            .header(AUTHORIZATION, &creds.auth_token)
            .send()
            .await?;
        let response = Self::check_status(response, &url).await?;
        let body = response.text().await?;
        let payload = serde_json::from_str(&body).map_err(|e| ClientError::Deserialize {
            context: format!("get-location(place_id={place_id})"),
            source: e,
        })?;

        tracing::info!(place_id, "fetched location");
        Ok(payload)
    }

    /// Fetches every review under the session's account, in server order.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Status`] on a non-2xx response.
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::Deserialize`] if the body is not a reviews envelope.
    ///   Individual entries that cannot be read are skipped and logged.
    pub async fn get_all_reviews(&self, creds: &Credentials) -> Result<Vec<Review>, ClientError> {
        let url = self.endpoint(&["gmb", "get-allviewers", &creds.gmb_account_id]);
        let response = self.authorized(self.client.get(url.clone()), creds).send().await?;
        let response = Self::check_status(response, &url).await?;
        let body = response.text().await?;
        let envelope: ReviewsEnvelope =
            serde_json::from_str(&body).map_err(|e| ClientError::Deserialize {
                context: format!("get-allviewers(account={})", creds.gmb_account_id),
                source: e,
            })?;

        let decoded = envelope.decode();
        for err in &decoded.rejected {
            tracing::warn!(
                account_id = %creds.gmb_account_id,
                error = %err,
                "skipping unreadable review entry"
            );
        }
        tracing::info!(
            account_id = %creds.gmb_account_id,
            count = decoded.reviews.len(),
            skipped = decoded.rejected.len(),
            "fetched reviews"
        );
        Ok(decoded.reviews)
    }

    /// Posts `reply` to the review identified by account, location and review id.
    ///
    /// The response body is ignored; only the status matters.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Status`] on a non-2xx response.
    /// - [`ClientError::Http`] on network failure.
    pub async fn reply_review(
        &self,
        creds: &Credentials,
        account_id: &str,
        location_id: &str,
        review_id: &str,
        reply: &str,
    ) -> Result<(), ClientError> {
        let url = self.endpoint(&["gmb", "replay-review", account_id, location_id, review_id]);
        let request = self
            .authorized(self.client.post(url.clone()), creds)
            .json(&ReplyBody { reply });
        let response = request.send().await?;
        Self::check_status(response, &url).await?;

        tracing::info!(account_id, location_id, review_id, "submitted review reply");
        Ok(())
    }

    /// Bearer session token plus the access-token header used by the review endpoints.
    fn authorized(
        &self,
        request: reqwest::RequestBuilder,
        creds: &Credentials,
    ) -> reqwest::RequestBuilder {
        request
            .header(AUTHORIZATION, format!("Bearer {}", creds.auth_token))
            .header(ACCESS_TOKEN_HEADER, &creds.gmb_access_token)
    }

    /// Appends percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Passes 2xx responses through; turns anything else into
    /// [`ClientError::Status`], lifting the body's `message` field.
    async fn check_status(response: Response, url: &Url) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| {
                v.get("message")
                    .and_then(serde_json::Value::as_str)
                    .map(str::to_owned)
            });

        tracing::warn!(status = status.as_u16(), %url, ?message, "backend request failed");
        Err(ClientError::Status {
            status: status.as_u16(),
            url: url.to_string(),
            message,
        })
    }
}
