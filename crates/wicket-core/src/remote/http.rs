//! HTTP client for the remote authorization service.
//!
//! Wire format: POST `id=<credential>` as form data to `<endpoint>/auth/`;
//! the service answers with a plain-text body. The exact marker `Granted`
//! grants; any other 2xx body denies; a non-success status or an unreadable
//! body decodes as [`RemoteDecision::Malformed`].

use async_trait::async_trait;

use super::{AuthzClient, RemoteDecision, RemoteError};
use crate::credential::Credential;

/// The one body that grants access. Denial is the default; a grant must be
/// this exact signal.
const GRANT_MARKER: &str = "Granted";

pub struct HttpAuthzClient {
    auth_url: String,
    client: reqwest::Client,
}

impl HttpAuthzClient {
    /// `endpoint` is the service base address, e.g. `http://10.0.0.5:8000/`.
    pub fn new(endpoint: &str) -> Self {
        let base = endpoint.trim_end_matches('/');
        Self {
            auth_url: format!("{base}/auth/"),
            client: reqwest::Client::new(),
        }
    }

    pub fn auth_url(&self) -> &str {
        &self.auth_url
    }
}

#[async_trait]
impl AuthzClient for HttpAuthzClient {
    async fn decide(&self, credential: &Credential) -> Result<RemoteDecision, RemoteError> {
        let resp = self
            .client
            .post(&self.auth_url)
            .form(&[("id", credential.as_str())])
            .send()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        let status_ok = resp.status().is_success();
        match resp.text().await {
            Ok(body) => Ok(decode_reply(status_ok, &body)),
            // We reached the service but could not read its answer; that is
            // a malformed reply, not an outage.
            Err(_) => Ok(RemoteDecision::Malformed),
        }
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Decode one service reply body.
fn decode_reply(status_ok: bool, body: &str) -> RemoteDecision {
    if !status_ok {
        return RemoteDecision::Malformed;
    }
    if body.trim() == GRANT_MARKER {
        RemoteDecision::Granted
    } else {
        RemoteDecision::Denied
    }
}
