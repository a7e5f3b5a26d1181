// Concierge API HTTP client
//
// Wraps `reqwest::Client` with URL construction under the server's
// `/api/` prefix and the per-endpoint response contracts: the match
// endpoint's `{status, message, data}` envelope, the chat endpoint's
// bare `{text}` reply, and the plain JSON of health and registration.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace, warn};
use url::Url;

use crate::error::Error;
use crate::models::{
    ChatReply, ChatRequest, HealthStatus, MatchEnvelope, MatchGuestRequest, MatchedGuest,
    RegisterGuestRequest, RegisteredGuest,
};
use crate::transport::TransportConfig;

/// Raw HTTP client for a concierge server.
///
/// `base_url` is the server root (e.g. `https://concierge.example.com`,
/// or `https://example.com/concierge` when mounted under a prefix). All
/// endpoints live under `{base_url}/api/`.
#[derive(Debug, Clone)]
pub struct ConciergeClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ConciergeClient {
    /// Create a new client from a `TransportConfig`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The server base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL for an API path: `{base}/api/{path}`.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/api/{path}"))?)
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// Ask the server whether a reservation exists for the given fields.
    ///
    /// Succeeds only for a 2xx response whose body is
    /// `{"status": "ok", ...}`. Every other outcome, including a body
    /// that is not JSON at all, is an [`Error::Rejected`] carrying the
    /// server's `message` when there was one.
    pub async fn match_guest(&self, request: &MatchGuestRequest) -> Result<MatchedGuest, Error> {
        let url = self.api_url("match-guest")?;
        debug!(property_id = %request.property_id, "POST {}", url);

        let resp = self.http.post(url).json(request).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        trace!(status = status.as_u16(), body = %preview(&body), "match-guest response");

        let envelope = serde_json::from_str::<MatchEnvelope>(&body).ok();

        if !status.is_success() {
            return Err(Error::Rejected {
                status: status.as_u16(),
                code: envelope.as_ref().and_then(|e| e.status.clone()),
                message: envelope.and_then(|e| e.message),
            });
        }

        match envelope {
            Some(MatchEnvelope {
                status: Some(ref rc),
                row_index,
                data,
                ..
            }) if rc == "ok" => Ok(MatchedGuest {
                row_index,
                reservation: data,
            }),
            Some(envelope) => Err(Error::Rejected {
                status: status.as_u16(),
                code: envelope.status,
                message: envelope.message,
            }),
            None => Err(Error::Rejected {
                status: status.as_u16(),
                code: None,
                message: None,
            }),
        }
    }

    /// Relay a guest message to the chat endpoint.
    ///
    /// The body is decoded whatever the HTTP status: an error page that
    /// still parses as JSON simply yields a reply without `text`. A body
    /// that does not parse is a [`Error::Deserialization`].
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, Error> {
        let url = self.api_url("chat")?;
        debug!(property_id = %request.property_id, locale = %request.locale, "POST {}", url);

        let resp = self.http.post(url).json(request).send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "chat endpoint returned an error status");
        }

        let reply: ChatReply = decode(&body)?;
        debug!(used_ai = ?reply.used_ai, has_text = reply.answer().is_some(), "chat reply");
        Ok(reply)
    }

    /// Probe the server's booking health endpoint.
    pub async fn health(&self) -> Result<HealthStatus, Error> {
        self.get_json("health").await
    }

    /// Register (or update) a guest so the host can authorize the stay.
    ///
    /// Registration does not identify the guest; the reservation still
    /// has to be matched once the host has approved it.
    pub async fn register_guest(
        &self,
        request: &RegisterGuestRequest,
    ) -> Result<RegisteredGuest, Error> {
        let registered: RegisteredGuest = self.post_json("guest/register", request).await?;
        if registered.status != "ok" {
            return Err(Error::Rejected {
                status: 200,
                code: Some(registered.status),
                message: registered.notification,
            });
        }
        Ok(registered)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode a 2xx JSON body.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.api_url(path)?;
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await?;
        Self::parse_json(resp).await
    }

    /// Send a POST request with JSON body and decode a 2xx JSON body.
    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        let url = self.api_url(path)?;
        debug!("POST {}", url);

        let resp = self.http.post(url).json(body).send().await?;
        Self::parse_json(resp).await
    }

    async fn parse_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
                body: preview(&body).to_owned(),
            });
        }

        decode(&body)
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    serde_json::from_str(body).map_err(|e| Error::Deserialization {
        message: format!("{e} (body preview: {:?})", preview(body)),
        body: body.to_owned(),
    })
}

/// First 200 bytes of a body, cut on a char boundary.
fn preview(body: &str) -> &str {
    let mut end = body.len().min(200);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> ConciergeClient {
        ConciergeClient::with_client(reqwest::Client::new(), Url::parse(base).unwrap())
    }

    #[test]
    fn api_url_handles_root_and_prefix() {
        assert_eq!(
            client("https://concierge.example.com").api_url("chat").unwrap().as_str(),
            "https://concierge.example.com/api/chat"
        );
        assert_eq!(
            client("https://example.com/concierge/")
                .api_url("/guest/register")
                .unwrap()
                .as_str(),
            "https://example.com/concierge/api/guest/register"
        );
    }

    #[test]
    fn preview_respects_char_boundaries() {
        let body = "è".repeat(150);
        let cut = preview(&body);
        assert!(cut.len() <= 200);
        assert!(body.starts_with(cut));
    }
}
