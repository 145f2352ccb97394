use std::fmt;
use std::time::Duration;

use crate::Error;

// Header values never printed by `HttpRequest`'s Debug
const REDACTED_HEADERS: &[&str] = &["X-Postmark-Server-Token", "Authorization"];

/// A single outbound POST, fully built
#[derive(Clone)]
pub struct HttpRequest {
    pub url: url::Url,
    pub headers: Vec<(String, String)>,
    pub body: String,

    /// Require https and verify the peer certificate and hostname
    pub verify_tls: bool,
}

#[derive(Clone, Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let headers: Vec<(&str, &str)> = self
            .headers
            .iter()
            .map(|(k, v)| {
                if REDACTED_HEADERS.iter().any(|h| h.eq_ignore_ascii_case(k)) {
                    (k.as_str(), "<redacted>")
                } else {
                    (k.as_str(), v.as_str())
                }
            })
            .collect();

        f.debug_struct("HttpRequest")
            .field("url", &self.url.as_str())
            .field("headers", &headers)
            .field("body", &self.body)
            .field("verify_tls", &self.verify_tls)
            .finish()
    }
}

/// Blocking HTTP seam used by transports
pub trait HttpClient {
    fn post(&self, request: &HttpRequest) -> Result<HttpResponse, Error>;
}

/// `reqwest` blocking clients with a fixed request timeout.
///
/// Both clients are built once; requests pick one by `verify_tls`.
pub struct BlockingClient {
    plain: reqwest::blocking::Client,
    verified: reqwest::blocking::Client,
}

impl BlockingClient {
    pub fn new(timeout: Duration) -> Result<Self, Error> {
        let plain = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;

        let verified = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .https_only(true)
            .danger_accept_invalid_certs(false)
            .build()?;

        Ok(Self { plain, verified })
    }
}

impl HttpClient for BlockingClient {
    fn post(&self, request: &HttpRequest) -> Result<HttpResponse, Error> {
        let client = if request.verify_tls {
            &self.verified
        } else {
            &self.plain
        };

        let mut req = client
            .post(request.url.clone())
            .body(request.body.clone());

        for (name, value) in &request.headers {
            req = req.header(name.as_str(), value.as_str());
        }

        let resp = req.send()?;
        let status = resp.status().as_u16();
        let body = resp.bytes()?.to_vec();

        Ok(HttpResponse { status, body })
    }
}
