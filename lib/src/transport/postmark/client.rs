use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};

use super::api;

use crate::attachment;
use crate::config::Config;
use crate::email::Message;
use crate::transport::{BlockingClient, HttpClient, HttpRequest, Transport};
use crate::Error;

/// Sends messages through the Postmark `/email` endpoint
pub struct PostmarkTransport<C = BlockingClient> {
    api_key: String,
    endpoint: url::Url,
    secure: bool,
    content_type: String,
    client: C,
}

impl PostmarkTransport<BlockingClient> {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let client = BlockingClient::new(Duration::from_secs(config.timeout))?;
        Self::with_client(config, client)
    }
}

impl<C: HttpClient> PostmarkTransport<C> {
    pub fn with_client(config: &Config, client: C) -> Result<Self, Error> {
        config.validate()?;

        let endpoint = url::Url::parse(&config.endpoint)?;
        if endpoint.scheme() != "http" && endpoint.scheme() != "https" {
            return Err(Error::Config(format!(
                "endpoint must be http or https: {}",
                endpoint
            )));
        }

        let mut transport = Self {
            api_key: config.api_key.clone(),
            endpoint,
            secure: false,
            content_type: config.content_type.clone(),
            client,
        };

        // Never downgrade: an https endpoint keeps its scheme and is verified
        if config.secure || transport.endpoint.scheme() == "https" {
            transport.set_transport_security(true)?;
        }

        Ok(transport)
    }

    /// Switch between https with verification and plain http
    pub fn set_transport_security(&mut self, enabled: bool) -> Result<(), Error> {
        let scheme = if enabled { "https" } else { "http" };

        self.endpoint
            .set_scheme(scheme)
            .map_err(|_| Error::Config(format!("cannot switch endpoint to {}", scheme)))?;
        self.secure = enabled;

        Ok(())
    }

    pub fn endpoint(&self) -> &url::Url {
        &self.endpoint
    }

    pub fn is_secure(&self) -> bool {
        self.secure
    }

    /// Validate the message, resolve attachments and build the request.
    ///
    /// No network I/O happens here.
    pub fn build_request(&self, message: &Message) -> Result<HttpRequest, Error> {
        if message.sender.trim().is_empty() {
            return Err(Error::InvalidMessage("no sender".to_string()));
        }

        if message.recipients.is_empty() {
            return Err(Error::InvalidMessage("no recipients".to_string()));
        }

        let attachments = attachment::resolve(&message.attachments)?;
        let payload = api::Payload::new(message, attachments);

        Ok(HttpRequest {
            url: self.endpoint.clone(),
            headers: vec![
                (ACCEPT.as_str().to_string(), api::POSTMARK_ACCEPT.to_string()),
                (CONTENT_TYPE.as_str().to_string(), self.content_type.clone()),
                (api::POSTMARK_TOKEN_HEADER.to_string(), self.api_key.clone()),
            ],
            body: serde_json::to_string(&payload)?,
            verify_tls: self.secure,
        })
    }
}

impl<C: HttpClient> Transport for PostmarkTransport<C> {
    fn send(&self, message: &Message) -> Result<(), Error> {
        log::info!(
            "Sending \"{}\" to {} recipient(s) via {}",
            message.subject,
            message.recipients.len(),
            self.endpoint
        );

        let request = self.build_request(message)?;
        let resp = self.client.post(&request)?;

        log::debug!("Postmark responded with status {}", resp.status);

        match api::map_status(&resp) {
            Ok(()) => {
                log::info!("Email sent");
                Ok(())
            }
            Err(e) => {
                log::error!("Could not send email: {}", e);
                Err(e)
            }
        }
    }
}
