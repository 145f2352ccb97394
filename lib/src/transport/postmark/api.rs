use serde::{Deserialize, Serialize};

use crate::attachment::Attachment;
use crate::email::Message;
use crate::transport::HttpResponse;
use crate::Error;

pub const POSTMARK_TOKEN_HEADER: &str = "X-Postmark-Server-Token";
pub const POSTMARK_ACCEPT: &str = "application/json";

/// Request body for `POST /email`
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Payload {
    pub subject: String,
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bcc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_body: Option<String>,
    pub text_body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

/// Error body returned with any non-200 status
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ErrorResponse {
    pub message: String,
    pub error_code: i64,
}

fn join(addresses: &[String]) -> Option<String> {
    if addresses.is_empty() {
        None
    } else {
        Some(addresses.join(", "))
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

impl Payload {
    /// Build the payload from a message and its already-resolved attachments
    pub fn new(message: &Message, attachments: Vec<Attachment>) -> Self {
        Self {
            subject: message.subject.clone(),
            from: message.sender.clone(),
            to: message.recipients.join(", "),
            cc: join(&message.cc),
            bcc: join(&message.bcc),
            reply_to: non_empty(&message.reply_to),
            html_body: message.html_body().map(|b| b.to_string()),
            text_body: message.text_body(),
            tag: non_empty(&message.tag),
            attachments,
        }
    }
}

/// Map a Postmark response into an error if applicable.
///
/// Only a 200 counts as success and its body is not inspected.
pub fn map_status(resp: &HttpResponse) -> Result<(), Error> {
    if resp.status == 200 {
        return Ok(());
    }

    match serde_json::from_slice::<ErrorResponse>(&resp.body) {
        Ok(err) => Err(Error::Provider {
            status: resp.status,
            message: err.message,
            code: err.error_code,
        }),
        Err(_) => Err(Error::UnexpectedResponse {
            status: resp.status,
            body: String::from_utf8_lossy(&resp.body).into_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn ok_ignores_body() {
        assert!(map_status(&response(200, "not json")).is_ok());
        assert!(map_status(&response(200, "")).is_ok());
    }

    #[test]
    fn provider_error_is_surfaced() {
        let result = map_status(&response(
            422,
            r#"{"Message":"Invalid email","ErrorCode":300}"#,
        ));

        match result {
            Err(Error::Provider {
                status,
                message,
                code,
            }) => {
                assert_eq!(status, 422);
                assert_eq!(message, "Invalid email");
                assert_eq!(code, 300);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn other_success_codes_are_failures() {
        let result = map_status(&response(201, r#"{"Message":"Created","ErrorCode":0}"#));
        assert_eq!(result.unwrap_err().provider_code(), Some(0));
    }

    #[test]
    fn garbage_error_body() {
        match map_status(&response(500, "<html>oops</html>")) {
            Err(Error::UnexpectedResponse { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "<html>oops</html>");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
