//! Send email through the Postmark HTTP API.
//!
//! A `Message` describes the mail; a `Transport` delivers it. The only
//! transport shipped here is `PostmarkTransport`, which issues one blocking
//! `POST /email` per message.

pub mod attachment;
pub mod config;
pub mod email;
pub mod error;
pub mod transport;

pub use config::Config;
pub use email::{MailType, Message};
pub use error::Error;
pub use transport::postmark::PostmarkTransport;
pub use transport::Transport;
