pub mod http;
pub mod postmark;
mod client;

pub use client::Transport;
pub use http::{BlockingClient, HttpClient, HttpRequest, HttpResponse};
