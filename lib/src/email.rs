//! Generic Email representation.
//! Provider-specific transports turn this into their own wire types.
use std::path::PathBuf;

// Default line length used when word-wrapping text bodies
pub const DEFAULT_WRAP_CHARS: usize = 76;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MailType {
    Text,
    Html,
}

impl Default for MailType {
    fn default() -> Self {
        MailType::Text
    }
}

#[derive(Clone, Debug)]
pub struct Message {
    pub sender: String,
    pub recipients: Vec<String>,
    pub cc: Vec<String>,
    pub bcc: Vec<String>,
    pub reply_to: Option<String>,
    pub subject: String,

    /// Plaintext body, or the HTML body when `mail_type` is `Html`
    pub body: String,

    /// Plaintext rendering sent alongside an HTML body
    pub alt_body: String,

    pub mail_type: MailType,
    pub wordwrap: bool,
    pub wrap_chars: usize,

    /// Provider-side label used for categorizing sent mail
    pub tag: Option<String>,

    /// Local files resolved when the message is sent
    pub attachments: Vec<PathBuf>,
}

impl Default for Message {
    fn default() -> Self {
        Self {
            sender: String::new(),
            recipients: Vec::new(),
            cc: Vec::new(),
            bcc: Vec::new(),
            reply_to: None,
            subject: String::new(),
            body: String::new(),
            alt_body: String::new(),
            mail_type: MailType::Text,
            wordwrap: true,
            wrap_chars: DEFAULT_WRAP_CHARS,
            tag: None,
            attachments: Vec::new(),
        }
    }
}

impl Message {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_sender(mut self, sender: &str) -> Self {
        self.sender = sender.to_string();
        self
    }

    /// Sets the sender as `Name <address>`
    pub fn with_sender_named(mut self, sender: &str, name: &str) -> Self {
        self.sender = if name.is_empty() {
            sender.to_string()
        } else {
            format!("{} <{}>", name, sender)
        };
        self
    }

    pub fn with_recipients(mut self, recipients: Vec<String>) -> Self {
        self.recipients = recipients;
        self
    }

    pub fn with_recipient(mut self, recipient: &str) -> Self {
        self.recipients.push(recipient.to_string());
        self
    }

    pub fn with_cc(mut self, cc: Vec<String>) -> Self {
        self.cc = cc;
        self
    }

    pub fn with_bcc(mut self, bcc: Vec<String>) -> Self {
        self.bcc = bcc;
        self
    }

    pub fn with_reply_to(mut self, reply_to: &str) -> Self {
        self.reply_to = Some(reply_to.to_string());
        self
    }

    pub fn with_subject(mut self, subject: &str) -> Self {
        self.subject = subject.to_string();
        self
    }

    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tag = Some(tag.to_string());
        self
    }

    /// Plaintext message
    pub fn with_text(mut self, body: &str) -> Self {
        self.mail_type = MailType::Text;
        self.body = body.to_string();
        self
    }

    /// HTML message with its plaintext alternative
    pub fn with_html(mut self, html: &str, alt_body: &str) -> Self {
        self.mail_type = MailType::Html;
        self.body = html.to_string();
        self.alt_body = alt_body.to_string();
        self
    }

    pub fn with_wordwrap(mut self, wordwrap: bool) -> Self {
        self.wordwrap = wordwrap;
        self
    }

    pub fn with_wrap_chars(mut self, wrap_chars: usize) -> Self {
        self.wrap_chars = wrap_chars;
        self
    }

    pub fn with_attachment<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.attachments.push(path.into());
        self
    }

    /// The plaintext body as it goes on the wire.
    ///
    /// For HTML mail this is the alternative rendering.
    pub fn text_body(&self) -> String {
        let text = match self.mail_type {
            MailType::Text => &self.body,
            MailType::Html => &self.alt_body,
        };

        if self.wordwrap {
            word_wrap(text, self.wrap_chars)
        } else {
            text.clone()
        }
    }

    /// The HTML body, only for HTML mail
    pub fn html_body(&self) -> Option<&str> {
        match self.mail_type {
            MailType::Html => Some(&self.body),
            MailType::Text => None,
        }
    }
}

/// Wraps each line of `text` at whitespace so no line exceeds `width`.
///
/// Words longer than `width` are left intact on a line of their own.
/// Line endings are normalized to `\n`. Lines that need wrapping lose their
/// leading indentation and runs of spaces collapse to one; lines that already
/// fit are kept verbatim.
pub fn word_wrap(text: &str, width: usize) -> String {
    let width = width.max(1);
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut out = Vec::new();

    for line in text.split('\n') {
        if line.chars().count() <= width {
            out.push(line.to_string());
            continue;
        }

        let mut current = String::new();
        let mut current_len = 0;

        for word in line.split(' ').filter(|w| !w.is_empty()) {
            let word_len = word.chars().count();

            if current_len > 0 && current_len + 1 + word_len > width {
                out.push(std::mem::take(&mut current));
                current_len = 0;
            }

            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }

            current.push_str(word);
            current_len += word_len;
        }

        out.push(current);
    }

    out.join("\n")
}
