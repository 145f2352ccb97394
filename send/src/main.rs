use std::io::Read;
use std::path::PathBuf;

use structopt::StructOpt;

use postmark::{Message, PostmarkTransport, Transport};

#[derive(Debug, StructOpt)]
#[structopt(
    name = "postmark-send",
    about = "Send one email through Postmark. The body is read from stdin."
)]
struct Opt {
    /// Config file (TOML); POSTMARK_* environment variables override it
    #[structopt(short, long, parse(from_os_str))]
    config: Option<PathBuf>,

    #[structopt(short, long)]
    from: String,

    /// Display name for the sender
    #[structopt(long)]
    from_name: Option<String>,

    #[structopt(short, long, required = true)]
    to: Vec<String>,

    #[structopt(long)]
    cc: Vec<String>,

    #[structopt(long)]
    bcc: Vec<String>,

    #[structopt(long)]
    reply_to: Option<String>,

    #[structopt(short, long)]
    subject: String,

    #[structopt(long)]
    tag: Option<String>,

    /// Treat stdin as HTML; the plaintext alternative comes from --alt-text
    #[structopt(long)]
    html: bool,

    #[structopt(long, default_value = "")]
    alt_text: String,

    #[structopt(short, long, parse(from_os_str))]
    attach: Vec<PathBuf>,

    /// Use https and verify the server certificate
    #[structopt(long)]
    secure: bool,

    #[structopt(long)]
    no_wordwrap: bool,
}

fn build_message(opt: &Opt, body: &str) -> Message {
    let mut mail = Message::new()
        .with_sender_named(&opt.from, opt.from_name.as_deref().unwrap_or(""))
        .with_recipients(opt.to.clone())
        .with_cc(opt.cc.clone())
        .with_bcc(opt.bcc.clone())
        .with_subject(&opt.subject)
        .with_wordwrap(!opt.no_wordwrap);

    mail = if opt.html {
        mail.with_html(body, &opt.alt_text)
    } else {
        mail.with_text(body)
    };

    if let Some(reply_to) = &opt.reply_to {
        mail = mail.with_reply_to(reply_to);
    }

    if let Some(tag) = &opt.tag {
        mail = mail.with_tag(tag);
    }

    for path in &opt.attach {
        mail = mail.with_attachment(path);
    }

    mail
}

fn run(opt: Opt) -> Result<(), postmark::Error> {
    let config = postmark::config::load_config(opt.config.as_deref())?;
    let mut transport = PostmarkTransport::new(&config)?;

    if opt.secure {
        transport.set_transport_security(true)?;
    }

    // Get message body from stdin
    let mut body = String::new();
    std::io::stdin().read_to_string(&mut body)?;

    let mail = build_message(&opt, &body);
    transport.send(&mail)
}

fn main() {
    // Init logger
    env_logger::builder().format_timestamp_micros().init();

    let opt = Opt::from_args();

    if let Err(e) = run(opt) {
        match e.provider_code() {
            Some(code) => log::error!("Postmark rejected the email (error code {})", code),
            None => log::error!("Email not sent"),
        }

        eprintln!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opt(args: &[&str]) -> Opt {
        let mut argv = vec!["postmark-send"];
        argv.extend_from_slice(args);
        Opt::from_iter(argv)
    }

    #[test]
    fn text_message_from_args() {
        let opt = opt(&[
            "--from=me@example.com",
            "--to=a@example.com",
            "--to=b@example.com",
            "--subject=Hi",
            "--tag=digest",
        ]);

        let mail = build_message(&opt, "body");

        assert_eq!(mail.sender, "me@example.com");
        assert_eq!(mail.recipients, vec!["a@example.com", "b@example.com"]);
        assert_eq!(mail.tag.as_deref(), Some("digest"));
        assert_eq!(mail.text_body(), "body");
        assert!(mail.html_body().is_none());
        assert!(mail.wordwrap);
    }

    #[test]
    fn html_message_from_args() {
        let opt = opt(&[
            "--from=me@example.com",
            "--from-name=Me",
            "--to=a@example.com",
            "--subject=Hi",
            "--html",
            "--alt-text=plain",
            "--attach=report.pdf",
            "--no-wordwrap",
        ]);

        let mail = build_message(&opt, "<p>rich</p>");

        assert_eq!(mail.sender, "Me <me@example.com>");
        assert_eq!(mail.html_body(), Some("<p>rich</p>"));
        assert_eq!(mail.text_body(), "plain");
        assert_eq!(mail.attachments, vec![PathBuf::from("report.pdf")]);
        assert!(mail.tag.is_none());
        assert!(!mail.wordwrap);
    }

    #[test]
    fn recipient_is_required() {
        let argv = vec!["postmark-send", "--from=me@example.com", "--subject=Hi"];
        let result = Opt::from_iter_safe(argv);
        assert!(result.is_err());
    }
}
