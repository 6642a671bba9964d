use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Local};
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::SmtpSettings;
use crate::ports::Notifier;

/// A rendered digest email: subject plus plain-text and HTML bodies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestMessage {
    pub subject: String,
    pub plain: String,
    pub html: String,
}

impl DigestMessage {
    pub fn new(body: &str, date: DateTime<Local>) -> Self {
        let formatted_date = date.format("%Y-%m-%d").to_string();
        let subject = format!("AI Daily Digest | {}", formatted_date);
        let plain = format!("🤖 AI Daily Digest | {}\n\n{}\n", formatted_date, body.trim_end());
        let html = render_html(body, &subject, &formatted_date);

        Self {
            subject,
            plain,
            html,
        }
    }
}

fn render_html(body: &str, title: &str, formatted_date: &str) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    html.push_str("  <meta charset=\"UTF-8\">\n");
    html.push_str(&format!("  <title>{}</title>\n", escape_html(title)));
    html.push_str("  <style>\n");
    html.push_str("    body { font-family: Arial, sans-serif; max-width: 760px; margin: 24px auto; padding: 0 16px; line-height: 1.6; color: #2c3e50; }\n");
    html.push_str("    h1 { border-bottom: 3px solid #3498db; padding-bottom: 8px; font-size: 1.4em; }\n");
    html.push_str("    h1 .date { display: block; font-size: 0.7em; font-weight: normal; color: #555; }\n");
    html.push_str("    p { margin: 0 0 12px 0; }\n");
    html.push_str("    a { color: #3498db; }\n");
    html.push_str("  </style>\n");
    html.push_str("</head>\n<body>\n");

    html.push_str(&format!(
        "<h1>🤖 AI Daily Digest<span class=\"date\">{}</span></h1>\n",
        escape_html(formatted_date)
    ));

    // Blank lines separate paragraphs; single newlines become <br>.
    for paragraph in body.split("\n\n").map(str::trim).filter(|p| !p.is_empty()) {
        let lines: Vec<String> = paragraph.lines().map(linkify_line).collect();
        html.push_str(&format!("<p>{}</p>\n", lines.join("<br>\n")));
    }

    html.push_str("</body>\n</html>");
    html
}

/// Escapes a line and turns a bare `http(s)://` URL into a link.
fn linkify_line(line: &str) -> String {
    line.split(' ')
        .map(|word| {
            if word.starts_with("http://") || word.starts_with("https://") {
                let escaped = escape_html(word);
                format!("<a href=\"{}\">{}</a>", escaped, escaped)
            } else {
                escape_html(word)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Delivers digests over an authenticated STARTTLS SMTP session.
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpNotifier {
    pub fn new(settings: &SmtpSettings, recipient: &str) -> Result<Self> {
        let from: Mailbox = settings
            .username
            .parse()
            .with_context(|| format!("Invalid sender address: {}", settings.username))?;
        let to: Mailbox = recipient
            .parse()
            .with_context(|| format!("Invalid recipient address: {}", recipient))?;

        let credentials = Credentials::new(settings.username.clone(), settings.password.clone());
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
            .with_context(|| format!("SMTP relay configuration error for {}", settings.host))?
            .port(settings.port)
            .credentials(credentials)
            .build();

        Ok(Self { transport, from, to })
    }

    fn build_message(&self, message: &DigestMessage) -> Result<Message> {
        Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(message.subject.clone())
            .multipart(MultiPart::alternative_plain_html(
                message.plain.clone(),
                message.html.clone(),
            ))
            .context("Failed to build email message")
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, message: &DigestMessage) -> Result<()> {
        let email = self.build_message(message)?;

        self.transport
            .send(email)
            .await
            .context("SMTP send failed")?;

        tracing::info!(to = %self.to, subject = %message.subject, "digest email delivered");
        Ok(())
    }
}

/// Prints the digest to stdout instead of sending it.
pub struct ConsoleNotifier;

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn send(&self, message: &DigestMessage) -> Result<()> {
        println!("Subject: {}\n", message.subject);
        println!("{}", message.plain);
        Ok(())
    }
}
