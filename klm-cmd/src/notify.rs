//! Sending the combined report by email.

use crate::config::MailConfig;
use anyhow::{anyhow, Context};
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use log::info;

/// Content id the report's `<img>` points at when the chart is attached.
pub const CHART_CONTENT_ID: &str = "lake_chart";

/// Complete SMTP settings, only built when every part is configured.
#[derive(Clone)]
pub struct Mailer {
    from: Mailbox,
    recipients: Vec<Mailbox>,
    host: String,
    credentials: Credentials,
}

impl Mailer {
    /// `Ok(None)` when mail is not configured, an error when it is but an
    /// address does not parse.
    pub fn from_config(mail: &MailConfig) -> anyhow::Result<Option<Self>> {
        let (Some(host), Some(username), Some(password)) = (
            mail.smtp_host.as_ref(),
            mail.smtp_username.as_ref(),
            mail.smtp_password.as_ref(),
        ) else {
            return Ok(None);
        };
        if mail.recipients.is_empty() {
            return Ok(None);
        }

        let from_text = mail.from.as_deref().unwrap_or(username);
        let from: Mailbox = from_text
            .parse()
            .with_context(|| format!("invalid sender address '{from_text}'"))?;
        let recipients = mail
            .recipients
            .iter()
            .map(|r| {
                r.parse::<Mailbox>()
                    .with_context(|| format!("invalid recipient address '{r}'"))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(Some(Mailer {
            from,
            recipients,
            host: host.clone(),
            credentials: Credentials::new(username.clone(), password.clone()),
        }))
    }

    pub fn recipient_count(&self) -> usize {
        self.recipients.len()
    }

    /// Build the HTML message, attaching the chart inline when given.
    pub fn build_message(
        &self,
        subject: &str,
        html: String,
        chart_png: Option<Vec<u8>>,
    ) -> anyhow::Result<Message> {
        let mut builder = Message::builder().from(self.from.clone()).subject(subject);
        for recipient in &self.recipients {
            builder = builder.to(recipient.clone());
        }

        let message = match chart_png {
            Some(png) => {
                let png_type = ContentType::parse("image/png")
                    .map_err(|e| anyhow!("bad content type: {e}"))?;
                builder.multipart(
                    MultiPart::related()
                        .singlepart(SinglePart::html(html))
                        .singlepart(
                            Attachment::new_inline(CHART_CONTENT_ID.to_string()).body(png, png_type),
                        ),
                )?
            }
            None => builder.header(ContentType::TEXT_HTML).body(html)?,
        };
        Ok(message)
    }

    /// Send over STARTTLS to the configured relay.
    pub async fn send(&self, message: Message) -> anyhow::Result<()> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.host)?
            .credentials(self.credentials.clone())
            .build();
        transport.send(message).await?;
        info!("Report sent to {} recipient(s)", self.recipient_count());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mail() -> MailConfig {
        MailConfig {
            recipients: vec!["one@example.com".to_string(), "two@example.com".to_string()],
            from: None,
            smtp_host: Some("smtp.example.com".to_string()),
            smtp_username: Some("monitor@example.com".to_string()),
            smtp_password: Some("secret".to_string()),
        }
    }

    #[test]
    fn test_unconfigured_mail_is_none() {
        assert!(Mailer::from_config(&MailConfig::default()).unwrap().is_none());

        let mut no_recipients = mail();
        no_recipients.recipients.clear();
        assert!(Mailer::from_config(&no_recipients).unwrap().is_none());

        let mut no_password = mail();
        no_password.smtp_password = None;
        assert!(Mailer::from_config(&no_password).unwrap().is_none());
    }

    #[test]
    fn test_bad_recipient_is_an_error() {
        let mut bad = mail();
        bad.recipients.push("not an address".to_string());
        assert!(Mailer::from_config(&bad).is_err());
    }

    #[test]
    fn test_message_with_inline_chart() {
        let mailer = Mailer::from_config(&mail()).unwrap().unwrap();
        assert_eq!(mailer.recipient_count(), 2);
        let message = mailer
            .build_message(
                "Lake report",
                "<img src=\"cid:lake_chart\">".to_string(),
                Some(vec![0x89, b'P', b'N', b'G']),
            )
            .unwrap();
        let raw = String::from_utf8_lossy(&message.formatted()).to_string();
        assert!(raw.contains("From: monitor@example.com"));
        assert!(raw.contains("multipart/related"));
        assert!(raw.contains("Content-ID: <lake_chart>"));
    }

    #[test]
    fn test_message_without_chart() {
        let mailer = Mailer::from_config(&mail()).unwrap().unwrap();
        let message = mailer
            .build_message("Lake report", "<p>hi</p>".to_string(), None)
            .unwrap();
        let raw = String::from_utf8_lossy(&message.formatted()).to_string();
        assert!(raw.contains("text/html"));
        assert!(!raw.contains("multipart"));
    }
}
