//! Report e-mail composition and delivery.

use std::fs;
use std::path::Path;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::blocking::Client;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::{self, EmailSettings};
use crate::error::{PriceRankError, Result};
use crate::models::RankChangeEvent;

pub const ALERT_SUBJECT: &str = "Product Rank Change Alert";
pub const NO_CHANGE_SUBJECT: &str = "Price Report - No Rank Changes";

// ---------------------------------------------------------------------------
// Email
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub filename: String,
    pub mime_type: String,
    pub content: Vec<u8>,
}

impl Attachment {
    /// Read a PDF from disk. Returns `Ok(None)` when the file does not exist.
    pub fn pdf(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            warn!(path = %path.display(), "report file missing; sending without attachment");
            return Ok(None);
        }
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "report.pdf".to_string());
        Ok(Some(Self {
            filename,
            mime_type: "application/pdf".to_string(),
            content: fs::read(path)?,
        }))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Email {
    pub subject: String,
    pub body: String,
    pub attachment: Option<Attachment>,
}

impl Email {
    /// Alert listing every rank change, or the "no changes" notice.
    pub fn for_changes(changes: &[RankChangeEvent]) -> Self {
        if changes.is_empty() {
            return Self {
                subject: NO_CHANGE_SUBJECT.to_string(),
                body: "No rank changes occurred for any products.\n\nSee the attached report for details."
                    .to_string(),
                attachment: None,
            };
        }

        let mut body = String::from("The following product(s) have experienced a rank change:\n\n");
        for change in changes {
            body.push_str(&format!(
                "Product: {}\nDate: {}\nPrevious Rank: {}\nCurrent Rank: {}\n\n",
                change.product,
                change.date.format("%d-%m-%Y"),
                change.previous_rank,
                change.current_rank
            ));
        }

        Self {
            subject: ALERT_SUBJECT.to_string(),
            body,
            attachment: None,
        }
    }

    pub fn with_attachment(mut self, attachment: Option<Attachment>) -> Self {
        self.attachment = attachment;
        self
    }
}

// ---------------------------------------------------------------------------
// Notifier
// ---------------------------------------------------------------------------

/// Outbound delivery of the report e-mail.
pub trait Notifier {
    fn send(&self, email: &Email) -> Result<()>;
}

/// Logs the e-mail instead of sending it.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn send(&self, email: &Email) -> Result<()> {
        info!(
            subject = %email.subject,
            attachment = email.attachment.as_ref().map(|a| a.filename.as_str()).unwrap_or("none"),
            "dry run; e-mail not sent\n{}",
            email.body
        );
        Ok(())
    }
}

/// Stands in when delivery is not configured; every send fails with `reason`.
pub struct DisabledNotifier {
    reason: String,
}

impl DisabledNotifier {
    pub fn new(reason: &str) -> Self {
        Self {
            reason: reason.to_string(),
        }
    }
}

impl Notifier for DisabledNotifier {
    fn send(&self, _email: &Email) -> Result<()> {
        Err(PriceRankError::Notification(self.reason.clone()))
    }
}

// ---------------------------------------------------------------------------
// SendGrid
// ---------------------------------------------------------------------------

/// Sends through the SendGrid v3 mail API.
pub struct SendGridNotifier {
    settings: EmailSettings,
    client: Client,
    endpoint: String,
}

impl SendGridNotifier {
    pub fn new(settings: EmailSettings, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            settings,
            client,
            endpoint: config::SENDGRID_SEND_URL.to_string(),
        })
    }

    /// Point at a different API base, e.g. a local mock.
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    pub fn payload<'a>(&'a self, email: &'a Email) -> SendGridMail<'a> {
        SendGridMail {
            personalizations: vec![Personalization {
                to: self
                    .settings
                    .recipients
                    .iter()
                    .map(|r| Address { email: r })
                    .collect(),
            }],
            from: Address {
                email: &self.settings.sender,
            },
            subject: &email.subject,
            content: vec![MailContent {
                kind: "text/plain",
                value: &email.body,
            }],
            attachments: email
                .attachment
                .iter()
                .map(|a| MailAttachment {
                    content: STANDARD.encode(&a.content),
                    kind: &a.mime_type,
                    filename: &a.filename,
                    disposition: "attachment",
                })
                .collect(),
        }
    }
}

impl Notifier for SendGridNotifier {
    fn send(&self, email: &Email) -> Result<()> {
        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.settings.api_key)
            .json(&self.payload(email))
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(PriceRankError::Notification(format!(
                "SendGrid returned {}: {}",
                status, body
            )));
        }

        info!(
            recipients = %self.settings.recipients.join(", "),
            status = status.as_u16(),
            "e-mail sent"
        );
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct SendGridMail<'a> {
    pub personalizations: Vec<Personalization<'a>>,
    pub from: Address<'a>,
    pub subject: &'a str,
    pub content: Vec<MailContent<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<MailAttachment<'a>>,
}

#[derive(Debug, Serialize)]
pub struct Personalization<'a> {
    pub to: Vec<Address<'a>>,
}

#[derive(Debug, Serialize)]
pub struct Address<'a> {
    pub email: &'a str,
}

#[derive(Debug, Serialize)]
pub struct MailContent<'a> {
    #[serde(rename = "type")]
    pub kind: &'a str,
    pub value: &'a str,
}

#[derive(Debug, Serialize)]
pub struct MailAttachment<'a> {
    pub content: String,
    #[serde(rename = "type")]
    pub kind: &'a str,
    pub filename: &'a str,
    pub disposition: &'a str,
}
