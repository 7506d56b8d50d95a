use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tessera_core::notify::{Notification, NotificationSender};
use tracing::{info, warn};

use crate::template;

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Unknown template: {0}")]
    UnknownTemplate(String),

    #[error("Invalid address: {0}")]
    Address(String),

    #[error("Failed to build email: {0}")]
    Build(String),

    #[error("SMTP relay error: {0}")]
    Transport(String),

    #[error("Failed to send email: {0}")]
    Send(String),
}

/// SMTP-backed notification dispatcher.
///
/// Renders the named template, attaches the logo and one QR image per
/// ticket inline, and delivers over a fresh relay connection. Missing
/// ancillary images degrade to a text-only message; delivery failures
/// propagate to the caller.
#[derive(Clone)]
pub struct SmtpMailer {
    server: String,
    port: u16,
    credentials: Credentials,
    from: String,
    logo_path: Option<String>,
}

impl SmtpMailer {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        server: String,
        port: u16,
        username: String,
        password: String,
        from_email: String,
        from_name: String,
        logo_path: Option<String>,
    ) -> Self {
        Self {
            server,
            port,
            credentials: Credentials::new(username, password),
            from: format!("{} <{}>", from_name, from_email),
            logo_path,
        }
    }

    /// A new transport per message, in place of connection pooling
    fn build_transport(&self) -> Result<SmtpTransport, NotifyError> {
        Ok(SmtpTransport::relay(&self.server)
            .map_err(|e| NotifyError::Transport(e.to_string()))?
            .port(self.port)
            .credentials(self.credentials.clone())
            .build())
    }

    fn build_body(&self, notification: &Notification) -> Result<MultiPart, NotifyError> {
        let template = template::body(&notification.template)
            .ok_or_else(|| NotifyError::UnknownTemplate(notification.template.clone()))?;
        let html = template::render(template, &notification.vars);

        let png_type = ContentType::parse("image/png")
            .map_err(|e| NotifyError::Build(e.to_string()))?;

        let mut related = MultiPart::related().singlepart(
            lettre::message::SinglePart::builder()
                .header(ContentType::TEXT_HTML)
                .body(html),
        );

        // The logo is ancillary: skip it if the file cannot be read
        if let Some(path) = &self.logo_path {
            match std::fs::read(path) {
                Ok(bytes) => {
                    related = related.singlepart(
                        Attachment::new_inline("logo".to_string())
                            .body(bytes, png_type.clone()),
                    );
                }
                Err(e) => warn!("Failed to attach logo {}: {}", path, e),
            }
        }

        // One inline QR per ticket; a bad payload drops that image only
        for qr in &notification.qr_codes {
            match tessera_render::qr::png(&qr.payload, 300) {
                Ok(bytes) => {
                    related = related.singlepart(
                        Attachment::new_inline(qr.content_id.clone())
                            .body(bytes, png_type.clone()),
                    );
                }
                Err(e) => warn!("Failed to render QR image {}: {}", qr.content_id, e),
            }
        }

        Ok(related)
    }
}

#[async_trait]
impl NotificationSender for SmtpMailer {
    async fn send(
        &self,
        notification: &Notification,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let body = self.build_body(notification)?;

        let email = Message::builder()
            .from(
                self.from
                    .parse()
                    .map_err(|e| NotifyError::Address(format!("Invalid from address: {e}")))?,
            )
            .to(notification
                .to
                .parse()
                .map_err(|e| NotifyError::Address(format!("Invalid to address: {e}")))?)
            .subject(notification.subject.clone())
            .multipart(body)
            .map_err(|e| NotifyError::Build(e.to_string()))?;

        let mailer = self.build_transport()?;

        tokio::task::spawn_blocking(move || {
            mailer
                .send(&email)
                .map_err(|e| NotifyError::Send(e.to_string()))
        })
        .await
        .map_err(|e| NotifyError::Send(format!("Email task failed: {e}")))??;

        info!("Email sent to {}", notification.to);
        Ok(())
    }
}

/// Stand-in dispatcher for deployments without SMTP credentials; logs
/// the would-be email and reports success.
pub struct LogMailer;

#[async_trait]
impl NotificationSender for LogMailer {
    async fn send(
        &self,
        notification: &Notification,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        info!(
            "Email delivery disabled; dropping \"{}\" to {} ({} inline QR codes)",
            notification.subject,
            notification.to,
            notification.qr_codes.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tessera_core::notify::InlineQr;

    fn sample_notification() -> Notification {
        let mut vars = HashMap::new();
        vars.insert("userName".to_string(), "Casey Customer".to_string());
        vars.insert("eventName".to_string(), "Orchestra Night".to_string());
        vars.insert("eventDate".to_string(), "Oct 12, 2026 at 07:30 PM".to_string());
        vars.insert(
            "eventAddress".to_string(),
            "12 Concert Hall Way, Portland, OR 97201".to_string(),
        );
        vars.insert("eventInstruction".to_string(), "Doors open early".to_string());
        vars.insert("mapUrl".to_string(), "https://example.com/map".to_string());

        Notification {
            to: "casey@example.com".to_string(),
            subject: "Booking Confirmation - Orchestra Night".to_string(),
            template: "booking-confirmation".to_string(),
            vars,
            qr_codes: vec![InlineQr {
                content_id: "qr-T1a2b3c4d".to_string(),
                payload: "T1a2b3c4d".to_string(),
            }],
        }
    }

    #[test]
    fn test_build_body_with_qr_attachments() {
        let mailer = SmtpMailer::new(
            "smtp.example.com".to_string(),
            587,
            "user".to_string(),
            "pass".to_string(),
            "noreply@example.com".to_string(),
            "Tessera".to_string(),
            None,
        );

        // Rendering must succeed without touching the network
        assert!(mailer.build_body(&sample_notification()).is_ok());
    }

    #[test]
    fn test_unknown_template_is_an_error() {
        let mailer = SmtpMailer::new(
            "smtp.example.com".to_string(),
            587,
            "user".to_string(),
            "pass".to_string(),
            "noreply@example.com".to_string(),
            "Tessera".to_string(),
            None,
        );

        let mut notification = sample_notification();
        notification.template = "no-such-template".to_string();

        assert!(matches!(
            mailer.build_body(&notification),
            Err(NotifyError::UnknownTemplate(_))
        ));
    }

    #[tokio::test]
    async fn test_log_mailer_always_succeeds() {
        assert!(LogMailer.send(&sample_notification()).await.is_ok());
    }
}
