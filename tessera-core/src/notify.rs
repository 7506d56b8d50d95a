use async_trait::async_trait;
use std::collections::HashMap;

/// A QR image to embed inline, referenced from the HTML via its cid
#[derive(Debug, Clone)]
pub struct InlineQr {
    pub content_id: String,
    /// The data the QR code encodes (a ticket id)
    pub payload: String,
}

/// A templated email: the dispatcher substitutes `{{key}}` placeholders
/// in the named template with `vars` and attaches one inline QR image
/// per entry in `qr_codes`.
#[derive(Debug, Clone)]
pub struct Notification {
    pub to: String,
    pub subject: String,
    pub template: String,
    pub vars: HashMap<String, String>,
    pub qr_codes: Vec<InlineQr>,
}

#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// Deliver one notification. Failures propagate to the caller,
    /// which decides whether they are fatal (they never are for
    /// booking flows).
    async fn send(
        &self,
        notification: &Notification,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}
