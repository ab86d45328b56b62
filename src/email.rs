use tracing::{debug, info};

/// Outbound email side channel. Delivery is fire-and-forget: it runs
/// outside any ledger unit and a failure is logged, never surfaced to
/// the caller.
pub struct Mailer;

impl Mailer {
    pub fn new() -> Self {
        Self
    }

    pub fn send(&self, to: &str, subject: &str, body: &str) {
        let to = to.to_string();
        let subject = subject.to_string();
        let body = body.to_string();

        tokio::spawn(async move {
            info!(%to, %subject, "email dispatched");
            debug!(%to, body, "email body");
        });
    }
}

impl Default for Mailer {
    fn default() -> Self {
        Self::new()
    }
}
