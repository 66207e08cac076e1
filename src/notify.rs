//! Notification seam: the core reports reminders and sync results here
//! and never renders anything itself.

use async_trait::async_trait;
use tracing::info;

/// Outbound notification sink. Desktop toasts, tray balloons or chat
/// bridges all live behind this.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, title: &str, body: &str);
}

/// Notifier that writes to the log; the default sink for headless runs.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, title: &str, body: &str) {
        info!(title, body, "Notification");
    }
}
