use super::models::Occurrence;
use crate::error::AppResult;
use async_trait::async_trait;
use tracing::info;

/// Capability for delivering a notification to the user
///
/// Fire-and-forget from the caller's point of view; permission handling and
/// the actual delivery channel live outside the core.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn deliver(&self, title: &str, body: &str) -> AppResult<()>;
}

/// Notifier that writes notifications to the application log
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn deliver(&self, title: &str, body: &str) -> AppResult<()> {
        info!("🔔 {}: {}", title, body);
        Ok(())
    }
}

/// Build the reminder notification for an occurrence
pub fn format_reminder(occurrence: &Occurrence) -> (String, String) {
    let title = format!("Reminder: {}", occurrence.title);

    let mut body = format!("Starts at {}", occurrence.start.format("%H:%M"));
    if let Some(description) = &occurrence.description {
        if !description.trim().is_empty() {
            body.push_str(&format!(" - {}", description.trim()));
        }
    }

    (title, body)
}
