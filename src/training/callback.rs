//! Progress callbacks to the submitting platform

use super::types::ProgressUpdate;
use std::time::Duration;

/// POSTs [`ProgressUpdate`]s to a task's callback URL.
///
/// Delivery is best effort; failures are logged and never affect the task.
#[derive(Debug, Clone)]
pub struct ProgressNotifier {
    client: reqwest::Client,
    timeout: Duration,
}

impl ProgressNotifier {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }

    pub async fn notify(&self, callback_url: Option<&str>, update: &ProgressUpdate) {
        let Some(url) = callback_url.filter(|u| !u.trim().is_empty()) else {
            tracing::debug!(task_id = update.task_id, "No callback URL, skipping progress update");
            return;
        };

        let result = self
            .client
            .post(url)
            .timeout(self.timeout)
            .json(update)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                tracing::debug!(
                    task_id = update.task_id,
                    status = %update.task_status,
                    "Progress update delivered"
                );
            }
            Ok(response) => {
                tracing::warn!(
                    task_id = update.task_id,
                    http_status = response.status().as_u16(),
                    "Progress update rejected"
                );
            }
            Err(e) => {
                tracing::warn!(
                    task_id = update.task_id,
                    error = %e,
                    "Failed to deliver progress update"
                );
            }
        }
    }
}
