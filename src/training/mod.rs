//! Training task orchestration
//!
//! Accepts training jobs from the platform backend, runs them in the
//! background and reports progress to a callback URL.
//!
//! ## Task lifecycle
//!
//! ```text
//! start ──► RUNNING ──► COMPLETED
//!              │   ├──► FAILED   (unsupported model, bad config, trainer error)
//!              │   └──► STOPPED  (stop requested)
//! ```
//!
//! The task table is only mutated through [`TrainingOrchestrator`]; a
//! terminal snapshot is never changed again. Stopping is cooperative: the
//! running job observes its `CancellationToken` between and during epochs.

mod callback;
pub mod handler;
mod trainer;
mod types;

pub use callback::ProgressNotifier;
pub use handler::training_router;
pub use trainer::{PacedTrainer, Trainer};
pub use types::{
    progress_percent, EpochMetrics, ModelConfig, ModelType, ProgressUpdate, TaskId, TaskSnapshot,
    TaskStatus, TrainingRequest,
};

use crate::config::TrainingConfig;
use crate::error::{Error, Result};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

struct TaskEntry {
    snapshot: TaskSnapshot,
    cancel: CancellationToken,
}

/// Owner of the training task table
#[derive(Clone)]
pub struct TrainingOrchestrator {
    tasks: Arc<RwLock<HashMap<TaskId, TaskEntry>>>,
    trainer: Arc<dyn Trainer>,
    notifier: ProgressNotifier,
}

impl TrainingOrchestrator {
    pub fn new(trainer: Arc<dyn Trainer>, notifier: ProgressNotifier) -> Self {
        Self {
            tasks: Arc::new(RwLock::new(HashMap::new())),
            trainer,
            notifier,
        }
    }

    pub fn from_config(config: &TrainingConfig) -> Self {
        Self::new(
            Arc::new(PacedTrainer::new(Duration::from_millis(config.epoch_interval_ms))),
            ProgressNotifier::new(Duration::from_secs(config.callback_timeout_secs)),
        )
    }

    /// Register a task and run it in the background.
    ///
    /// A task id that is still running is rejected; a finished one may be
    /// started again.
    pub async fn start(&self, request: TrainingRequest) -> Result<TaskSnapshot> {
        let cancel = CancellationToken::new();
        let snapshot = TaskSnapshot::running(request.task_id, request.model_type.clone());

        {
            let mut tasks = self.tasks.write().await;
            if let Some(existing) = tasks.get(&request.task_id) {
                if !existing.snapshot.status.is_terminal() {
                    return Err(Error::Training(format!(
                        "任务 {} 已经在运行中",
                        request.task_id
                    )));
                }
            }
            tasks.insert(
                request.task_id,
                TaskEntry {
                    snapshot: snapshot.clone(),
                    cancel: cancel.clone(),
                },
            );
        }

        tracing::info!(
            task_id = request.task_id,
            model_type = %request.model_type,
            trainer = self.trainer.name(),
            "Training task started"
        );

        let this = self.clone();
        tokio::spawn(async move {
            this.run(request, cancel).await;
        });

        Ok(snapshot)
    }

    /// Ask a running task to stop.
    pub async fn stop(&self, task_id: TaskId) -> Result<()> {
        let tasks = self.tasks.read().await;
        match tasks.get(&task_id) {
            Some(entry) if !entry.snapshot.status.is_terminal() => {
                tracing::info!(task_id, "Stop requested for training task");
                entry.cancel.cancel();
                Ok(())
            }
            _ => Err(Error::Training(format!("任务 {} 不存在或未运行", task_id))),
        }
    }

    pub async fn status(&self, task_id: TaskId) -> Option<TaskSnapshot> {
        self.tasks
            .read()
            .await
            .get(&task_id)
            .map(|entry| entry.snapshot.clone())
    }

    /// Number of tasks still running
    pub async fn active_count(&self) -> usize {
        self.tasks
            .read()
            .await
            .values()
            .filter(|entry| !entry.snapshot.status.is_terminal())
            .count()
    }

    async fn run(&self, request: TrainingRequest, cancel: CancellationToken) {
        if let Err(e) = self.execute(&request, &cancel).await {
            tracing::error!(task_id = request.task_id, error = %e, "Training task failed");
            let message = e.to_string();
            self.finish(
                &request,
                TaskStatus::Failed,
                format!("训练失败: {}", message),
                Some(message),
            )
            .await;
        }
    }

    async fn execute(&self, request: &TrainingRequest, cancel: &CancellationToken) -> Result<()> {
        let task_id = request.task_id;
        let model = ModelType::parse(&request.model_type)?;
        let config = ModelConfig::from_value(request.model_config.as_ref())?;
        let total = config.epochs;

        self.update(task_id, |s| s.total_epochs = total).await;
        self.trainer
            .prepare(model, &config, request.dataset_path.as_deref())
            .await?;

        for epoch in 1..=total {
            let metrics = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    self.finish(
                        request,
                        TaskStatus::Stopped,
                        format!("训练在第 {} 轮被停止", epoch),
                        None,
                    )
                    .await;
                    return Ok(());
                }
                metrics = self.trainer.run_epoch(model, &config, epoch) => metrics?,
            };

            let latest_log = match &metrics {
                Some(m) => format!(
                    "Epoch {}/{} - Train Loss: {:.4}, Train Acc: {:.4}, Val Loss: {:.4}, Val Acc: {:.4}",
                    epoch, total, m.train_loss, m.train_accuracy, m.val_loss, m.val_accuracy
                ),
                None => format!("Epoch {}/{}", epoch, total),
            };
            tracing::debug!(task_id, epoch, total, "Epoch finished");

            let snapshot = self
                .update(task_id, |s| {
                    s.current_epoch = epoch;
                    s.progress = progress_percent(epoch, total);
                    s.latest_log = latest_log;
                })
                .await;
            if let Some(snapshot) = snapshot {
                self.notifier
                    .notify(
                        request.callback_url.as_deref(),
                        &ProgressUpdate::from_snapshot(&snapshot, metrics),
                    )
                    .await;
            }
        }

        self.finish(request, TaskStatus::Completed, "训练完成".to_string(), None)
            .await;
        Ok(())
    }

    /// Move a running task to a terminal state and report it.
    async fn finish(
        &self,
        request: &TrainingRequest,
        status: TaskStatus,
        latest_log: String,
        error_message: Option<String>,
    ) {
        let snapshot = self
            .update(request.task_id, |s| {
                if status == TaskStatus::Completed {
                    s.progress = 100;
                    s.current_epoch = s.total_epochs;
                }
                s.status = status;
                s.latest_log = latest_log;
                s.error_message = error_message;
                s.finished_at = Some(Utc::now());
            })
            .await;

        if let Some(snapshot) = snapshot {
            tracing::info!(task_id = request.task_id, status = %status, "Training task finished");
            self.notifier
                .notify(
                    request.callback_url.as_deref(),
                    &ProgressUpdate::from_snapshot(&snapshot, None),
                )
                .await;
        }
    }

    /// Mutate a running task's snapshot. Terminal snapshots are frozen.
    async fn update(
        &self,
        task_id: TaskId,
        f: impl FnOnce(&mut TaskSnapshot),
    ) -> Option<TaskSnapshot> {
        let mut tasks = self.tasks.write().await;
        let entry = tasks.get_mut(&task_id)?;
        if entry.snapshot.status.is_terminal() {
            return None;
        }
        f(&mut entry.snapshot);
        Some(entry.snapshot.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn orchestrator(interval_ms: u64) -> TrainingOrchestrator {
        TrainingOrchestrator::new(
            Arc::new(PacedTrainer::new(Duration::from_millis(interval_ms))),
            ProgressNotifier::new(Duration::from_secs(1)),
        )
    }

    fn request(task_id: TaskId, model_type: &str, epochs: u32) -> TrainingRequest {
        TrainingRequest {
            task_id,
            model_type: model_type.to_string(),
            dataset_path: None,
            model_config: Some(json!({ "epochs": epochs })),
            callback_url: None,
        }
    }

    async fn wait_finished(orch: &TrainingOrchestrator, task_id: TaskId) -> TaskSnapshot {
        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                if let Some(snapshot) = orch.status(task_id).await {
                    if snapshot.status.is_terminal() {
                        return snapshot;
                    }
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("task did not finish in time")
    }

    #[tokio::test]
    async fn test_task_completes() {
        let orch = orchestrator(5);
        let started = orch.start(request(1, "SENTIMENT_ANALYZER", 3)).await.unwrap();
        assert_eq!(started.status, TaskStatus::Running);

        let done = wait_finished(&orch, 1).await;
        assert_eq!(done.status, TaskStatus::Completed);
        assert_eq!(done.progress, 100);
        assert_eq!(done.current_epoch, 3);
        assert_eq!(done.total_epochs, 3);
        assert!(done.finished_at.is_some());
        assert_eq!(orch.active_count().await, 0);
    }

    #[tokio::test]
    async fn test_unsupported_model_fails() {
        let orch = orchestrator(5);
        orch.start(request(2, "IMAGE_GENERATOR", 2)).await.unwrap();

        let done = wait_finished(&orch, 2).await;
        assert_eq!(done.status, TaskStatus::Failed);
        assert!(done
            .error_message
            .unwrap()
            .contains("不支持的模型类型: IMAGE_GENERATOR"));
    }

    #[tokio::test]
    async fn test_duplicate_running_task_rejected() {
        let orch = orchestrator(200);
        orch.start(request(3, "TEXT_CLASSIFIER", 5)).await.unwrap();

        let err = orch
            .start(request(3, "TEXT_CLASSIFIER", 5))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("已经在运行中"));
        assert_eq!(orch.active_count().await, 1);
        orch.stop(3).await.unwrap();
    }

    #[tokio::test]
    async fn test_stop_running_task() {
        let orch = orchestrator(200);
        orch.start(request(4, "TEXT_CLASSIFIER", 10)).await.unwrap();

        orch.stop(4).await.unwrap();
        let done = wait_finished(&orch, 4).await;
        assert_eq!(done.status, TaskStatus::Stopped);
        assert!(done.progress < 100);
        assert!(done.latest_log.contains("被停止"));

        // Terminal tasks cannot be stopped again
        assert!(orch.stop(4).await.is_err());
    }

    #[tokio::test]
    async fn test_stop_unknown_task() {
        let orch = orchestrator(5);
        let err = orch.stop(99).await.unwrap_err();
        assert!(err.to_string().contains("不存在或未运行"));
        assert!(orch.status(99).await.is_none());
    }

    #[tokio::test]
    async fn test_finished_task_can_restart() {
        let orch = orchestrator(1);
        orch.start(request(5, "TEXT_CLASSIFIER", 1)).await.unwrap();
        wait_finished(&orch, 5).await;

        orch.start(request(5, "TEXT_CLASSIFIER", 1)).await.unwrap();
        let done = wait_finished(&orch, 5).await;
        assert_eq!(done.status, TaskStatus::Completed);
    }

    #[tokio::test]
    async fn test_callbacks_per_epoch_and_completion() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(3)
            .mount(&server)
            .await;

        let orch = orchestrator(1);
        let mut req = request(6, "SENTIMENT_ANALYZER", 2);
        req.callback_url = Some(format!("{}/api/training/callback", server.uri()));
        orch.start(req).await.unwrap();
        wait_finished(&orch, 6).await;

        // The completion callback is sent after the terminal state is stored
        tokio::time::sleep(Duration::from_millis(200)).await;
        let received = server.received_requests().await.unwrap();
        let statuses: Vec<String> = received
            .iter()
            .map(|r| {
                let body: serde_json::Value = serde_json::from_slice(&r.body).unwrap();
                body["taskStatus"].as_str().unwrap().to_string()
            })
            .collect();
        assert_eq!(statuses, vec!["RUNNING", "RUNNING", "COMPLETED"]);
    }
}
