//! Epoch execution backends

use super::types::{EpochMetrics, ModelConfig, ModelType};
use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Runs the epochs of one training job.
///
/// The orchestrator owns scheduling, cancellation and reporting; a trainer
/// only has to do the work of a single epoch.
#[async_trait]
pub trait Trainer: Send + Sync {
    /// Load data for the job. Called once before the first epoch.
    async fn prepare(
        &self,
        model: ModelType,
        config: &ModelConfig,
        dataset_path: Option<&str>,
    ) -> Result<()>;

    /// Run epoch `epoch` (1-based). Metrics are optional.
    async fn run_epoch(
        &self,
        model: ModelType,
        config: &ModelConfig,
        epoch: u32,
    ) -> Result<Option<EpochMetrics>>;

    fn name(&self) -> &str;
}

/// Trainer that performs no learning and only paces epochs.
#[derive(Debug, Clone)]
pub struct PacedTrainer {
    interval: Duration,
}

impl PacedTrainer {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

#[async_trait]
impl Trainer for PacedTrainer {
    async fn prepare(
        &self,
        model: ModelType,
        config: &ModelConfig,
        dataset_path: Option<&str>,
    ) -> Result<()> {
        tracing::info!(
            model = ?model,
            epochs = config.epochs,
            batch_size = config.batch_size,
            learning_rate = config.learning_rate,
            dataset = dataset_path.unwrap_or("<default>"),
            "Preparing training job"
        );
        Ok(())
    }

    async fn run_epoch(
        &self,
        _model: ModelType,
        _config: &ModelConfig,
        _epoch: u32,
    ) -> Result<Option<EpochMetrics>> {
        tokio::time::sleep(self.interval).await;
        Ok(None)
    }

    fn name(&self) -> &str {
        "paced"
    }
}
