//! Training task types
//!
//! Wire names are camelCase to match the platform backend that submits
//! jobs and receives progress callbacks.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Task identifier assigned by the submitting platform
pub type TaskId = i64;

const DEFAULT_EPOCHS: u32 = 10;
const DEFAULT_BATCH_SIZE: u32 = 32;
const DEFAULT_LEARNING_RATE: f64 = 0.001;

/// Task lifecycle state. `Running` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Running,
    Completed,
    Failed,
    Stopped,
}

impl TaskStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Running)
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Running => write!(f, "RUNNING"),
            Self::Completed => write!(f, "COMPLETED"),
            Self::Failed => write!(f, "FAILED"),
            Self::Stopped => write!(f, "STOPPED"),
        }
    }
}

/// Supported model families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModelType {
    SentimentAnalyzer,
    TextClassifier,
}

impl ModelType {
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim() {
            "SENTIMENT_ANALYZER" => Ok(Self::SentimentAnalyzer),
            "TEXT_CLASSIFIER" => Ok(Self::TextClassifier),
            other => Err(Error::Training(format!("不支持的模型类型: {}", other))),
        }
    }
}

/// Hyper-parameters carried in `modelConfig`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModelConfig {
    pub epochs: u32,
    pub batch_size: u32,
    pub learning_rate: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            epochs: DEFAULT_EPOCHS,
            batch_size: DEFAULT_BATCH_SIZE,
            learning_rate: DEFAULT_LEARNING_RATE,
        }
    }
}

impl ModelConfig {
    /// Decode `modelConfig`, which arrives either as an object or as a
    /// JSON-encoded string.
    pub fn from_value(value: Option<&serde_json::Value>) -> Result<Self> {
        let config: Self = match value {
            None | Some(serde_json::Value::Null) => Self::default(),
            Some(serde_json::Value::String(s)) if s.trim().is_empty() => Self::default(),
            Some(serde_json::Value::String(s)) => serde_json::from_str(s)?,
            Some(v) => serde_json::from_value(v.clone())?,
        };

        if config.epochs == 0 {
            return Err(Error::Training("epochs must be at least 1".to_string()));
        }
        Ok(config)
    }
}

/// Body of `POST /api/training/start`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingRequest {
    pub task_id: TaskId,
    pub model_type: String,
    #[serde(default)]
    pub dataset_path: Option<String>,
    #[serde(default)]
    pub model_config: Option<serde_json::Value>,
    #[serde(default)]
    pub callback_url: Option<String>,
}

/// Per-epoch figures a trainer may report
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpochMetrics {
    pub train_loss: f64,
    pub train_accuracy: f64,
    pub val_loss: f64,
    pub val_accuracy: f64,
}

/// Point-in-time view of a task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSnapshot {
    pub task_id: TaskId,
    pub model_type: String,
    pub status: TaskStatus,
    /// Percentage of epochs finished
    pub progress: u8,
    pub current_epoch: u32,
    pub total_epochs: u32,
    pub latest_log: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl TaskSnapshot {
    pub fn running(task_id: TaskId, model_type: impl Into<String>) -> Self {
        Self {
            task_id,
            model_type: model_type.into(),
            status: TaskStatus::Running,
            progress: 0,
            current_epoch: 0,
            total_epochs: 0,
            latest_log: "训练任务已启动".to_string(),
            error_message: None,
            started_at: Utc::now(),
            finished_at: None,
        }
    }
}

/// Progress callback payload POSTed to `callbackUrl`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdate {
    pub task_id: TaskId,
    pub task_status: TaskStatus,
    pub progress: u8,
    pub current_epoch: u32,
    pub total_epochs: u32,
    pub latest_log: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(flatten)]
    pub metrics: Option<EpochMetrics>,
}

impl ProgressUpdate {
    pub fn from_snapshot(snapshot: &TaskSnapshot, metrics: Option<EpochMetrics>) -> Self {
        Self {
            task_id: snapshot.task_id,
            task_status: snapshot.status,
            progress: snapshot.progress,
            current_epoch: snapshot.current_epoch,
            total_epochs: snapshot.total_epochs,
            latest_log: snapshot.latest_log.clone(),
            error_message: snapshot.error_message.clone(),
            metrics,
        }
    }
}

/// Whole-percent progress after `epoch` of `total` epochs
pub fn progress_percent(epoch: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    (u64::from(epoch.min(total)) * 100 / u64::from(total)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_model_config_defaults() {
        let config = ModelConfig::from_value(None).unwrap();
        assert_eq!(config.epochs, 10);
        assert_eq!(config.batch_size, 32);
    }

    #[test]
    fn test_model_config_object_and_string() {
        let object = json!({ "epochs": 3, "learningRate": 0.01 });
        let config = ModelConfig::from_value(Some(&object)).unwrap();
        assert_eq!(config.epochs, 3);
        assert_eq!(config.learning_rate, 0.01);
        assert_eq!(config.batch_size, 32);

        let encoded = json!("{\"epochs\": 5}");
        assert_eq!(ModelConfig::from_value(Some(&encoded)).unwrap().epochs, 5);
    }

    #[test]
    fn test_model_config_rejects_garbage() {
        assert!(ModelConfig::from_value(Some(&json!("not json"))).is_err());
        assert!(ModelConfig::from_value(Some(&json!({ "epochs": 0 }))).is_err());
    }

    #[test]
    fn test_model_type_parse() {
        assert_eq!(
            ModelType::parse("TEXT_CLASSIFIER").unwrap(),
            ModelType::TextClassifier
        );
        let err = ModelType::parse("GPT").unwrap_err();
        assert!(err.to_string().contains("不支持的模型类型: GPT"));
    }

    #[test]
    fn test_progress_percent() {
        assert_eq!(progress_percent(0, 10), 0);
        assert_eq!(progress_percent(1, 3), 33);
        assert_eq!(progress_percent(3, 3), 100);
        assert_eq!(progress_percent(5, 0), 0);
    }

    #[test]
    fn test_request_wire_names() {
        let request: TrainingRequest = serde_json::from_value(json!({
            "taskId": 7,
            "modelType": "SENTIMENT_ANALYZER",
            "callbackUrl": "http://backend/callback"
        }))
        .unwrap();
        assert_eq!(request.task_id, 7);
        assert!(request.dataset_path.is_none());
    }

    #[test]
    fn test_progress_update_wire_shape() {
        let mut snapshot = TaskSnapshot::running(1, "TEXT_CLASSIFIER");
        snapshot.total_epochs = 2;
        let update = ProgressUpdate::from_snapshot(&snapshot, None);
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["taskId"], 1);
        assert_eq!(json["taskStatus"], "RUNNING");
        assert_eq!(json["totalEpochs"], 2);
        assert!(json.get("errorMessage").is_none());
        assert!(json.get("trainLoss").is_none());

        let metrics = EpochMetrics {
            train_loss: 0.5,
            train_accuracy: 0.8,
            val_loss: 0.6,
            val_accuracy: 0.75,
        };
        let json = serde_json::to_value(ProgressUpdate::from_snapshot(&snapshot, Some(metrics))).unwrap();
        assert_eq!(json["trainLoss"], 0.5);
        assert_eq!(json["valAccuracy"], 0.75);
    }
}
