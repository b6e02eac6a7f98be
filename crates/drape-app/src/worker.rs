use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use drape_core::{Error, Result};
use drape_pipeline::{GenerateJob, Pipeline, RemoveBackgroundJob};

const TASK_INFER: &str = "infer";
const TASK_REMOVE_BACKGROUND: &str = "remove_background";

/// One queue job as delivered by the external serving framework:
/// `{id, input: {task_type?, ...}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct QueueEvent {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub input: Value,
}

/// Terminal result for a queue job. Exactly one of the payload and the
/// error message is set, governed by `success`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct JobOutput {
    pub success: bool,
    pub image_base64: Option<String>,
    pub error_message: Option<String>,
}

impl JobOutput {
    pub fn ok(image_base64: String) -> Self {
        Self {
            success: true,
            image_base64: Some(image_base64),
            error_message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            image_base64: None,
            error_message: Some(message.into()),
        }
    }
}

/// Run one queue job to completion. `task_type` defaults to `"infer"`;
/// an unrecognized value is a failed output naming it, never a panic.
pub async fn handle_event(pipeline: &Pipeline, event: QueueEvent) -> JobOutput {
    let job_id = event.id.as_deref().unwrap_or("unknown").to_string();
    let task_type = event
        .input
        .get("task_type")
        .and_then(Value::as_str)
        .unwrap_or(TASK_INFER)
        .to_string();

    let result = match task_type.as_str() {
        TASK_INFER => run_infer(pipeline, event.input).await,
        TASK_REMOVE_BACKGROUND => run_remove_background(pipeline, event.input).await,
        other => Err(Error::UnknownTask(other.to_string())),
    };

    match result {
        Ok(image_base64) => JobOutput::ok(image_base64),
        Err(e) => {
            warn!(%job_id, %task_type, "queue job failed: {e}");
            JobOutput::failed(e.to_string())
        }
    }
}

async fn run_infer(pipeline: &Pipeline, input: Value) -> Result<String> {
    let job: GenerateJob = serde_json::from_value(input)
        .map_err(|e| Error::validation(format!("invalid infer payload: {e}")))?;
    pipeline.generate(&job).await
}

async fn run_remove_background(pipeline: &Pipeline, input: Value) -> Result<String> {
    let job: RemoveBackgroundJob = serde_json::from_value(input)
        .map_err(|e| Error::validation(format!("invalid remove_background payload: {e}")))?;
    pipeline.remove_background_to_base64(&job).await
}
