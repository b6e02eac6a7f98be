use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use tracing::warn;
use uuid::Uuid;

use drape_core::Result;
use drape_pipeline::{GenerateJob, RemoveBackgroundJob};

use crate::schemas::{BackgroundRemovalResponse, HealthResponse, InferenceResponse};
use crate::state::AppState;

/// Run generation with the given prompt and images. Job-level failures
/// come back as `success=false`, never as a transport error.
pub async fn infer(
    State(state): State<Arc<AppState>>,
    Json(job): Json<GenerateJob>,
) -> Json<InferenceResponse> {
    let job_id = Uuid::new_v4();
    match run_infer(&state, &job).await {
        Ok(image_base64) => Json(InferenceResponse::ok(image_base64)),
        Err(e) => {
            warn!(%job_id, "infer job failed: {e}");
            Json(InferenceResponse::failed(e.to_string()))
        }
    }
}

async fn run_infer(state: &AppState, job: &GenerateJob) -> Result<String> {
    let pipeline = state.pipeline().await?;
    pipeline.generate(job).await
}

/// Remove the background from one image and write the cutout to disk.
pub async fn remove_background(
    State(state): State<Arc<AppState>>,
    Json(job): Json<RemoveBackgroundJob>,
) -> Json<BackgroundRemovalResponse> {
    let job_id = Uuid::new_v4();
    match run_remove_background(&state, &job).await {
        Ok(output_path) => Json(BackgroundRemovalResponse::ok(output_path)),
        Err(e) => {
            warn!(%job_id, "remove_background job failed: {e}");
            Json(BackgroundRemovalResponse::failed(e.to_string()))
        }
    }
}

async fn run_remove_background(state: &AppState, job: &RemoveBackgroundJob) -> Result<String> {
    let pipeline = state.pipeline().await?;
    let path = pipeline.remove_background_to_file(job).await?;
    Ok(path.display().to_string())
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "inference",
        services: ["inference", "background_removal"],
    })
}
