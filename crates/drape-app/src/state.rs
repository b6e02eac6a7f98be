use std::sync::Arc;
use std::time::Duration;

use tokio::sync::OnceCell;

use drape_core::{Error, Result};
use drape_pipeline::{DiffusionBackend, MattingBackend, Pipeline};

use crate::config::Config;

/// Shared service state. The pipeline handle (fetch client plus the two
/// model backends) is built once on first use and reused for every job
/// after; `OnceCell` guards against concurrent double-initialization.
pub struct AppState {
    config: Config,
    pipeline: OnceCell<Arc<Pipeline>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            pipeline: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn pipeline(&self) -> Result<Arc<Pipeline>> {
        self.pipeline
            .get_or_try_init(|| async {
                let client = reqwest::Client::builder()
                    .build()
                    .map_err(|e| Error::backend(format!("failed to build http client: {e}")))?;
                let timeout = Duration::from_secs(self.config.backend_timeout_secs);
                let generator = Arc::new(DiffusionBackend::new(
                    client.clone(),
                    self.config.generator_url.clone(),
                    timeout,
                ));
                let remover = Arc::new(MattingBackend::new(
                    client.clone(),
                    self.config.remover_url.clone(),
                    timeout,
                ));
                Ok(Arc::new(Pipeline::new(
                    client,
                    generator,
                    remover,
                    self.config.output_dir.clone(),
                )))
            })
            .await
            .map(Arc::clone)
    }
}
