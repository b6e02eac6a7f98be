//! Queue worker: reads one job event per stdin line, runs it, and writes
//! one result per stdout line. The surrounding serving framework owns
//! delivery, retries, and cross-job concurrency.

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;

use drape_app::config::Config;
use drape_app::state::AppState;
use drape_app::worker::{JobOutput, QueueEvent, handle_event};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = Config::load()?;
    let state = AppState::new(config);

    info!("queue worker ready, reading events from stdin");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let output = match serde_json::from_str::<QueueEvent>(&line) {
            Ok(event) => match state.pipeline().await {
                Ok(pipeline) => handle_event(&pipeline, event).await,
                Err(e) => JobOutput::failed(e.to_string()),
            },
            Err(e) => JobOutput::failed(format!("invalid job event: {e}")),
        };

        let mut json = serde_json::to_vec(&output)?;
        json.push(b'\n');
        stdout.write_all(&json).await?;
        stdout.flush().await?;
    }

    Ok(())
}
