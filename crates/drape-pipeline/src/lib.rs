pub mod codec;
pub mod generator;
pub mod job;
pub mod loader;
pub mod output;
pub mod remover;

pub use generator::{DiffusionBackend, ImageGenerator};
pub use job::{GenerateJob, Pipeline, RemoveBackgroundJob};
pub use remover::{BackgroundRemover, MattingBackend};
