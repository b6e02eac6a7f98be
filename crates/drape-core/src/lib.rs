pub mod error;
pub mod params;
pub mod selector;

pub use error::{Error, Result};
pub use params::GenerationParams;
pub use selector::RemovalSelector;

/// Most input images a single generate job accepts.
pub const MAX_INPUT_IMAGES: usize = 4;
