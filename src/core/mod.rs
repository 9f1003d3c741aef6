pub mod config;
pub mod error;
pub mod types;

pub use config::BuilderConfig;
pub use error::{BuilderError, Result};
pub use types::ListId;
