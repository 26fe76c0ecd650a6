pub mod config;
pub mod error;
pub mod llm;
pub mod logging;
pub mod meal;
pub mod server;

pub use error::{Error, Result};
