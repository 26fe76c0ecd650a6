pub mod client;
pub mod token;
pub mod types;

pub use client::*;
pub use token::*;
pub use types::*;
