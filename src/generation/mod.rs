pub mod client;
pub mod config;

pub use client::{GeminiClient, GenerationError, TextGenerator, PROBE_PROMPT};
pub use config::GenerationConfig;
