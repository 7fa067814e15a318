mod client;
mod gemini;
mod service;

pub use client::AnalysisClient;
pub use gemini::GeminiClient;
pub use service::{AnalysisHandle, AnalysisOutcome};
