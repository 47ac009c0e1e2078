//! AI model management
//!
//! This module handles:
//! - Role classification of model identifiers (generation/embedding/transcription)
//! - Talking to the local model source (Ollama HTTP API)
//! - The concurrent, progress-reporting artifact acquisition pipeline

pub mod classify;
pub mod client;
pub mod pull;

pub use classify::ModelRole;
pub use client::{InstalledModel, OllamaClient, PullHandle, PullProgress};
