//! Model source client (Ollama HTTP API)
//!
//! The engine treats the model source as a narrow collaborator: list
//! installed models, remove one, and pull one with streaming progress. The
//! pull runs on a background thread so the caller can observe progress
//! while the transfer proceeds.

use std::io::{BufRead, BufReader};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{LocaldevError, Result};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Timeout for non-streaming requests; pulls use an untimed client
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Buffered progress channel: messages are never dropped, emission order
/// is preserved, and a slow renderer back-pressures the reader thread.
const PROGRESS_BUFFER: usize = 64;

/// A model reported installed by the model source
#[derive(Debug, Clone, Deserialize)]
pub struct InstalledModel {
    pub name: String,
    #[serde(default)]
    pub size: u64,
}

/// One progress record from a streaming pull
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullProgress {
    /// Phase label, e.g. "pulling manifest", "downloading", "verifying"
    pub status: String,
    pub digest: String,
    pub completed: u64,
    /// 0 when the total is not yet known
    pub total: u64,
}

/// Live pull: progress messages plus a completion signal.
///
/// The completion result becomes available only after the progress sender
/// is dropped, so draining `progress` to disconnection and then reading
/// `done` observes every message in emission order.
pub struct PullHandle {
    pub progress: Receiver<PullProgress>,
    pub done: Receiver<Result<()>>,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<InstalledModel>,
}

/// Raw progress line from /api/pull
#[derive(Debug, Deserialize)]
struct PullRecord {
    #[serde(default)]
    status: String,
    #[serde(default)]
    digest: String,
    #[serde(default)]
    completed: u64,
    #[serde(default)]
    total: u64,
    #[serde(default)]
    error: String,
}

/// HTTP client for the local model-serving daemon
pub struct OllamaClient {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl OllamaClient {
    pub fn new(endpoint: Option<String>) -> Self {
        let endpoint = endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();

        OllamaClient { endpoint, client }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Probe whether the model source is running
    pub fn is_available(&self) -> bool {
        self.client
            .get(format!("{}/api/tags", self.endpoint))
            .send()
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    /// List installed models
    pub fn list(&self) -> Result<Vec<InstalledModel>> {
        let response = self
            .client
            .get(format!("{}/api/tags", self.endpoint))
            .send()
            .map_err(|_| LocaldevError::ModelSourceUnavailable {
                endpoint: self.endpoint.clone(),
            })?;

        if !response.status().is_success() {
            return Err(LocaldevError::ModelSourceUnavailable {
                endpoint: self.endpoint.clone(),
            });
        }

        let tags: TagsResponse =
            response.json().map_err(|e| LocaldevError::IoError {
                message: format!("Failed to decode model list: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(tags.models)
    }

    /// Delete an installed model
    pub fn remove(&self, name: &str) -> Result<()> {
        let response = self
            .client
            .delete(format!("{}/api/delete", self.endpoint))
            .json(&serde_json::json!({ "name": name }))
            .send()
            .map_err(|_| LocaldevError::ModelSourceUnavailable {
                endpoint: self.endpoint.clone(),
            })?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(LocaldevError::ModelNotFound {
                model: name.to_string(),
            });
        }
        if !response.status().is_success() {
            return Err(LocaldevError::IoError {
                message: format!(
                    "Failed to remove model '{}': status {}",
                    name,
                    response.status()
                ),
                source: None,
            });
        }

        Ok(())
    }

    /// Start pulling a model, streaming progress from a background thread.
    ///
    /// The transfer runs to completion or to a fatal transport error; there
    /// is no mid-transfer cancellation.
    pub fn pull(&self, model: &str) -> PullHandle {
        let (progress_tx, progress_rx) = mpsc::sync_channel(PROGRESS_BUFFER);
        let (done_tx, done_rx) = mpsc::sync_channel(1);

        let endpoint = self.endpoint.clone();
        let model = model.to_string();

        thread::spawn(move || {
            let result = run_pull(&endpoint, &model, &progress_tx);
            // Drop the progress sender before signalling completion so the
            // consumer sees disconnection only after the last message.
            drop(progress_tx);
            let _ = done_tx.send(result);
        });

        PullHandle {
            progress: progress_rx,
            done: done_rx,
        }
    }
}

fn run_pull(
    endpoint: &str,
    model: &str,
    progress: &mpsc::SyncSender<PullProgress>,
) -> Result<()> {
    // Large models take a long time; the streaming client has no timeout.
    let client = reqwest::blocking::Client::builder()
        .build()
        .map_err(|e| acquisition_error(model, &e))?;

    let response = client
        .post(format!("{endpoint}/api/pull"))
        .json(&serde_json::json!({ "name": model, "stream": true }))
        .send()
        .map_err(|e| acquisition_error(model, &e))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().unwrap_or_default();
        return Err(LocaldevError::AcquisitionFailure {
            model: model.to_string(),
            reason: format!("status {status}: {}", body.trim()),
        });
    }

    let reader = BufReader::new(response);
    for line in reader.lines() {
        let line = line.map_err(|e| io_acquisition_error(model, &e))?;
        if line.trim().is_empty() {
            continue;
        }

        let record: PullRecord =
            serde_json::from_str(&line).map_err(|e| LocaldevError::AcquisitionFailure {
                model: model.to_string(),
                reason: format!("malformed progress record: {e}"),
            })?;

        if !record.error.is_empty() {
            return Err(LocaldevError::AcquisitionFailure {
                model: model.to_string(),
                reason: record.error,
            });
        }

        let update = PullProgress {
            status: record.status,
            digest: record.digest,
            completed: record.completed,
            total: record.total,
        };

        if progress.send(update).is_err() {
            // Consumer went away; finish silently, the transfer itself
            // continues server-side either way.
            return Ok(());
        }
    }

    Ok(())
}

fn acquisition_error(model: &str, err: &reqwest::Error) -> LocaldevError {
    if err.is_timeout() {
        LocaldevError::AcquisitionTimeout {
            model: model.to_string(),
        }
    } else if err.is_connect() {
        LocaldevError::ModelSourceUnavailable {
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    } else {
        LocaldevError::AcquisitionFailure {
            model: model.to_string(),
            reason: err.to_string(),
        }
    }
}

fn io_acquisition_error(model: &str, err: &std::io::Error) -> LocaldevError {
    if matches!(
        err.kind(),
        std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock
    ) {
        LocaldevError::AcquisitionTimeout {
            model: model.to_string(),
        }
    } else {
        LocaldevError::AcquisitionFailure {
            model: model.to_string(),
            reason: err.to_string(),
        }
    }
}
