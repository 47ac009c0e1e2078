//! Acquisition pipeline monitor
//!
//! The foreground loop multiplexes three event sources: progress messages,
//! the completion signal, and a stall timer. `recv_timeout` on the progress
//! channel realizes the select, so the loop never blocks indefinitely on
//! progress alone. Only an explicit terminal error or success ends the
//! pipeline; a stall just surfaces a notice.

use std::time::{Duration, Instant};

use indicatif::{HumanBytes, ProgressBar, ProgressStyle};

use crate::error::{LocaldevError, Result};
use crate::models::client::{PullHandle, PullProgress};

/// How long to wait for a progress message before notifying the user
pub const STALL_WINDOW: Duration = Duration::from_secs(30);

/// Rendering seam for pull progress; tests use [`SilentReporter`]
pub trait PullReporter {
    fn on_progress(&mut self, update: &PullProgress, speed: Option<f64>, eta: Option<Duration>);

    /// No progress within the stall window; the pull is still running
    fn on_stall(&mut self, waited: Duration);

    fn on_complete(&mut self, elapsed: Duration, mean_speed: Option<f64>);
}

/// Transfer-rate estimation from successive progress messages
#[derive(Debug, Default)]
pub struct RateTracker {
    last: Option<(u64, Instant)>,
}

impl RateTracker {
    pub fn new() -> Self {
        RateTracker::default()
    }

    /// Record a progress observation; returns bytes/second since the
    /// previous observation, or None on the first call or when the byte
    /// counter reset (a new layer started downloading).
    pub fn update(&mut self, completed: u64, now: Instant) -> Option<f64> {
        let speed = match self.last {
            Some((prev_completed, prev_at)) if completed >= prev_completed => {
                let elapsed = now.duration_since(prev_at).as_secs_f64();
                if elapsed > 0.0 {
                    Some((completed - prev_completed) as f64 / elapsed)
                } else {
                    None
                }
            }
            _ => None,
        };
        self.last = Some((completed, now));
        speed
    }
}

/// Remaining time at the given speed; None when total or speed is unknown
pub fn estimate_eta(completed: u64, total: u64, speed: Option<f64>) -> Option<Duration> {
    let speed = speed?;
    if total == 0 || speed <= 0.0 || completed > total {
        return None;
    }
    Some(Duration::from_secs_f64((total - completed) as f64 / speed))
}

/// Drive a pull to completion, forwarding progress to the reporter.
///
/// Progress messages are observed in emission order; the completion signal
/// is read only after the producer has stopped sending.
pub fn monitor(handle: &PullHandle, model: &str, reporter: &mut dyn PullReporter) -> Result<()> {
    monitor_with_window(handle, model, reporter, STALL_WINDOW)
}

/// [`monitor`] with an explicit stall window
pub fn monitor_with_window(
    handle: &PullHandle,
    model: &str,
    reporter: &mut dyn PullReporter,
    window: Duration,
) -> Result<()> {
    let started = Instant::now();
    let mut tracker = RateTracker::new();
    let mut last_completed = 0u64;

    loop {
        match handle.progress.recv_timeout(window) {
            Ok(update) => {
                let speed = tracker.update(update.completed, Instant::now());
                let eta = estimate_eta(update.completed, update.total, speed);
                last_completed = last_completed.max(update.completed);
                reporter.on_progress(&update, speed, eta);
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {
                reporter.on_stall(started.elapsed());
            }
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => {
                let result = handle.done.recv().unwrap_or_else(|_| {
                    Err(LocaldevError::AcquisitionFailure {
                        model: model.to_string(),
                        reason: "download worker exited without reporting a result".to_string(),
                    })
                });

                return result.map(|()| {
                    let elapsed = started.elapsed();
                    let mean = if elapsed.as_secs_f64() > 0.0 && last_completed > 0 {
                        Some(last_completed as f64 / elapsed.as_secs_f64())
                    } else {
                        None
                    };
                    reporter.on_complete(elapsed, mean);
                });
            }
        }
    }
}

/// Interactive progress bar rendering via indicatif
pub struct ProgressBarReporter {
    bar: ProgressBar,
    model: String,
}

impl ProgressBarReporter {
    pub fn new(model: &str) -> Self {
        let bar = ProgressBar::new(0);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{msg} [{bar:40.cyan/blue}] {bytes}/{total_bytes} {bytes_per_sec} eta {eta}")
        {
            bar.set_style(style.progress_chars("#>-"));
        }
        ProgressBarReporter {
            bar,
            model: model.to_string(),
        }
    }
}

impl PullReporter for ProgressBarReporter {
    fn on_progress(&mut self, update: &PullProgress, _speed: Option<f64>, _eta: Option<Duration>) {
        // "sha256:abcd..." is noise at full length; keep a short prefix
        let label = match update.digest.split(':').nth(1) {
            Some(hex) if hex.len() >= 12 => format!("{} {}", update.status, &hex[..12]),
            _ => update.status.clone(),
        };
        if update.total > 0 {
            self.bar.set_length(update.total);
            self.bar.set_position(update.completed);
            self.bar.set_message(label);
        } else if !label.is_empty() {
            self.bar.set_message(label);
        }
    }

    fn on_stall(&mut self, waited: Duration) {
        self.bar.println(format!(
            "Still downloading {} ({}s elapsed, no progress update in the last {}s)",
            self.model,
            waited.as_secs(),
            STALL_WINDOW.as_secs()
        ));
    }

    fn on_complete(&mut self, elapsed: Duration, mean_speed: Option<f64>) {
        self.bar.finish_and_clear();
        match mean_speed {
            Some(speed) => println!(
                "Downloaded {} in {}s ({}/s average)",
                self.model,
                elapsed.as_secs(),
                HumanBytes(speed as u64)
            ),
            None => println!("Downloaded {} in {}s", self.model, elapsed.as_secs()),
        }
    }
}

/// No-op reporter for quiet mode and tests
#[derive(Default)]
pub struct SilentReporter;

impl PullReporter for SilentReporter {
    fn on_progress(&mut self, _update: &PullProgress, _speed: Option<f64>, _eta: Option<Duration>) {}
    fn on_stall(&mut self, _waited: Duration) {}
    fn on_complete(&mut self, _elapsed: Duration, _mean_speed: Option<f64>) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::client::PullHandle;
    use std::sync::mpsc;

    const MB: u64 = 1024 * 1024;

    #[test]
    fn test_speed_and_eta_example() {
        // 50MB -> 100MB of 200MB one second apart: 50MB/s, ETA 2s
        let mut tracker = RateTracker::new();
        let t0 = Instant::now();
        let t1 = t0 + Duration::from_secs(1);

        assert_eq!(tracker.update(50 * MB, t0), None);
        let speed = tracker.update(100 * MB, t1).unwrap();
        assert!((speed - (50 * MB) as f64).abs() < 1.0);

        let eta = estimate_eta(100 * MB, 200 * MB, Some(speed)).unwrap();
        assert!((eta.as_secs_f64() - 2.0).abs() < 0.01);
    }

    #[test]
    fn test_eta_omitted_without_total_or_speed() {
        assert_eq!(estimate_eta(10, 0, Some(5.0)), None);
        assert_eq!(estimate_eta(10, 100, None), None);
        assert_eq!(estimate_eta(10, 100, Some(0.0)), None);
    }

    #[test]
    fn test_tracker_resets_on_byte_counter_regression() {
        // a new layer restarts the completed counter
        let mut tracker = RateTracker::new();
        let t0 = Instant::now();
        tracker.update(100 * MB, t0);
        assert_eq!(tracker.update(5 * MB, t0 + Duration::from_secs(1)), None);
    }

    #[derive(Default)]
    struct RecordingReporter {
        progress: Vec<PullProgress>,
        stalls: usize,
        completed: bool,
    }

    impl PullReporter for RecordingReporter {
        fn on_progress(&mut self, u: &PullProgress, _: Option<f64>, _: Option<Duration>) {
            self.progress.push(u.clone());
        }
        fn on_stall(&mut self, _: Duration) {
            self.stalls += 1;
        }
        fn on_complete(&mut self, _: Duration, _: Option<f64>) {
            self.completed = true;
        }
    }

    fn synthetic_handle(
        updates: Vec<PullProgress>,
        result: crate::error::Result<()>,
    ) -> PullHandle {
        let (progress_tx, progress_rx) = mpsc::sync_channel(updates.len().max(1));
        let (done_tx, done_rx) = mpsc::sync_channel(1);
        for u in updates {
            progress_tx.send(u).unwrap();
        }
        drop(progress_tx);
        done_tx.send(result).unwrap();
        PullHandle {
            progress: progress_rx,
            done: done_rx,
        }
    }

    #[test]
    fn test_monitor_observes_messages_in_order_then_completes() {
        let updates = vec![
            PullProgress {
                status: "downloading".to_string(),
                completed: 10,
                total: 100,
                ..Default::default()
            },
            PullProgress {
                status: "downloading".to_string(),
                completed: 100,
                total: 100,
                ..Default::default()
            },
            PullProgress {
                status: "success".to_string(),
                ..Default::default()
            },
        ];
        let handle = synthetic_handle(updates, Ok(()));

        let mut reporter = RecordingReporter::default();
        monitor(&handle, "qwen2.5:3b", &mut reporter).unwrap();

        assert_eq!(reporter.progress.len(), 3);
        assert_eq!(reporter.progress[0].completed, 10);
        assert_eq!(reporter.progress[1].completed, 100);
        assert_eq!(reporter.progress[2].status, "success");
        assert!(reporter.completed);
    }

    #[test]
    fn test_monitor_propagates_terminal_error() {
        let handle = synthetic_handle(
            vec![],
            Err(crate::error::LocaldevError::AcquisitionTimeout {
                model: "qwen2.5:3b".to_string(),
            }),
        );

        let mut reporter = RecordingReporter::default();
        let err = monitor(&handle, "qwen2.5:3b", &mut reporter).unwrap_err();
        assert!(matches!(
            err,
            crate::error::LocaldevError::AcquisitionTimeout { .. }
        ));
        assert!(!reporter.completed);
    }

    #[test]
    fn test_monitor_notices_stall_and_keeps_waiting() {
        // progress stays silent past the stall window; the pull must not be
        // aborted, and the eventual completion still comes through
        let (progress_tx, progress_rx) = mpsc::sync_channel::<PullProgress>(1);
        let (done_tx, done_rx) = mpsc::sync_channel(1);
        let handle = PullHandle {
            progress: progress_rx,
            done: done_rx,
        };

        let worker = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(80));
            drop(progress_tx);
            done_tx.send(Ok(())).unwrap();
        });

        let mut reporter = RecordingReporter::default();
        monitor_with_window(
            &handle,
            "qwen2.5:3b",
            &mut reporter,
            Duration::from_millis(10),
        )
        .unwrap();
        worker.join().unwrap();

        assert!(reporter.stalls >= 1);
        assert!(reporter.progress.is_empty());
        assert!(reporter.completed);
    }
}
