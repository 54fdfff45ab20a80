//! Owning-thread driver for a capture session.
//!
//! A session's buffers and resampler state are not safe for concurrent
//! mutation, so a multi-threaded host gives each device one worker that
//! owns the session exclusively and serializes its pull cycles.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;

use crate::models::error::CaptureError;
use crate::session::audio::{AudioCaptureSession, PullStatus};

/// Callback invoked with each quantum (441 interleaved stereo frames).
///
/// Fires on the worker thread — keep processing minimal.
pub type QuantumCallback = Arc<dyn Fn(&[f32]) + Send + Sync + 'static>;

/// Poll interval while the device has nothing captured.
const IDLE_POLL: Duration = Duration::from_millis(2);

/// Drives an [`AudioCaptureSession`] on a dedicated thread, delivering
/// quanta in arrival order through a callback.
pub struct CaptureWorker {
    running: Arc<AtomicBool>,
    handle: Mutex<Option<thread::JoinHandle<()>>>,
}

impl CaptureWorker {
    /// Start the session and spawn the worker thread that owns it.
    pub fn spawn(
        mut session: AudioCaptureSession,
        callback: QuantumCallback,
    ) -> Result<Self, CaptureError> {
        session.start()?;

        let running = Arc::new(AtomicBool::new(true));
        let thread_running = Arc::clone(&running);

        let handle = thread::Builder::new()
            .name("capture-worker".into())
            .spawn(move || {
                while thread_running.load(Ordering::SeqCst) {
                    match session.pull_cycle() {
                        PullStatus::QuantumReady => {
                            if let Some(quantum) = session.quantum() {
                                callback(quantum);
                            }
                        }
                        PullStatus::Continue => {}
                        PullStatus::NothingAvailable => thread::sleep(IDLE_POLL),
                    }
                }
                session.stop();
            })
            .map_err(|e| {
                CaptureError::ConfigurationFailed(format!("failed to spawn capture worker: {e}"))
            })?;

        Ok(Self {
            running,
            handle: Mutex::new(Some(handle)),
        })
    }

    /// Stop the worker and tear the session down. Idempotent.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.lock().take() {
            let _ = handle.join();
        }
    }
}

impl Drop for CaptureWorker {
    fn drop(&mut self) {
        self.stop();
    }
}
