//! Canonical-format output accumulator.
//!
//! The buffer is an append-only queue of interleaved stereo 44.1kHz
//! samples, trimmed only from the front in whole quanta. A consumed
//! quantum is trimmed lazily at the start of the next pull cycle, so the
//! view handed out by [`QuantumBuffer::take_quantum`] stays valid until
//! then.

/// Canonical output sample rate.
pub const CANONICAL_SAMPLE_RATE: u32 = 44_100;
/// Canonical channel count (interleaved stereo).
pub const CANONICAL_CHANNELS: usize = 2;
/// Frames per output quantum: 10ms at 44.1kHz.
pub const QUANTUM_FRAMES: usize = 441;
/// Interleaved samples per output quantum.
pub const QUANTUM_SAMPLES: usize = QUANTUM_FRAMES * CANONICAL_CHANNELS;

#[derive(Debug, Default)]
pub struct QuantumBuffer {
    samples: Vec<f32>,
    trim_pending: bool,
}

impl QuantumBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply the deferred front-trim armed by the previous
    /// [`take_quantum`](Self::take_quantum). Call once at the start of
    /// every pull cycle.
    pub fn begin_cycle(&mut self) {
        if self.trim_pending {
            self.samples.drain(..QUANTUM_SAMPLES);
            self.trim_pending = false;
        }
    }

    /// Append canonical-format samples at the back of the queue.
    pub fn append(&mut self, samples: &[f32]) {
        self.samples.extend_from_slice(samples);
    }

    /// Replace the buffered contents with exactly one quantum of
    /// silence. Used to mask a recoverable stage failure; any partial
    /// pre-fault tail is discarded so garbage data is never emitted.
    pub fn substitute_silence(&mut self) {
        self.samples.clear();
        self.samples.resize(QUANTUM_SAMPLES, 0.0);
        self.trim_pending = false;
    }

    pub fn has_quantum(&self) -> bool {
        self.samples.len() >= QUANTUM_SAMPLES
    }

    /// Buffered interleaved sample count.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Hand out the front quantum (exactly 441 stereo frames) and arm
    /// the one-shot deferred trim. Returns `None` when less than one
    /// quantum is buffered. Calling again before the next cycle returns
    /// the same front range.
    pub fn take_quantum(&mut self) -> Option<&[f32]> {
        if self.samples.len() < QUANTUM_SAMPLES {
            return None;
        }
        self.trim_pending = true;
        Some(&self.samples[..QUANTUM_SAMPLES])
    }

    /// Drop everything, including a pending trim.
    pub fn clear(&mut self) {
        self.samples.clear();
        self.trim_pending = false;
    }
}
