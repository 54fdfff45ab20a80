//! Tick-driven audio capture session.
//!
//! Data flow per pull cycle:
//! ```text
//! [AudioEndpoint] → packet → [ChannelMixer] → [RateConverter]? → [QuantumBuffer]
//! ```
//! The consumer drains fixed 441-frame stereo quanta from the back end
//! of that chain. Every device query is a non-blocking poll; per-packet
//! faults are masked with one silence quantum so the downstream cadence
//! never stalls.

use std::fmt;

use crate::models::audio_format::{AudioDeviceFormat, ChannelLayout, SampleEncoding};
use crate::models::error::CaptureError;
use crate::models::state::SessionState;
use crate::processing::channel_mixer::{ChannelMixer, MixPlan};
use crate::processing::quantum_buffer::QuantumBuffer;
use crate::processing::rate_converter::RateConverter;
use crate::traits::audio_endpoint::AudioEndpoint;

/// Outcome of one pull cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullStatus {
    /// At least one quantum is buffered; call
    /// [`AudioCaptureSession::quantum`].
    QuantumReady,
    /// The device has nothing captured this tick. Retry on the next
    /// scheduling tick.
    NothingAvailable,
    /// A packet was ingested but less than one quantum is buffered.
    /// Retry immediately, same tick.
    Continue,
}

/// A single-device capture session owning the endpoint, the remix and
/// resample stages, and the output quantum buffer.
///
/// Single-threaded by design: pull cycles run to completion doing
/// bounded work for one device packet, and the internal buffers are not
/// safe for concurrent mutation. A multi-threaded host serializes pull
/// cycles per session — see [`CaptureWorker`](super::worker::CaptureWorker).
pub struct AudioCaptureSession {
    endpoint: Box<dyn AudioEndpoint>,
    format: AudioDeviceFormat,
    mixer: ChannelMixer,
    converter: Option<RateConverter>,
    mix_scratch: Vec<f32>,
    output: QuantumBuffer,
    state: SessionState,
}

impl AudioCaptureSession {
    /// Acquire a device and negotiate the pipeline configuration.
    ///
    /// Sequence: open the endpoint → validate the IEEE-float encoding →
    /// record the device format → construct the rate converter when the
    /// device rate differs from 44.1kHz → resolve the channel layout.
    /// Any failure releases partially-acquired resources in reverse
    /// order and returns the typed error; no partially-usable session is
    /// ever handed back.
    pub fn acquire(
        mut endpoint: Box<dyn AudioEndpoint>,
        vectorized_upmix: bool,
    ) -> Result<Self, CaptureError> {
        let format = match endpoint.open() {
            Ok(format) => format,
            Err(e) => {
                endpoint.close();
                return Err(e);
            }
        };

        if format.encoding != SampleEncoding::FloatIeee {
            endpoint.close();
            return Err(CaptureError::UnsupportedSampleEncoding(
                format.encoding.describe().into(),
            ));
        }

        let converter = match RateConverter::for_device_rate(format.sample_rate) {
            Ok(converter) => converter,
            Err(e) => {
                endpoint.close();
                return Err(e);
            }
        };

        let layout = match ChannelLayout::from_format(&format) {
            Ok(layout) => layout,
            Err(e) => {
                drop(converter);
                endpoint.close();
                return Err(e);
            }
        };
        if format.channels > 2 {
            log::info!("using {}", layout.describe());
        }

        Ok(Self {
            endpoint,
            format,
            mixer: ChannelMixer::new(MixPlan::for_layout(layout), vectorized_upmix),
            converter,
            mix_scratch: Vec::new(),
            output: QuantumBuffer::new(),
            state: SessionState::Ready,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The device's native mix format, fixed for the session lifetime.
    pub fn device_format(&self) -> &AudioDeviceFormat {
        &self.format
    }

    /// Start the capture stream. Transitions: ready → capturing.
    pub fn start(&mut self) -> Result<(), CaptureError> {
        if !self.state.is_ready() {
            return Err(CaptureError::ConfigurationFailed(
                "can only start from ready state".into(),
            ));
        }
        self.endpoint.start()?;
        self.state = SessionState::Capturing;
        Ok(())
    }

    /// Deactivate the capture stream. Idempotent; buffered-but-unconsumed
    /// audio is discarded, not flushed.
    pub fn stop(&mut self) {
        if self.state.is_capturing() {
            self.endpoint.stop();
        }
        self.output.clear();
        self.state = SessionState::Stopped;
    }

    /// Run one pull cycle. Non-blocking; does bounded work proportional
    /// to one device packet.
    pub fn pull_cycle(&mut self) -> PullStatus {
        if !self.state.is_capturing() {
            return PullStatus::NothingAvailable;
        }

        self.output.begin_cycle();

        if self.output.has_quantum() {
            return PullStatus::QuantumReady;
        }

        let pending = match self.endpoint.next_packet_frames() {
            Ok(pending) => pending,
            Err(e) => {
                log::warn!("pending packet size query failed: {e}");
                return PullStatus::NothingAvailable;
            }
        };
        if pending == 0 {
            return PullStatus::NothingAvailable;
        }

        let frames = {
            let packet = match self.endpoint.read_packet() {
                Ok(packet) => packet,
                Err(e) => {
                    log::warn!("packet pull failed, substituting silence: {e}");
                    self.output.substitute_silence();
                    return PullStatus::QuantumReady;
                }
            };
            self.mixer
                .remix(packet.samples, packet.frames, &mut self.mix_scratch);
            packet.frames
        };

        match self.converter.as_mut() {
            Some(converter) => match converter.convert(&self.mix_scratch, frames) {
                Ok(block) if block.input_frames_used == frames => {
                    self.output.append(block.samples);
                }
                Ok(block) => {
                    log::warn!(
                        "resampler consumed {} of {} packet frames, substituting silence",
                        block.input_frames_used,
                        frames
                    );
                    self.output.substitute_silence();
                    return PullStatus::QuantumReady;
                }
                Err(e) => {
                    log::warn!("resample failed, substituting silence: {e}");
                    self.output.substitute_silence();
                    return PullStatus::QuantumReady;
                }
            },
            None => self.output.append(&self.mix_scratch[..frames * 2]),
        }

        if self.output.has_quantum() {
            PullStatus::QuantumReady
        } else {
            PullStatus::Continue
        }
    }

    /// Hand back a view of exactly one quantum (441 stereo frames), or
    /// `None` when not enough is buffered. The view stays valid until
    /// the next pull cycle, which trims the consumed range.
    pub fn quantum(&mut self) -> Option<&[f32]> {
        self.output.take_quantum()
    }
}

// Manual impl: the boxed endpoint is not Debug.
impl fmt::Debug for AudioCaptureSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioCaptureSession")
            .field("state", &self.state)
            .field("format", &self.format)
            .field("resampling", &self.converter.is_some())
            .finish_non_exhaustive()
    }
}

impl Drop for AudioCaptureSession {
    fn drop(&mut self) {
        self.stop();
        self.endpoint.close();
    }
}
