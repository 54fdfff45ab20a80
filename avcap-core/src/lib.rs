//! # avcap-core
//!
//! Platform-agnostic AV capture core library.
//!
//! Negotiates the best hardware-offered capture format against
//! application constraints and normalizes captured audio into the
//! canonical representation: interleaved stereo f32 at 44.1kHz, handed
//! off in fixed 10ms quanta (441 frames). Platform backends (WASAPI,
//! Core Audio) implement the `AudioEndpoint` / `VideoCaptureDevice`
//! traits and plug into the generic session.
//!
//! ## Architecture
//!
//! ```text
//! avcap-core (this crate)
//! ├── traits/       ← AudioEndpoint, VideoCaptureDevice (platform boundary)
//! ├── models/       ← CaptureError, SessionState, AudioDeviceFormat,
//! │                   ChannelLayout, FormatDescriptor, CaptureRequest
//! ├── processing/   ← select_best_format, ChannelMixer, RateConverter,
//! │                   QuantumBuffer
//! └── session/      ← AudioCaptureSession (tick-driven pull loop),
//!                     CaptureWorker (owning-thread driver)
//! ```

pub mod models;
pub mod processing;
pub mod session;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use models::audio_format::{AudioDeviceFormat, ChannelLayout, SampleEncoding};
pub use models::error::CaptureError;
pub use models::state::SessionState;
pub use models::video_format::{CaptureRequest, FormatDescriptor, VideoFormatKind};
pub use processing::channel_mixer::{ChannelMixer, MixPlan};
pub use processing::format_select::select_best_format;
pub use processing::quantum_buffer::{
    QuantumBuffer, CANONICAL_CHANNELS, CANONICAL_SAMPLE_RATE, QUANTUM_FRAMES, QUANTUM_SAMPLES,
};
pub use processing::rate_converter::{
    ConvertedBlock, RateConverter, ResampleChunk, ResamplerBackend, SincResamplerBackend,
};
pub use session::audio::{AudioCaptureSession, PullStatus};
pub use session::worker::{CaptureWorker, QuantumCallback};
pub use traits::audio_endpoint::{AudioEndpoint, DevicePacket};
pub use traits::video_device::VideoCaptureDevice;
