use thiserror::Error;

/// Errors that can occur during capture negotiation and acquisition.
///
/// Recoverable per-packet faults (a failed pull, a resampler that could
/// not consume a full packet) never surface through this type — the pull
/// loop masks them with a silence quantum and keeps the session alive.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("device not available")]
    DeviceNotAvailable,

    #[error("unsupported sample encoding: {0}")]
    UnsupportedSampleEncoding(String),

    #[error("unsupported channel layout: {channels} channels, mask {mask:#x}")]
    UnsupportedChannelLayout { channels: u16, mask: u32 },

    #[error("configuration failed: {0}")]
    ConfigurationFailed(String),

    #[error("resampler initialization failed: {0}")]
    ResamplerInit(String),

    #[error("stream fault: {0}")]
    StreamFault(String),
}
