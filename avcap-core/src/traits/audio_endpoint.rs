use crate::models::audio_format::AudioDeviceFormat;
use crate::models::error::CaptureError;

/// One pulled device packet: raw interleaved float samples in the
/// device's native channel layout. The borrow ties the packet to the
/// endpoint; dropping it is the release step, so the endpoint may reuse
/// the underlying storage on the next read.
#[derive(Debug)]
pub struct DevicePacket<'a> {
    pub samples: &'a [f32],
    pub frames: usize,
}

/// Interface to a platform audio capture endpoint.
///
/// Implemented by the host's device layer (a WASAPI loopback client, a
/// Core Audio tap, a test double). All calls are non-blocking: the
/// pipeline polls and never waits on the device.
pub trait AudioEndpoint: Send {
    /// Activate the endpoint and return its native mix format. Called
    /// once, at the start of session acquisition.
    fn open(&mut self) -> Result<AudioDeviceFormat, CaptureError>;

    /// Start the capture stream.
    fn start(&mut self) -> Result<(), CaptureError>;

    /// Deactivate the capture stream. Must be safe to call repeatedly.
    fn stop(&mut self);

    /// Release the device handles. Called at teardown, after `stop`.
    fn close(&mut self);

    /// Frames pending in the next packet; zero means nothing captured
    /// yet this tick.
    fn next_packet_frames(&mut self) -> Result<usize, CaptureError>;

    /// Pull the pending packet.
    fn read_packet(&mut self) -> Result<DevicePacket<'_>, CaptureError>;
}
