use crate::models::error::CaptureError;
use crate::models::video_format::{CaptureRequest, FormatDescriptor};
use crate::processing::format_select::select_best_format;

/// Read-only capability query on a video capture device.
///
/// The device layer owns enumeration and media-type probing; this crate
/// only consumes the advertised descriptor list.
pub trait VideoCaptureDevice {
    fn capabilities(&self) -> Result<Vec<FormatDescriptor>, CaptureError>;

    /// Negotiate the best advertised format for a request. The winner is
    /// cloned out, deep-copying its payload, so the returned descriptor
    /// never aliases the device's capability list.
    fn negotiate(
        &self,
        request: &CaptureRequest,
    ) -> Result<Option<FormatDescriptor>, CaptureError> {
        let capabilities = self.capabilities()?;
        Ok(select_best_format(&capabilities, request).cloned())
    }
}
