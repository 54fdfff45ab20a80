use serde::{Deserialize, Serialize};

use super::error::CaptureError;

/// Recognized video output layouts a capture device may advertise.
///
/// `None` stands for a media type the probe could not classify; it is
/// carried so capability lists stay index-stable, but it never wins
/// selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoFormatKind {
    None,

    // Packed RGB
    Rgb24,
    Rgb32,
    Argb32,

    // Planar YUV
    I420,
    Yv12,
    Y41P,
    Yvu9,

    // Packed YUV
    Yvyu,
    Yuy2,
    Uyvy,

    // Compressed
    Mpeg2Video,
    H264,
    Dvsl,
    Dvsd,
    Dvhd,
    Mjpg,
}

impl VideoFormatKind {
    /// Preference rank used to break ties among candidates that all fit
    /// a request. −1 means never selectable. The match is exhaustive, so
    /// every variant has a rank by construction.
    pub const fn rank(self) -> i32 {
        match self {
            Self::Rgb24 | Self::Rgb32 | Self::Argb32 => 12,
            Self::Yvyu | Self::Yuy2 | Self::Uyvy => 11,
            Self::I420 | Self::Yv12 | Self::H264 => 10,
            Self::Mjpg => 8,
            Self::Mpeg2Video => 7,
            Self::Dvsl | Self::Dvsd | Self::Dvhd => 5,
            Self::Y41P | Self::Yvu9 | Self::None => -1,
        }
    }
}

/// One advertised output capability of a video capture device.
///
/// The raw media-type payload is owned by the descriptor; `Clone` deep
/// copies it, so two descriptors never alias the same payload bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatDescriptor {
    pub kind: VideoFormatKind,
    pub min_width: u32,
    pub max_width: u32,
    pub min_height: u32,
    pub max_height: u32,
    pub min_fps: u32,
    pub max_fps: u32,
    pub payload: Vec<u8>,
}

impl FormatDescriptor {
    /// Build a descriptor, rejecting inverted bounds.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        kind: VideoFormatKind,
        min_width: u32,
        max_width: u32,
        min_height: u32,
        max_height: u32,
        min_fps: u32,
        max_fps: u32,
        payload: Vec<u8>,
    ) -> Result<Self, CaptureError> {
        let desc = Self {
            kind,
            min_width,
            max_width,
            min_height,
            max_height,
            min_fps,
            max_fps,
            payload,
        };
        desc.validate()?;
        Ok(desc)
    }

    pub fn validate(&self) -> Result<(), CaptureError> {
        if self.min_width > self.max_width
            || self.min_height > self.max_height
            || self.min_fps > self.max_fps
        {
            return Err(CaptureError::ConfigurationFailed(format!(
                "inverted capability bounds: {}x{}..{}x{} @ {}..{}",
                self.min_width,
                self.min_height,
                self.max_width,
                self.max_height,
                self.min_fps,
                self.max_fps
            )));
        }
        Ok(())
    }

    /// Whether this capability can produce the requested mode.
    ///
    /// Width and height are exact range checks; the frame rate gets one
    /// unit of slack on each side to absorb driver rounding (29 fps
    /// matches a 30..60 range, 61 matches it too).
    pub fn admits(&self, request: &CaptureRequest) -> bool {
        self.min_width <= request.width
            && request.width <= self.max_width
            && self.min_height <= request.height
            && request.height <= self.max_height
            && self.min_fps.saturating_sub(1) <= request.fps
            && request.fps <= self.max_fps.saturating_add(1)
    }
}

/// Caller-supplied constraint for video format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureRequest {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desc(kind: VideoFormatKind) -> FormatDescriptor {
        FormatDescriptor::new(kind, 320, 1920, 240, 1080, 30, 60, vec![1, 2, 3]).unwrap()
    }

    #[test]
    fn clone_deep_copies_payload() {
        let a = desc(VideoFormatKind::Yuy2);
        let mut b = a.clone();
        b.payload[0] = 9;
        assert_eq!(a.payload, vec![1, 2, 3]);
    }

    #[test]
    fn inverted_bounds_rejected() {
        let err =
            FormatDescriptor::new(VideoFormatKind::Rgb24, 640, 320, 240, 480, 30, 60, Vec::new());
        assert!(err.is_err());
    }

    #[test]
    fn admits_respects_fps_slack() {
        let d = desc(VideoFormatKind::Rgb24);
        let req = |fps| CaptureRequest {
            width: 640,
            height: 480,
            fps,
        };
        assert!(d.admits(&req(29)));
        assert!(d.admits(&req(61)));
        assert!(!d.admits(&req(28)));
        assert!(!d.admits(&req(62)));
    }

    #[test]
    fn admits_fps_slack_does_not_underflow() {
        let d =
            FormatDescriptor::new(VideoFormatKind::Rgb24, 0, 100, 0, 100, 0, 10, Vec::new())
                .unwrap();
        assert!(d.admits(&CaptureRequest {
            width: 50,
            height: 50,
            fps: 0
        }));
    }

    #[test]
    fn admits_fps_slack_does_not_overflow_an_unbounded_rate() {
        // u32::MAX encodes "no upper bound" on the frame rate.
        let d = FormatDescriptor::new(
            VideoFormatKind::Rgb24,
            0,
            100,
            0,
            100,
            30,
            u32::MAX,
            Vec::new(),
        )
        .unwrap();
        assert!(d.admits(&CaptureRequest {
            width: 50,
            height: 50,
            fps: 60
        }));
        assert!(d.admits(&CaptureRequest {
            width: 50,
            height: 50,
            fps: u32::MAX
        }));
    }

    #[test]
    fn dimensions_are_exact_ranges() {
        let d = desc(VideoFormatKind::Rgb24);
        assert!(!d.admits(&CaptureRequest {
            width: 1921,
            height: 480,
            fps: 30
        }));
        assert!(!d.admits(&CaptureRequest {
            width: 640,
            height: 239,
            fps: 30
        }));
    }

    #[test]
    fn rank_table_matches_preference_order() {
        assert_eq!(VideoFormatKind::Rgb32.rank(), 12);
        assert_eq!(VideoFormatKind::Yuy2.rank(), 11);
        assert_eq!(VideoFormatKind::I420.rank(), 10);
        assert_eq!(VideoFormatKind::H264.rank(), 10);
        assert_eq!(VideoFormatKind::Mjpg.rank(), 8);
        assert_eq!(VideoFormatKind::Mpeg2Video.rank(), 7);
        assert_eq!(VideoFormatKind::Dvsd.rank(), 5);
        assert_eq!(VideoFormatKind::Y41P.rank(), -1);
        assert_eq!(VideoFormatKind::None.rank(), -1);
    }
}
