use super::error::CaptureError;

/// Speaker-position bit assignments, matching the WAVEFORMATEXTENSIBLE
/// channel mask layout used by shared-mode mix formats.
pub mod speaker_mask {
    pub const FRONT_LEFT: u32 = 0x1;
    pub const FRONT_RIGHT: u32 = 0x2;
    pub const FRONT_CENTER: u32 = 0x4;
    pub const LOW_FREQUENCY: u32 = 0x8;
    pub const BACK_LEFT: u32 = 0x10;
    pub const BACK_RIGHT: u32 = 0x20;
    pub const BACK_CENTER: u32 = 0x100;
    pub const SIDE_LEFT: u32 = 0x200;
    pub const SIDE_RIGHT: u32 = 0x400;

    pub const STEREO: u32 = FRONT_LEFT | FRONT_RIGHT;
    pub const QUAD: u32 = STEREO | BACK_LEFT | BACK_RIGHT;
    pub const TWO_POINT_ONE: u32 = STEREO | LOW_FREQUENCY;
    pub const FOUR_POINT_ONE: u32 = QUAD | LOW_FREQUENCY;
    pub const SURROUND: u32 = STEREO | FRONT_CENTER | BACK_CENTER;
    pub const FIVE_POINT_ONE: u32 = STEREO | FRONT_CENTER | LOW_FREQUENCY | BACK_LEFT | BACK_RIGHT;
    pub const FIVE_POINT_ONE_SURROUND: u32 =
        STEREO | FRONT_CENTER | LOW_FREQUENCY | SIDE_LEFT | SIDE_RIGHT;
}

/// Sample encoding of a device mix format.
///
/// The shared-mode audio engine mixes in IEEE float; anything else is
/// rejected at acquisition rather than converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleEncoding {
    FloatIeee,
    PcmInt,
}

impl SampleEncoding {
    pub fn describe(&self) -> &'static str {
        match self {
            Self::FloatIeee => "32-bit IEEE float",
            Self::PcmInt => "integer PCM",
        }
    }
}

/// Native mix format of an acquired audio endpoint.
///
/// Populated once when the endpoint is opened and immutable for the
/// session's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioDeviceFormat {
    pub channels: u16,
    pub channel_mask: u32,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    pub block_size: u16,
    pub encoding: SampleEncoding,
}

/// Recognized speaker layouts.
///
/// Mono and stereo are identified by channel count alone (a 1- or
/// 2-channel stream mixes the same way regardless of its mask); layouts
/// above two channels must carry one of the recognized masks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelLayout {
    Mono,
    Stereo,
    Quad,
    TwoPointOne,
    FourPointOne,
    Surround,
    FivePointOne,
    FivePointOneSurround,
}

impl ChannelLayout {
    /// Resolve the layout for a device format, or the typed fatal error
    /// for an unrecognized multi-channel mask.
    pub fn from_format(format: &AudioDeviceFormat) -> Result<Self, CaptureError> {
        match format.channels {
            1 => Ok(Self::Mono),
            2 => Ok(Self::Stereo),
            _ => match format.channel_mask {
                speaker_mask::QUAD => Ok(Self::Quad),
                speaker_mask::TWO_POINT_ONE => Ok(Self::TwoPointOne),
                speaker_mask::FOUR_POINT_ONE => Ok(Self::FourPointOne),
                speaker_mask::SURROUND => Ok(Self::Surround),
                speaker_mask::FIVE_POINT_ONE => Ok(Self::FivePointOne),
                speaker_mask::FIVE_POINT_ONE_SURROUND => Ok(Self::FivePointOneSurround),
                mask => Err(CaptureError::UnsupportedChannelLayout {
                    channels: format.channels,
                    mask,
                }),
            },
        }
    }

    /// Interleaved channels per frame for this layout.
    pub fn channels(&self) -> usize {
        match self {
            Self::Mono => 1,
            Self::Stereo => 2,
            Self::TwoPointOne => 3,
            Self::Quad | Self::Surround => 4,
            Self::FourPointOne => 5,
            Self::FivePointOne | Self::FivePointOneSurround => 6,
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Self::Mono => "mono",
            Self::Stereo => "stereo",
            Self::Quad => "quad speaker setup",
            Self::TwoPointOne => "2.1 speaker setup",
            Self::FourPointOne => "4.1 speaker setup",
            Self::Surround => "basic surround speaker setup",
            Self::FivePointOne => "5.1 speaker setup",
            Self::FivePointOneSurround => "5.1 surround speaker setup",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(channels: u16, mask: u32) -> AudioDeviceFormat {
        AudioDeviceFormat {
            channels,
            channel_mask: mask,
            sample_rate: 48_000,
            bits_per_sample: 32,
            block_size: channels * 4,
            encoding: SampleEncoding::FloatIeee,
        }
    }

    #[test]
    fn mono_and_stereo_resolve_by_count() {
        assert_eq!(
            ChannelLayout::from_format(&format(1, 0)).unwrap(),
            ChannelLayout::Mono
        );
        // Mask is ignored at two channels or fewer.
        assert_eq!(
            ChannelLayout::from_format(&format(2, 0xFFFF)).unwrap(),
            ChannelLayout::Stereo
        );
    }

    #[test]
    fn recognized_masks_resolve() {
        let cases = [
            (4, speaker_mask::QUAD, ChannelLayout::Quad),
            (3, speaker_mask::TWO_POINT_ONE, ChannelLayout::TwoPointOne),
            (5, speaker_mask::FOUR_POINT_ONE, ChannelLayout::FourPointOne),
            (4, speaker_mask::SURROUND, ChannelLayout::Surround),
            (6, speaker_mask::FIVE_POINT_ONE, ChannelLayout::FivePointOne),
            (
                6,
                speaker_mask::FIVE_POINT_ONE_SURROUND,
                ChannelLayout::FivePointOneSurround,
            ),
        ];
        for (channels, mask, expected) in cases {
            assert_eq!(
                ChannelLayout::from_format(&format(channels, mask)).unwrap(),
                expected
            );
            assert_eq!(expected.channels(), channels as usize);
        }
    }

    #[test]
    fn unknown_multichannel_mask_is_fatal() {
        let err = ChannelLayout::from_format(&format(3, 0x7)).unwrap_err();
        assert_eq!(
            err,
            CaptureError::UnsupportedChannelLayout {
                channels: 3,
                mask: 0x7
            }
        );
    }
}
