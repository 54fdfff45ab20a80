//! Channel layout normalization into the canonical stereo form.
//!
//! Every recognized layout gets its own mixing plan holding the
//! calibrated coefficients; there is no mid-stream branching on raw
//! channel masks. Unsupported layouts are rejected when the plan is
//! built, at acquisition time.

use crate::models::audio_format::{AudioDeviceFormat, ChannelLayout};
use crate::models::error::CaptureError;

pub const DB_MINUS_3: f32 = 0.707_106_781_186_547_6;
pub const DB_MINUS_6: f32 = 0.5;
pub const DB_MINUS_9: f32 = 0.353_553_390_593_273_8;

const SURROUND_MIX: f32 = DB_MINUS_3;
const CENTER_MIX: f32 = DB_MINUS_3;
const LOW_FREQ_MIX: f32 = 3.162_277_66 * DB_MINUS_3;

/// Per-layout downmix/upmix plan.
///
/// Each multi-channel variant carries the coefficient set it mixes with.
/// Input channel order follows the layout's interleaved frame order:
/// front left, front right, then center/LFE/rear as present.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MixPlan {
    MonoUpmix,
    StereoPass,
    Quad { rear: f32 },
    TwoPointOne { lfe: f32 },
    FourPointOne { lfe: f32, rear: f32 },
    Surround { center: f32, rear: f32 },
    FivePointOne { center: f32, lfe: f32, rear: f32 },
}

impl MixPlan {
    /// The plan for a recognized layout.
    ///
    /// 5.1 and 5.1-surround differ only in whether the rear pair sits on
    /// back or side speakers; both mix identically.
    pub fn for_layout(layout: ChannelLayout) -> Self {
        match layout {
            ChannelLayout::Mono => Self::MonoUpmix,
            ChannelLayout::Stereo => Self::StereoPass,
            ChannelLayout::Quad => Self::Quad { rear: SURROUND_MIX },
            ChannelLayout::TwoPointOne => Self::TwoPointOne { lfe: LOW_FREQ_MIX },
            ChannelLayout::FourPointOne => Self::FourPointOne {
                lfe: LOW_FREQ_MIX,
                rear: SURROUND_MIX,
            },
            ChannelLayout::Surround => Self::Surround {
                center: CENTER_MIX,
                rear: SURROUND_MIX * DB_MINUS_3,
            },
            ChannelLayout::FivePointOne | ChannelLayout::FivePointOneSurround => {
                Self::FivePointOne {
                    center: CENTER_MIX,
                    lfe: LOW_FREQ_MIX,
                    rear: SURROUND_MIX,
                }
            }
        }
    }

    /// Interleaved input channels per frame.
    pub fn input_channels(&self) -> usize {
        match self {
            Self::MonoUpmix => 1,
            Self::StereoPass => 2,
            Self::TwoPointOne { .. } => 3,
            Self::Quad { .. } | Self::Surround { .. } => 4,
            Self::FourPointOne { .. } => 5,
            Self::FivePointOne { .. } => 6,
        }
    }
}

/// Converts interleaved device frames into canonical stereo frames.
///
/// Pure addition and scaling of float samples; no clamping is applied,
/// downstream stages tolerate transient values outside [−1, 1].
#[derive(Debug, Clone)]
pub struct ChannelMixer {
    plan: MixPlan,
    vectorized: bool,
}

impl ChannelMixer {
    /// Build a mixer from an already-resolved plan.
    ///
    /// `vectorized` enables the unrolled fast path for the mono up-mix;
    /// it is a capability flag supplied by the host, not read from
    /// ambient state. Both paths produce bit-identical output.
    pub fn new(plan: MixPlan, vectorized: bool) -> Self {
        Self { plan, vectorized }
    }

    /// Build the mixer for an acquired device format.
    pub fn for_format(format: &AudioDeviceFormat, vectorized: bool) -> Result<Self, CaptureError> {
        let layout = ChannelLayout::from_format(format)?;
        Ok(Self::new(MixPlan::for_layout(layout), vectorized))
    }

    pub fn plan(&self) -> MixPlan {
        self.plan
    }

    /// Remix `frames` interleaved input frames into `out` as interleaved
    /// stereo. `out` is resized to exactly `frames * 2` samples.
    pub fn remix(&self, input: &[f32], frames: usize, out: &mut Vec<f32>) {
        let in_samples = frames * self.plan.input_channels();
        debug_assert!(input.len() >= in_samples);
        let input = &input[..in_samples];

        out.resize(frames * 2, 0.0);

        match self.plan {
            MixPlan::MonoUpmix => {
                if self.vectorized {
                    upmix_mono_unrolled(input, out);
                } else {
                    upmix_mono_scalar(input, out);
                }
            }
            // A straight copy is the fast path on every target.
            MixPlan::StereoPass => out.copy_from_slice(input),
            MixPlan::Quad { rear } => {
                for (frame, o) in input.chunks_exact(4).zip(out.chunks_exact_mut(2)) {
                    let r = (frame[2] + frame[3]) * rear;
                    o[0] = frame[0] - r;
                    o[1] = frame[1] + r;
                }
            }
            MixPlan::TwoPointOne { lfe } => {
                for (frame, o) in input.chunks_exact(3).zip(out.chunks_exact_mut(2)) {
                    let low = frame[2] * lfe;
                    o[0] = frame[0] + low;
                    o[1] = frame[1] + low;
                }
            }
            MixPlan::FourPointOne { lfe, rear } => {
                for (frame, o) in input.chunks_exact(5).zip(out.chunks_exact_mut(2)) {
                    let low = frame[2] * lfe;
                    let r = (frame[3] + frame[4]) * rear;
                    o[0] = frame[0] + low - r;
                    o[1] = frame[1] + low + r;
                }
            }
            MixPlan::Surround { center, rear } => {
                for (frame, o) in input.chunks_exact(4).zip(out.chunks_exact_mut(2)) {
                    let c = frame[2] * center;
                    let r = frame[3] * rear;
                    o[0] = frame[0] + c - r;
                    o[1] = frame[1] + c + r;
                }
            }
            MixPlan::FivePointOne { center, lfe, rear } => {
                for (frame, o) in input.chunks_exact(6).zip(out.chunks_exact_mut(2)) {
                    let c = frame[2] * center;
                    let low = frame[3] * lfe;
                    let r = (frame[4] + frame[5]) * rear;
                    o[0] = frame[0] + c + low - r;
                    o[1] = frame[1] + c + low + r;
                }
            }
        }
    }
}

fn upmix_mono_scalar(input: &[f32], out: &mut [f32]) {
    for (i, &sample) in input.iter().enumerate() {
        out[i * 2] = sample;
        out[i * 2 + 1] = sample;
    }
}

/// Four-frame unrolled mono up-mix. Same stores as the scalar path in
/// the same order, so the result is bit-identical.
fn upmix_mono_unrolled(input: &[f32], out: &mut [f32]) {
    let mut chunks = input.chunks_exact(4);
    let mut o = 0;
    for chunk in chunks.by_ref() {
        out[o] = chunk[0];
        out[o + 1] = chunk[0];
        out[o + 2] = chunk[1];
        out[o + 3] = chunk[1];
        out[o + 4] = chunk[2];
        out[o + 5] = chunk[2];
        out[o + 6] = chunk[3];
        out[o + 7] = chunk[3];
        o += 8;
    }
    for &sample in chunks.remainder() {
        out[o] = sample;
        out[o + 1] = sample;
        o += 2;
    }
}
