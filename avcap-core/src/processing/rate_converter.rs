//! Streaming sample-rate conversion into the canonical 44.1kHz rate.
//!
//! The converter is configured once per session with a fixed ratio and
//! holds interpolation state across calls — it is a streaming filter,
//! not a stateless function. The filter itself sits behind
//! [`ResamplerBackend`] so sessions can be exercised with an injected
//! backend in tests.

use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

use crate::models::error::CaptureError;
use crate::processing::quantum_buffer::CANONICAL_SAMPLE_RATE;

/// Outcome of one conversion call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResampleChunk {
    /// Input frames the filter actually consumed. The pipeline sizes its
    /// packets so this always equals the frames offered; a shortfall is
    /// a per-packet fault the session masks with silence.
    pub input_frames_used: usize,
    /// Stereo frames written to the output.
    pub output_frames: usize,
}

/// Boundary to the sample-rate-conversion primitive.
///
/// `input` is interleaved stereo; implementations append interleaved
/// stereo output to `out` and report both counts.
pub trait ResamplerBackend: Send {
    fn process(
        &mut self,
        input: &[f32],
        frames: usize,
        out: &mut Vec<f32>,
    ) -> Result<ResampleChunk, CaptureError>;
}

/// View of one converted block, borrowed from the converter's scratch.
#[derive(Debug)]
pub struct ConvertedBlock<'a> {
    pub samples: &'a [f32],
    pub output_frames: usize,
    pub input_frames_used: usize,
}

/// Session-side wrapper owning the backend, the fixed ratio, and the
/// output scratch buffer.
pub struct RateConverter {
    backend: Box<dyn ResamplerBackend>,
    ratio: f64,
    scratch: Vec<f32>,
}

impl RateConverter {
    /// Build the converter for a device rate, or `None` when the device
    /// already runs at the canonical rate and the pipeline operates
    /// pass-through.
    pub fn for_device_rate(device_rate: u32) -> Result<Option<Self>, CaptureError> {
        if device_rate == CANONICAL_SAMPLE_RATE {
            return Ok(None);
        }
        let backend = SincResamplerBackend::new(device_rate)?;
        let ratio = f64::from(CANONICAL_SAMPLE_RATE) / f64::from(device_rate);
        Ok(Some(Self::with_backend(Box::new(backend), ratio)))
    }

    /// Wrap an explicit backend. Used by sessions under test to inject
    /// fault-reporting mocks.
    pub fn with_backend(backend: Box<dyn ResamplerBackend>, ratio: f64) -> Self {
        Self {
            backend,
            ratio,
            scratch: Vec::new(),
        }
    }

    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    /// Convert `frames` interleaved stereo frames. The scratch is
    /// pre-reserved to ⌈frames·ratio⌉+1 frames to tolerate conversion
    /// overshoot; the backend may grow it further.
    pub fn convert(
        &mut self,
        input: &[f32],
        frames: usize,
    ) -> Result<ConvertedBlock<'_>, CaptureError> {
        let headroom_frames = (frames as f64 * self.ratio).ceil() as usize + 1;
        self.scratch.clear();
        self.scratch.reserve(headroom_frames * 2);

        let chunk = self.backend.process(input, frames, &mut self.scratch)?;
        Ok(ConvertedBlock {
            samples: &self.scratch[..chunk.output_frames * 2],
            output_frames: chunk.output_frames,
            input_frames_used: chunk.input_frames_used,
        })
    }
}

/// Windowed-sinc backend over `rubato::SincFixedIn`, stereo.
///
/// The filter consumes fixed 10ms device chunks; the interleaved input
/// is split into planar scratch buffers around rubato's per-channel API
/// and reinterleaved on the way out. Packets shorter than one chunk go
/// through the partial-process path and are still fully consumed.
pub struct SincResamplerBackend {
    inner: SincFixedIn<f32>,
    chunk_frames: usize,
    planar_in: [Vec<f32>; 2],
    planar_out: [Vec<f32>; 2],
}

impl SincResamplerBackend {
    pub fn new(device_rate: u32) -> Result<Self, CaptureError> {
        let ratio = f64::from(CANONICAL_SAMPLE_RATE) / f64::from(device_rate);
        // Shared-mode engines deliver 10ms packets.
        let chunk_frames = (device_rate / 100).max(1) as usize;

        let params = SincInterpolationParameters {
            sinc_len: 256,
            f_cutoff: 0.95,
            interpolation: SincInterpolationType::Linear,
            oversampling_factor: 256,
            window: WindowFunction::BlackmanHarris2,
        };

        let inner = SincFixedIn::<f32>::new(ratio, 2.0, params, chunk_frames, 2)
            .map_err(|e| CaptureError::ResamplerInit(e.to_string()))?;
        let out_max = inner.output_frames_max();

        Ok(Self {
            inner,
            chunk_frames,
            planar_in: [Vec::new(), Vec::new()],
            planar_out: [vec![0.0; out_max], vec![0.0; out_max]],
        })
    }
}

impl ResamplerBackend for SincResamplerBackend {
    fn process(
        &mut self,
        input: &[f32],
        frames: usize,
        out: &mut Vec<f32>,
    ) -> Result<ResampleChunk, CaptureError> {
        self.planar_in[0].clear();
        self.planar_in[1].clear();
        for frame in input[..frames * 2].chunks_exact(2) {
            self.planar_in[0].push(frame[0]);
            self.planar_in[1].push(frame[1]);
        }

        let mut consumed = 0;
        let mut produced = 0;
        while consumed < frames {
            let take = (frames - consumed).min(self.chunk_frames);
            let slices: [&[f32]; 2] = [
                &self.planar_in[0][consumed..consumed + take],
                &self.planar_in[1][consumed..consumed + take],
            ];

            let (used, written) = if take == self.chunk_frames {
                self.inner
                    .process_into_buffer(&slices, &mut self.planar_out, None)
            } else {
                self.inner
                    .process_partial_into_buffer(Some(&slices), &mut self.planar_out, None)
            }
            .map_err(|e| CaptureError::StreamFault(e.to_string()))?;

            out.reserve(written * 2);
            for i in 0..written {
                out.push(self.planar_out[0][i]);
                out.push(self.planar_out[1][i]);
            }
            produced += written;
            // The partial path zero-pads internally; the short packet
            // itself is consumed in full.
            consumed += if take == self.chunk_frames { used } else { take };
        }

        Ok(ResampleChunk {
            input_frames_used: consumed,
            output_frames: produced,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct PassthroughBackend;

    impl ResamplerBackend for PassthroughBackend {
        fn process(
            &mut self,
            input: &[f32],
            frames: usize,
            out: &mut Vec<f32>,
        ) -> Result<ResampleChunk, CaptureError> {
            out.extend_from_slice(&input[..frames * 2]);
            Ok(ResampleChunk {
                input_frames_used: frames,
                output_frames: frames,
            })
        }
    }

    struct HalfConsumingBackend;

    impl ResamplerBackend for HalfConsumingBackend {
        fn process(
            &mut self,
            _input: &[f32],
            frames: usize,
            out: &mut Vec<f32>,
        ) -> Result<ResampleChunk, CaptureError> {
            let half = frames / 2;
            out.resize(half * 2, 0.0);
            Ok(ResampleChunk {
                input_frames_used: half,
                output_frames: half,
            })
        }
    }

    fn stereo_ramp(frames: usize) -> Vec<f32> {
        (0..frames * 2).map(|i| i as f32 * 1e-3).collect()
    }

    #[test]
    fn canonical_rate_needs_no_converter() {
        assert!(RateConverter::for_device_rate(44_100).unwrap().is_none());
        assert!(RateConverter::for_device_rate(48_000).unwrap().is_some());
    }

    #[test]
    fn convert_reports_full_consumption_from_a_well_behaved_backend() {
        let mut conv = RateConverter::with_backend(Box::new(PassthroughBackend), 1.0);
        let input = stereo_ramp(240);
        let block = conv.convert(&input, 240).unwrap();
        assert_eq!(block.input_frames_used, 240);
        assert_eq!(block.output_frames, 240);
        assert_eq!(block.samples, &input[..]);
    }

    #[test]
    fn convert_surfaces_partial_consumption_for_the_caller_to_detect() {
        let mut conv = RateConverter::with_backend(Box::new(HalfConsumingBackend), 1.0);
        let input = stereo_ramp(240);
        let block = conv.convert(&input, 240).unwrap();
        assert_eq!(block.input_frames_used, 120);
        assert_ne!(block.input_frames_used, 240);
    }

    #[test]
    fn sinc_backend_fully_consumes_ten_ms_device_packets() {
        // 48kHz → 44.1kHz, 10ms packets of 480 frames.
        let mut conv = RateConverter::for_device_rate(48_000).unwrap().unwrap();
        assert!((conv.ratio() - 44_100.0 / 48_000.0).abs() < 1e-12);

        let input = stereo_ramp(480);
        let mut total_output = 0;
        for packet in 0..8 {
            let block = conv.convert(&input, 480).unwrap();
            assert_eq!(block.input_frames_used, 480);
            assert_eq!(block.samples.len(), block.output_frames * 2);
            total_output += block.output_frames;
            // ~441 frames out per packet once the filter is primed; the
            // first packet comes up short by the sinc startup delay.
            if packet > 0 {
                assert!(
                    block.output_frames > 400 && block.output_frames < 500,
                    "packet {packet}: output_frames = {}",
                    block.output_frames
                );
            }
        }
        // Cumulative output tracks the ratio minus the startup delay.
        let expected = 441 * 8;
        assert!(
            total_output > expected - 256 && total_output <= expected + 8,
            "total_output = {total_output}"
        );
    }

    #[test]
    fn sinc_backend_consumes_short_trailing_packets() {
        let mut conv = RateConverter::for_device_rate(48_000).unwrap().unwrap();
        let input = stereo_ramp(100);
        let block = conv.convert(&input, 100).unwrap();
        assert_eq!(block.input_frames_used, 100);
    }

    #[test]
    fn sinc_backend_handles_multi_chunk_packets() {
        let mut conv = RateConverter::for_device_rate(48_000).unwrap().unwrap();
        let input = stereo_ramp(480 * 2 + 100);
        let block = conv.convert(&input, 480 * 2 + 100).unwrap();
        assert_eq!(block.input_frames_used, 480 * 2 + 100);
        assert!(block.output_frames > 0);
    }

    #[test]
    fn empty_packet_converts_to_nothing() {
        let mut conv = RateConverter::for_device_rate(48_000).unwrap().unwrap();
        let block = conv.convert(&[], 0).unwrap();
        assert_eq!(block.input_frames_used, 0);
        assert_eq!(block.output_frames, 0);
    }
}
