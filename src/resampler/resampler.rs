//! Audio resampling.
//!
//! This takes fixed-size chunks of interleaved `i16` frames
//! and resamples them to the device's sample rate.
//!
//! All buffers are allocated in [`Resampler::new`], so
//! [`Resampler::process`] is real-time safe.
//!
//! The backend is `rubato`'s synchronous FFT resampler.

//----------------------------------------------------------------------------------------------- use
use std::borrow::Cow;
use rubato::{FftFixedIn,Resampler as _};
use crate::{
	error::OutputError,
	macros::{debug2,error2},
};

//----------------------------------------------------------------------------------------------- Constants
/// FFT sub-chunks per input chunk, more is less delay and more CPU.
const SUB_CHUNKS: usize = 2;

//----------------------------------------------------------------------------------------------- Resampler
/// Converts chunks of a fixed number of frames.
#[cfg_attr(feature = "dummy", allow(dead_code))]
pub(crate) struct Resampler {
	inner: FftFixedIn<f32>,
	channels: usize,
	frames_in: usize,
	/// Planar input, one `Vec` per channel.
	input: Vec<Vec<f32>>,
	/// Planar output, one `Vec` per channel.
	output: Vec<Vec<f32>>,
}

#[cfg_attr(feature = "dummy", allow(dead_code))]
impl Resampler {
	#[cold]
	#[inline(never)]
	/// Create a resampler from `rate_in` to `rate_out` for
	/// chunks of `frames_in` frames of `channels` channels.
	///
	/// This allocates, it shouldn't be called from the audio thread.
	pub(crate) fn new(
		rate_in: u32,
		rate_out: u32,
		frames_in: usize,
		channels: usize,
	) -> Result<Self, OutputError> {
		debug2!("Resampler - new(), {rate_in}Hz -> {rate_out}Hz, frames_in: {frames_in}, channels: {channels}");

		if rate_in == 0 || rate_out == 0 {
			return Err(OutputError::InvalidSampleRate);
		}
		if channels == 0 {
			return Err(OutputError::InvalidChannels);
		}
		if frames_in < SUB_CHUNKS {
			return Err(OutputError::InvalidSpec);
		}

		let inner = FftFixedIn::<f32>::new(
			rate_in as usize,
			rate_out as usize,
			frames_in,
			SUB_CHUNKS,
			channels,
		)?;
		let input = inner.input_buffer_allocate(true);
		let output = inner.output_buffer_allocate(true);

		Ok(Self {
			inner,
			channels,
			frames_in,
			input,
			output,
		})
	}

	#[inline]
	/// The most frames one [`Self::process`] can output.
	pub(crate) fn frames_out_max(&self) -> usize {
		self.inner.output_frames_max()
	}

	/// Resample the interleaved `samples` into `out`, replacing its contents.
	///
	/// `samples` must hold exactly the `frames_in` given to [`Self::new`].
	/// `out` never reallocates if it has room for [`Self::frames_out_max`] frames.
	pub(crate) fn process(&mut self, samples: &[i16], out: &mut Vec<i16>) -> Result<(), OutputError> {
		debug_assert_eq!(samples.len(), self.frames_in * self.channels);

		// De-interleave.
		for (i, frame) in samples.chunks_exact(self.channels).enumerate() {
			for (channel, sample) in self.input.iter_mut().zip(frame) {
				channel[i] = f32::from(*sample);
			}
		}

		let (_, frames) = self.inner.process_into_buffer(&self.input, &mut self.output, None)?;

		// Re-interleave.
		out.clear();
		for i in 0..frames {
			for channel in &self.output {
				out.push(to_i16(channel[i]));
			}
		}

		Ok(())
	}
}

impl std::fmt::Debug for Resampler {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Resampler")
			.field("channels", &self.channels)
			.field("frames_in", &self.frames_in)
			.finish_non_exhaustive()
	}
}

#[inline]
fn to_i16(sample: f32) -> i16 {
	// `as` saturates, NaN is 0.
	#[allow(clippy::cast_possible_truncation)]
	{ sample.round() as i16 }
}

//----------------------------------------------------------------------------------------------- Error re-map
impl From<rubato::ResamplerConstructionError> for OutputError {
	fn from(error: rubato::ResamplerConstructionError) -> Self {
		error2!("Resampler - construction failed: {error}");
		Self::InvalidSampleRate
	}
}

impl From<rubato::ResampleError> for OutputError {
	fn from(error: rubato::ResampleError) -> Self {
		Self::Unknown(Cow::Owned(error.to_string()))
	}
}

//----------------------------------------------------------------------------------------------- TESTS
#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn invalid() {
		assert_eq!(Resampler::new(0, 48_000, 1920, 2).unwrap_err(), OutputError::InvalidSampleRate);
		assert_eq!(Resampler::new(32_000, 48_000, 1920, 0).unwrap_err(), OutputError::InvalidChannels);
		assert_eq!(Resampler::new(32_000, 48_000, 1, 2).unwrap_err(), OutputError::InvalidSpec);
	}

	#[test]
	// 60ms at 32kHz is 60ms at 48kHz.
	fn upsample_chunk_length() {
		let mut r = Resampler::new(32_000, 48_000, 1920, 2).unwrap();
		assert!(r.frames_out_max() >= 2880);

		let samples = vec![0_i16; 1920 * 2];
		let mut out = Vec::with_capacity(r.frames_out_max() * 2);
		let capacity = out.capacity();
		for _ in 0..4 {
			r.process(&samples, &mut out).unwrap();
			assert_eq!(out.len(), 2880 * 2);
		}
		assert_eq!(out.capacity(), capacity);
	}

	#[test]
	// A constant level comes out at the same level, once the filter has settled.
	fn dc_level_kept() {
		let mut r = Resampler::new(24_000, 48_000, 1440, 1).unwrap();
		let samples = vec![1000_i16; 1440];
		let mut out = Vec::new();
		for _ in 0..6 {
			r.process(&samples, &mut out).unwrap();
		}

		assert_eq!(out.len(), 2880);
		for s in &out[100..2780] {
			assert!((980..=1020).contains(s), "{s}");
		}
	}

	#[test]
	fn channels_stay_apart() {
		let mut r = Resampler::new(32_000, 44_100, 1920, 2).unwrap();
		let samples: Vec<i16> = [1000_i16, -1000].repeat(1920);
		let mut out = Vec::new();
		for _ in 0..6 {
			r.process(&samples, &mut out).unwrap();
		}

		let middle = out.len() / 2 / 2 * 2;
		assert!(out[middle] > 900);
		assert!(out[middle + 1] < -900);
	}
}
