//! Stream format tag.

//---------------------------------------------------------------------------------------------------- use
use crate::{
	error::OutputError,
	fifo::{MAX_CHANNELS,MAX_SAMPLE_RATE},
};

//---------------------------------------------------------------------------------------------------- StreamFormat
/// The format of the interleaved signed 16-bit PCM held in an [`AudioFifo`](crate::fifo::AudioFifo).
///
/// Set by the producer whenever the decoder's output format
/// changes and read by the output engine when it (re)opens a stream.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy,Clone,Debug,PartialEq,Eq,Hash)]
pub struct StreamFormat {
	/// Frames per second.
	pub sample_rate: u32,
	/// Interleaved samples per frame.
	pub channels: u8,
}

impl StreamFormat {
	/// 48kHz stereo, the most common DAB+ output.
	pub const DEFAULT: Self = Self {
		sample_rate: MAX_SAMPLE_RATE,
		channels:    MAX_CHANNELS,
	};

	#[inline]
	#[must_use]
	/// Create a new [`StreamFormat`].
	pub const fn new(sample_rate: u32, channels: u8) -> Self {
		Self { sample_rate, channels }
	}

	#[inline]
	#[must_use]
	/// Size of one frame (all channels' samples for one time-sample) in bytes.
	pub const fn bytes_per_frame(&self) -> usize {
		self.channels as usize * std::mem::size_of::<i16>()
	}

	#[inline]
	#[must_use]
	/// Sample rate in whole kHz.
	pub const fn sample_rate_khz(&self) -> usize {
		self.sample_rate as usize / 1000
	}

	#[inline]
	#[must_use]
	/// How many frames `ms` milliseconds of audio is.
	pub const fn frames_for_ms(&self, ms: usize) -> usize {
		ms * self.sample_rate_khz()
	}

	#[inline]
	#[must_use]
	/// How many bytes `ms` milliseconds of audio is.
	pub const fn bytes_for_ms(&self, ms: usize) -> usize {
		self.frames_for_ms(ms) * self.bytes_per_frame()
	}

	/// Check that this format can be played.
	///
	/// # Errors
	/// - [`OutputError::InvalidChannels`] on `0` channels
	/// - [`OutputError::InvalidSampleRate`] on a sample rate below `1kHz`
	pub fn validate(&self) -> Result<(), OutputError> {
		if self.channels == 0 {
			return Err(OutputError::InvalidChannels);
		}
		if self.sample_rate < 1000 {
			return Err(OutputError::InvalidSampleRate);
		}
		Ok(())
	}
}

impl Default for StreamFormat {
	fn default() -> Self {
		Self::DEFAULT
	}
}

impl std::fmt::Display for StreamFormat {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}Hz/{}ch", self.sample_rate, self.channels)
	}
}

//---------------------------------------------------------------------------------------------------- TESTS
#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn sizes() {
		let stereo = StreamFormat::new(48_000, 2);
		assert_eq!(stereo.bytes_per_frame(), 4);
		assert_eq!(stereo.frames_for_ms(50), 2400);
		assert_eq!(stereo.bytes_for_ms(50), 9600);

		let mono = StreamFormat::new(32_000, 1);
		assert_eq!(mono.bytes_per_frame(), 2);
		assert_eq!(mono.sample_rate_khz(), 32);
		assert_eq!(mono.bytes_for_ms(60), 3840);
	}

	#[test]
	fn validate() {
		assert_eq!(StreamFormat::DEFAULT.validate(), Ok(()));
		assert_eq!(StreamFormat::new(48_000, 0).validate(), Err(OutputError::InvalidChannels));
		assert_eq!(StreamFormat::new(0, 2).validate(), Err(OutputError::InvalidSampleRate));
		assert_eq!(StreamFormat::new(999, 1).validate(), Err(OutputError::InvalidSampleRate));
	}

	#[test]
	fn display() {
		assert_eq!(StreamFormat::new(24_000, 1).to_string(), "24000Hz/1ch");
	}
}
