//! FIFO sizing.

//---------------------------------------------------------------------------------------------------- Constants
/// The highest sample rate a DAB/DAB+ audio service decodes to.
pub const MAX_SAMPLE_RATE: u32 = 48_000;

/// The highest channel count a DAB/DAB+ audio service decodes to.
pub const MAX_CHANNELS: u8 = 2;

/// Decoded audio is handed to the FIFO in chunks of (at most) this many milliseconds.
pub const AUDIO_FIFO_CHUNK_MS: usize = 120;

/// How many milliseconds of audio the default FIFO holds
/// at [`MAX_SAMPLE_RATE`] and [`MAX_CHANNELS`].
///
/// Enough to absorb decoder jitter and to reach the unmute
/// threshold, small enough that the added latency stays acceptable.
pub const AUDIO_FIFO_MS: usize = 8 * AUDIO_FIFO_CHUNK_MS;

/// Default FIFO capacity in bytes.
pub const AUDIO_FIFO_SIZE: usize =
	AUDIO_FIFO_MS * (MAX_SAMPLE_RATE as usize / 1000) * MAX_CHANNELS as usize * std::mem::size_of::<i16>();
