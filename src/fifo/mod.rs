//! PCM ring buffer between the audio decoder and the audio output.

mod constants;
pub use constants::{
	AUDIO_FIFO_CHUNK_MS,
	AUDIO_FIFO_MS,
	AUDIO_FIFO_SIZE,
	MAX_CHANNELS,
	MAX_SAMPLE_RATE,
};

mod format;
pub use format::StreamFormat;

mod fifo;
pub use fifo::{AudioFifo,FifoStats,WriteOutcome,WritePolicy};
