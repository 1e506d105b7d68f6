//! Audio hardware output.
//!
//! The trait `AudioOutput` is what the engine needs from
//! an audio backend: open a stream on a device that pulls
//! from an [`AudioSink`], play/pause it, list devices.
//!
//! The stream is torn down by dropping it.

//----------------------------------------------------------------------------------------------- use
use crate::{
	error::OutputError,
	fifo::StreamFormat,
	output::{AudioSink,Notifier,OutputDevice},
	macros::debug2,
};

//----------------------------------------------------------------------------------------------- AudioOutput Trait
/// # Safety Notes
/// Implementors are expected to implement these functions
/// correctly according to the documentation invariants.
pub(crate) trait AudioOutput: Sized {
	/// Open a stream on `device` (`None` is the system default)
	/// that renders audio from `sink`.
	///
	/// The sink's format must be followed as closely as the device
	/// allows, any substitution (sample format, channel count, sample
	/// rate) must be converted in the audio thread.
	///
	/// The sink is always rendered in chunks of exactly
	/// `frames_per_buffer` frames, whatever the device asks for.
	///
	/// Everything that happens to the stream later on (the sink
	/// completing, backend errors) is reported through `notifier`.
	///
	/// The stream starts paused.
	fn try_open<S: AudioSink>(
		sink: S,
		device: Option<&str>,
		frames_per_buffer: u32,
		notifier: Notifier,
	) -> Result<Self, OutputError>;

	/// Start playback.
	///
	/// The sink will start being rendered.
	fn play(&mut self) -> Result<(), OutputError>;

	/// Pause playback.
	///
	/// The sink will not be rendered until [`Self::play`],
	/// it keeps all its state.
	fn pause(&mut self) -> Result<(), OutputError>;

	/// Is the stream currently in play mode?
	fn is_playing(&self) -> bool;

	/// The format of the sink this stream was opened for.
	fn format(&self) -> StreamFormat;

	/// The [`OutputDevice::id`] of the device this stream was opened on.
	fn device(&self) -> &str;

	/// All output devices, default first, no duplicates.
	fn devices() -> Result<Vec<OutputDevice>, OutputError>;

	/// The default device, if there is one.
	fn default_device() -> Result<Option<OutputDevice>, OutputError> {
		debug2!("AudioOutput - default_device()");
		Ok(Self::devices()?.into_iter().find(|d| d.is_default))
	}
}
