//! Audio output errors.

//----------------------------------------------------------------------------------------------- OutputError
/// Error that occurs when opening, starting or
/// running an audio output stream.
///
/// This can be due to many reasons, e.g:
/// - Audio device was unplugged
/// - Audio server disconnected/killed
/// - Stream format is not supported by the audio hardware/server
///
/// Buffer overflow and underrun are _not_ errors,
/// they are handled inside the FIFO and the render state machine.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum OutputError {
	#[error("audio stream was closed")]
	/// The audio stream was closed.
	StreamClosed,

	#[error("audio hardware/server is unavailable")]
	/// The audio hardware/server is unavailable.
	DeviceUnavailable,

	#[error("audio format is invalid or unsupported")]
	/// The audio format is invalid or unsupported.
	InvalidFormat,

	#[error("audio stream specification contains an invalid/unsupported channel count")]
	/// The stream's channel count is `0` or not supported.
	InvalidChannels,

	#[error("audio sample rate is invalid")]
	/// The stream's sample rate was invalid.
	///
	/// This means a sample rate that is `0` or
	/// lower than `1kHz` (the fade arithmetic works
	/// in whole milliseconds of audio).
	InvalidSampleRate,

	#[error("audio specification is invalid")]
	/// Something other than the channel count or
	/// sample rate was invalid, e.g, a `0` frames-per-buffer.
	InvalidSpec,

	#[error("unknown error: {0}")]
	/// An unknown or very specific error occurred.
	///
	/// The `str` will contain more information.
	Unknown(std::borrow::Cow<'static, str>),
}
