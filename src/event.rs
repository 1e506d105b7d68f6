//! Events delivered to the UI.

//---------------------------------------------------------------------------------------------------- use
use crate::{
	error::OutputError,
	fifo::StreamFormat,
	output::OutputDevice,
	state::PlaybackState,
};

//---------------------------------------------------------------------------------------------------- Event
/// Something the UI may want to react to.
///
/// Received from [`Engine::events()`](crate::Engine::events).
///
/// The channel is bounded, if the UI stops receiving,
/// events are dropped rather than stalling audio.
#[derive(Clone,Debug,PartialEq,Eq)]
pub enum Event {
	/// The audio thread changed [`PlaybackState`].
	///
	/// A ramp is always reported as a pair, e.g.
	/// [`PlaybackState::Muting`] followed by [`PlaybackState::Muted`].
	StateChanged(PlaybackState),

	/// A stop request completed and the stream was torn down.
	Stopped,

	/// The stream was reopened for a new format.
	Restarted(StreamFormat),

	/// The stream failed and could not be recovered.
	Error(OutputError),

	/// The output device list changed.
	Devices(Vec<OutputDevice>),

	/// The selected output device changed,
	/// the [`OutputDevice::id`] of the new device.
	DeviceChanged(String),
}
