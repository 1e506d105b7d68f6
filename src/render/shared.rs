//! State shared between the control thread and the audio thread.

//---------------------------------------------------------------------------------------------------- use
use crate::{
	signal::{AtomicRequest,AtomicVolume,Volume},
	state::AtomicPlaybackState,
};

//---------------------------------------------------------------------------------------------------- Shared
/// Everything the audio thread observes once per callback,
/// and the one thing it publishes back (the playback state).
///
/// All fields are lock-free, the audio thread never waits on them.
#[derive(Debug)]
pub(crate) struct Shared {
	/// Pending mute/stop/restart requests.
	pub(crate) request: AtomicRequest,
	/// Linear output volume.
	pub(crate) volume: AtomicVolume,
	/// Written only by the audio thread.
	pub(crate) state: AtomicPlaybackState,
}

impl Shared {
	#[cold]
	#[inline(never)]
	pub(crate) fn new(volume: Volume) -> Self {
		Self {
			request: AtomicRequest::default(),
			volume: AtomicVolume::new(volume),
			state: AtomicPlaybackState::DEFAULT,
		}
	}
}
