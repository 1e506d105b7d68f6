//! These are helper functions used for testing throughout the codebase.

//---------------------------------------------------------------------------------------------------- Use
use crossbeam::channel::Receiver;
use crate::event::Event;

//---------------------------------------------------------------------------------------------------- PCM
/// Native-endian bytes of interleaved `samples`, what the FIFO stores.
pub(crate) fn pcm_bytes(samples: &[i16]) -> Vec<u8> {
	bytemuck::cast_slice(samples).to_vec()
}

/// `len` bytes counting up (and wrapping), for ordering checks.
pub(crate) fn ramp_bytes(len: usize) -> Vec<u8> {
	#[allow(clippy::cast_possible_truncation)]
	(0..len).map(|i| i as u8).collect()
}

/// `frame` repeated `frames` times.
pub(crate) fn frames_of(frame: &[i16], frames: usize) -> Vec<i16> {
	frame.repeat(frames)
}

//---------------------------------------------------------------------------------------------------- Events
/// Every event queued right now.
pub(crate) fn drain_events(events: &Receiver<Event>) -> Vec<Event> {
	events.try_iter().collect()
}

/// Does `seen` contain `want`, in order (not necessarily adjacent)?
pub(crate) fn is_subsequence(want: &[Event], seen: &[Event]) -> bool {
	let mut seen = seen.iter();
	want.iter().all(|w| seen.any(|s| s == w))
}

//---------------------------------------------------------------------------------------------------- Tests
#[test]
fn subsequence() {
	use crate::state::PlaybackState;
	let a = Event::Stopped;
	let b = Event::StateChanged(PlaybackState::Muted);
	let c = Event::StateChanged(PlaybackState::Playing);

	assert!(is_subsequence(&[a.clone(), c.clone()], &[a.clone(), b.clone(), c.clone()]));
	assert!(!is_subsequence(&[c.clone(), a.clone()], &[a, b, c]));
}
