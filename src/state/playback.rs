//! Playback state.

//---------------------------------------------------------------------------------------------------- use
use std::sync::atomic::{AtomicU8,Ordering};
use strum::{AsRefStr,Display,EnumCount,EnumIter,IntoStaticStr};

//---------------------------------------------------------------------------------------------------- PlaybackState
/// The mute/fade state of the audio output.
///
/// There are two stable states ([`Self::Muted`], [`Self::Playing`])
/// and two ramps between them, which last (at most) one fade window.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy,Clone,Default,Debug,PartialEq,Eq,Hash)]
#[derive(AsRefStr,Display,EnumCount,EnumIter,IntoStaticStr)]
pub enum PlaybackState {
	/// Audio is being output at the current volume.
	Playing,
	#[default]
	/// Silence is being output.
	Muted,
	/// Ramping down, ends in [`Self::Muted`].
	Muting,
	/// Ramping up, ends in [`Self::Playing`].
	Unmuting,
}

impl PlaybackState {
	/// The state every stream starts in.
	pub const DEFAULT: Self = Self::Muted;

	#[inline]
	#[must_use]
	/// Is this one of the two stable states?
	pub const fn is_stable(self) -> bool {
		matches!(self, Self::Playing | Self::Muted)
	}

	/// INVARIANT: Input [u8] must be `0..=3`
	pub(crate) const fn from_u8(u: u8) -> Self {
		match u {
			0 => Self::Playing,
			1 => Self::Muted,
			2 => Self::Muting,
			3 => Self::Unmuting,
			_ => unreachable!(),
		}
	}

	pub(crate) const fn to_u8(self) -> u8 {
		match self {
			Self::Playing  => 0,
			Self::Muted    => 1,
			Self::Muting   => 2,
			Self::Unmuting => 3,
		}
	}
}

//---------------------------------------------------------------------------------------------------- AtomicPlaybackState
/// [`PlaybackState`] published by the audio thread, read by anyone.
pub(crate) struct AtomicPlaybackState(AtomicU8);

impl AtomicPlaybackState {
	#[allow(clippy::declare_interior_mutable_const)]
	pub(crate) const DEFAULT: Self = Self(AtomicU8::new(PlaybackState::DEFAULT.to_u8()));

	#[inline]
	pub(crate) fn load(&self, ordering: Ordering) -> PlaybackState {
		PlaybackState::from_u8(self.0.load(ordering))
	}

	#[inline]
	pub(crate) fn store(&self, state: PlaybackState, ordering: Ordering) {
		self.0.store(state.to_u8(), ordering);
	}

	#[inline]
	pub(crate) fn set(&self, state: PlaybackState) {
		self.store(state, Ordering::Release);
	}

	#[inline]
	pub(crate) fn get(&self) -> PlaybackState {
		self.load(Ordering::Acquire)
	}
}

impl std::fmt::Debug for AtomicPlaybackState {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_tuple("AtomicPlaybackState")
			.field(&self.load(Ordering::Relaxed))
			.finish()
	}
}

//---------------------------------------------------------------------------------------------------- TESTS
#[cfg(test)]
#[allow(clippy::borrow_interior_mutable_const)]
mod tests {
	use super::*;
	use strum::IntoEnumIterator;

	#[test]
	fn u8_round_trip() {
		for state in PlaybackState::iter() {
			assert_eq!(PlaybackState::from_u8(state.to_u8()), state);
		}
		assert_eq!(PlaybackState::COUNT, 4);
	}

	#[test]
	fn atomic() {
		let atomic = AtomicPlaybackState::DEFAULT;
		assert_eq!(atomic.get(), PlaybackState::Muted);
		atomic.set(PlaybackState::Unmuting);
		assert_eq!(atomic.get(), PlaybackState::Unmuting);
	}

	#[test]
	fn names() {
		assert_eq!(PlaybackState::Muting.as_ref(), "Muting");
		assert_eq!(PlaybackState::Playing.to_string(), "Playing");
		assert!(!PlaybackState::Unmuting.is_stable());
	}
}
