//! Engine configuration.

//---------------------------------------------------------------------------------------------------- use
use crate::{
	config::{DEFAULT_EVENT_CAPACITY,DEFAULT_UNMUTE_THRESHOLD_MS},
	fifo::{AUDIO_FIFO_SIZE,WritePolicy},
	signal::Volume,
};

#[allow(unused_imports)] // docs
use crate::{Engine,Session,fifo::AudioFifo};

//---------------------------------------------------------------------------------------------------- Config
/// Configuration for the [`Engine`] (and the FIFOs of a [`Session`]).
///
/// Fade length and fade floor are fixed, not configurable.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone,Debug,PartialEq)]
pub struct Config {
	//------------------------------------------ Output
	/// [`OutputDevice::id`](crate::OutputDevice::id) of the device to open.
	///
	/// `None` (or an id that doesn't exist) is the system default.
	pub device: Option<String>,

	/// Initial output volume.
	pub volume: Volume,

	/// Frames rendered per callback.
	///
	/// Every mute/unmute ramp completes inside one callback, so this is
	/// never less than one fade (`60ms` of the stream's sample rate),
	/// which is also what `None` picks.
	pub frames_per_buffer: Option<u32>,

	/// Should the [`Engine`] reopen the default device
	/// when the current one disappears or errors?
	///
	/// If `false`, the error is reported and the engine stops.
	pub recover_device: bool,

	//------------------------------------------ Render
	/// How much audio (in milliseconds) must be buffered
	/// before a muted stream starts playing.
	///
	/// Never less than one callback buffer.
	pub unmute_threshold_ms: usize,

	//------------------------------------------ FIFO
	/// Capacity of each [`AudioFifo`] created by a [`Session`], in bytes.
	pub fifo_capacity: usize,

	/// What a [`Session`]'s producer does when its FIFO is full.
	pub write_policy: WritePolicy,

	//------------------------------------------ Events
	/// How many [`Event`](crate::Event)s may be queued before
	/// new ones are dropped.
	pub event_capacity: usize,
}

//---------------------------------------------------------------------------------------------------- Config Impl
impl Config {
	/// A reasonable default [`Config`].
	///
	/// ```rust
	/// # use dabsink::*;
	/// # use dabsink::fifo::*;
	/// # use std::time::Duration;
	/// assert_eq!(Config::DEFAULT, Config {
	///     device:              None,
	///     volume:              Volume::MAX,
	///     frames_per_buffer:   None,
	///     recover_device:      true,
	///     unmute_threshold_ms: 360,
	///     fifo_capacity:       AUDIO_FIFO_SIZE,
	///     write_policy:        WritePolicy::Block(Duration::from_secs(1)),
	///     event_capacity:      64,
	/// });
	/// ```
	pub const DEFAULT: Self = Self {
		device:              None,
		volume:              Volume::MAX,
		frames_per_buffer:   None,
		recover_device:      true,
		unmute_threshold_ms: DEFAULT_UNMUTE_THRESHOLD_MS,
		fifo_capacity:       AUDIO_FIFO_SIZE,
		write_policy:        WritePolicy::DEFAULT,
		event_capacity:      DEFAULT_EVENT_CAPACITY,
	};
}

impl Default for Config {
	fn default() -> Self {
		Self::DEFAULT
	}
}
