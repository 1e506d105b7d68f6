//! The [`Engine`] struct and its initialization.

//---------------------------------------------------------------------------------------------------- Use
use std::sync::Arc;
use crossbeam::channel::{Sender,Receiver};
use crate::{
	config::Config,
	event::Event,
	fifo::AudioFifo,
	macros::info2,
	output::{AudioOutputStruct,Notice,AUDIO_OUTPUT_BACKEND},
	render::Shared,
};

//---------------------------------------------------------------------------------------------------- Constants
/// Stream notices are rare (one per stream teardown or failure).
const NOTICE_CAPACITY: usize = 16;

//---------------------------------------------------------------------------------------------------- Engine
/// The audio output engine.
///
/// Owns (at most) one output stream, which drains one [`AudioFifo`]
/// through the mute/fade state machine on the audio thread.
///
/// All methods are called from one control thread, usually the UI's.
/// Things the audio side needs the control thread for (a stream finishing,
/// a device failing) are queued and processed by [`Engine::poll`] or
/// [`Engine::wait`], results are reported as [`Event`]s.
///
/// Dropping the `Engine` tears down the stream immediately.
pub struct Engine {
	pub(super) config: Config,
	/// Shared with the current stream's renderer.
	pub(super) shared: Arc<Shared>,

	/// The current stream, `None` when stopped.
	pub(super) output: Option<AudioOutputStruct>,
	/// Number of the current stream, for telling stale notices apart.
	pub(super) stream: u64,
	/// The FIFO the current (or last) stream drains.
	pub(super) fifo: Option<Arc<AudioFifo>>,
	/// The FIFO to reopen onto once a restart completes.
	pub(super) pending: Option<Arc<AudioFifo>>,
	/// Selected device, `None` is the system default.
	pub(super) device: Option<String>,

	/// Streams -> Engine.
	pub(super) to_engine: Sender<Notice>,
	pub(super) from_output: Receiver<Notice>,
	/// Engine/streams -> UI.
	pub(super) to_ui: Sender<Event>,
	pub(super) events: Receiver<Event>,
}

//---------------------------------------------------------------------------------------------------- Engine Impl
impl Engine {
	#[cold]
	#[inline(never)]
	#[must_use]
	/// Create an `Engine`, no stream is opened until [`Engine::start`].
	pub fn new(config: Config) -> Self {
		info2!("Engine - new(), backend: {AUDIO_OUTPUT_BACKEND}, config: {config:?}");

		let (to_engine, from_output) = crossbeam::channel::bounded(NOTICE_CAPACITY);
		let (to_ui, events) = crossbeam::channel::bounded(std::cmp::max(config.event_capacity, 1));

		Self {
			shared: Arc::new(Shared::new(config.volume.fix())),
			output: None,
			stream: 0,
			fifo: None,
			pending: None,
			device: config.device.clone(),
			to_engine,
			from_output,
			to_ui,
			events,
			config,
		}
	}
}

impl Default for Engine {
	fn default() -> Self {
		Self::new(Config::DEFAULT)
	}
}

impl std::fmt::Debug for Engine {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Engine")
			.field("config", &self.config)
			.field("shared", &self.shared)
			.field("running", &self.output.is_some())
			.field("stream", &self.stream)
			.field("fifo", &self.fifo)
			.field("device", &self.device)
			.finish_non_exhaustive()
	}
}
