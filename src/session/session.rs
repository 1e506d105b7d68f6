//! Double-buffered FIFOs between a decoder and the [`Engine`].
//!
//! When the decoded format changes (e.g. a DAB+ service switch from
//! 48kHz stereo to 32kHz mono), the producer continues into the _other_
//! FIFO, reset and tagged with the new format. The engine keeps draining
//! the old FIFO until its ramp down completes, then reopens on the new one.
//! Audio of two formats never shares a FIFO.
//!
//! A FIFO is only reset while the producer holds the last reference to it.
//! If the engine still has the other FIFO (two format changes in quick
//! succession), a fresh one takes its place.

//---------------------------------------------------------------------------------------------------- Use
use std::sync::Arc;
use crossbeam::channel::{Sender,Receiver};
use crate::{
	config::Config,
	engine::Engine,
	event::Event,
	fifo::{AudioFifo,FifoStats,StreamFormat,WriteOutcome},
	macros::{debug2,error2,info2},
};

//---------------------------------------------------------------------------------------------------- AudioProducer
/// The decoder's end of a [`Session`].
///
/// Lives on the decoder thread.
#[derive(Debug)]
pub struct AudioProducer {
	fifos: [Arc<AudioFifo>; 2],
	/// Index of the FIFO being written.
	active: usize,
	/// Format of the active FIFO, `None` before the first push.
	format: Option<StreamFormat>,
	/// Tell the session to (re)start onto a FIFO.
	to_session: Sender<Arc<AudioFifo>>,
}

impl AudioProducer {
	/// Write decoded interleaved `samples` in `format`.
	///
	/// A `format` different from the previous push switches FIFOs.
	///
	/// Blocks or drops according to [`Config::write_policy`].
	pub fn push(&mut self, samples: &[i16], format: StreamFormat) -> WriteOutcome {
		if self.format != Some(format) {
			self.switch(format);
		}
		self.fifos[self.active].write_samples(samples)
	}

	#[must_use]
	/// The format of the last push.
	pub const fn format(&self) -> Option<StreamFormat> {
		self.format
	}

	#[must_use]
	/// Statistics of the FIFO currently being written.
	pub fn stats(&self) -> FifoStats {
		self.fifos[self.active].stats()
	}

	fn switch(&mut self, format: StreamFormat) {
		if self.format.is_some() {
			self.active ^= 1;

			let other = &self.fifos[self.active];
			if Arc::strong_count(other) > 1 {
				debug2!("AudioProducer - fifo {} still in use, allocating", self.active);
				self.fifos[self.active] = Arc::new(AudioFifo::with_capacity(other.capacity(), other.policy()));
			}
		}

		let fifo = &self.fifos[self.active];
		fifo.reset();
		fifo.set_format(format);
		info2!("AudioProducer - format: {:?} -> {format}, fifo: {}", self.format, self.active);
		self.format = Some(format);

		// The session may be gone, keep decoding into the void.
		drop(self.to_session.send(Arc::clone(fifo)));
	}
}

//---------------------------------------------------------------------------------------------------- Session
/// Owns the [`Engine`] and follows its [`AudioProducer`]'s format changes.
///
/// [`Session::poll`] must be called regularly from the control thread.
#[derive(Debug)]
pub struct Session {
	engine: Engine,
	from_producer: Receiver<Arc<AudioFifo>>,
}

impl Session {
	#[cold]
	#[inline(never)]
	#[must_use]
	/// Create a session and the producer that feeds it.
	///
	/// Both FIFOs use [`Config::fifo_capacity`] and [`Config::write_policy`].
	pub fn new(config: Config) -> (Self, AudioProducer) {
		let fifos = [(); 2].map(|()| Arc::new(AudioFifo::with_capacity(config.fifo_capacity, config.write_policy)));
		let (to_session, from_producer) = crossbeam::channel::unbounded();

		let producer = AudioProducer {
			fifos,
			active: 0,
			format: None,
			to_session,
		};
		let this = Self {
			engine: Engine::new(config),
			from_producer,
		};

		(this, producer)
	}

	#[must_use]
	/// The engine, for volume, mute, devices and state.
	pub const fn engine(&self) -> &Engine {
		&self.engine
	}

	/// The engine, mutably.
	pub fn engine_mut(&mut self) -> &mut Engine {
		&mut self.engine
	}

	#[must_use]
	/// See [`Engine::events`].
	pub fn events(&self) -> Receiver<Event> {
		self.engine.events()
	}

	/// Follow format changes, then process stream notices.
	pub fn poll(&mut self) {
		while let Ok(fifo) = self.from_producer.try_recv() {
			if let Err(e) = self.engine.restart(fifo) {
				error2!("Session - could not start: {e}");
				self.engine.emit(Event::Error(e));
			}
		}
		self.engine.poll();
	}

	/// See [`Engine::stop`].
	///
	/// The next format change from the producer starts it again.
	pub fn stop(&mut self) {
		self.engine.stop();
	}
}
