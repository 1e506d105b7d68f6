//! Opening, closing and supervising the output stream.
//!
//! Everything here runs on the control thread.

//---------------------------------------------------------------------------------------------------- Use
use std::sync::Arc;
use crate::{
	engine::Engine,
	error::OutputError,
	event::Event,
	fifo::{AudioFifo,StreamFormat},
	macros::{debug2,error2,info2,trace2,try_send_or_drop,warn2},
	output::{AudioOutput,AudioOutputStruct,Notice,NoticeKind,Notifier},
	render::{Renderer,fade::FADE_TIME_MS},
	signal::Request,
};

//---------------------------------------------------------------------------------------------------- Engine Impl
impl Engine {
	/// Callback buffer length for `format`, at least one fade.
	pub(super) fn frames_per_buffer(&self, format: StreamFormat) -> u32 {
		let fade = u32::try_from(format.frames_for_ms(FADE_TIME_MS)).unwrap_or(u32::MAX);
		self.config.frames_per_buffer.map_or(fade, |frames| frames.max(fade))
	}

	/// Open and play a new stream draining `fifo`.
	///
	/// Any previous stream must already be closed.
	pub(super) fn open(&mut self, fifo: Arc<AudioFifo>) -> Result<(), OutputError> {
		debug_assert!(self.output.is_none());

		let format = fifo.format();
		self.fifo = Some(Arc::clone(&fifo));

		let renderer = Renderer::new(
			fifo,
			Arc::clone(&self.shared),
			self.to_ui.clone(),
			self.config.unmute_threshold_ms,
		)?;

		self.stream = self.stream.wrapping_add(1);
		let notifier = Notifier::new(self.stream, self.to_engine.clone());
		let frames = self.frames_per_buffer(format);

		let mut output = AudioOutputStruct::try_open(renderer, self.device.as_deref(), frames, notifier)?;
		output.play()?;
		info2!("Engine - stream {} open, format: {format}, device: {}, frames_per_buffer: {frames}", self.stream, output.device());

		self.output = Some(output);
		Ok(())
	}

	/// Tear down the current stream, if any.
	pub(super) fn close(&mut self) {
		if let Some(mut output) = self.output.take() {
			debug2!("Engine - closing stream {}", self.stream);
			if let Err(e) = output.pause() {
				debug2!("Engine - pause before close failed: {e}");
			}
		}
	}

	/// Report `event` to the UI.
	pub(crate) fn emit(&self, event: Event) {
		trace2!("Engine - event: {event:?}");
		try_send_or_drop!(self.to_ui, event);
	}

	/// The id of the device streams open on.
	pub(super) fn device_id(&self) -> String {
		if let Some(id) = &self.device {
			return id.clone();
		}

		match AudioOutputStruct::default_device() {
			Ok(Some(device)) => device.id,
			_ => String::new(),
		}
	}

	//---------------------------------------------------------------------------------------------------- Notices
	/// Handle one notice from a stream.
	pub(super) fn handle(&mut self, notice: Notice) {
		if notice.stream != self.stream || self.output.is_none() {
			trace2!("Engine - ignoring stale notice: {notice:?}, current stream: {}", self.stream);
			return;
		}

		match notice.kind {
			NoticeKind::Finished => self.finished(),
			NoticeKind::Error(error) => self.failed(error),
		}
	}

	/// The renderer completed, find out why.
	fn finished(&mut self) {
		let request = self.shared.request.get();
		debug2!("Engine - stream {} finished, request: {request:?}", self.stream);
		self.close();

		if request.contains(Request::STOP) {
			self.stopped();
			return;
		}

		if request.contains(Request::RESTART) {
			if let Some(fifo) = self.pending.take() {
				let format = fifo.format();
				match self.start(fifo) {
					Ok(()) => {
						info2!("Engine - restarted, format: {format}");
						self.emit(Event::Restarted(format));
					},
					Err(e) => {
						error2!("Engine - restart failed: {e}");
						self.emit(Event::Error(e));
					},
				}
				return;
			}
		}

		warn2!("Engine - stream finished unexpectedly");
		self.recover(OutputError::StreamClosed);
	}

	/// The backend reported an error.
	fn failed(&mut self, error: OutputError) {
		error2!("Engine - stream {} error: {error}", self.stream);

		if self.shared.request.get().contains(Request::STOP) {
			self.close();
			self.stopped();
		} else if self.config.recover_device {
			self.recover(error);
		} else {
			self.close();
			self.pending = None;
			self.emit(Event::Error(error));
		}
	}

	/// A stop completed.
	fn stopped(&mut self) {
		self.shared.request.remove(Request::STOP | Request::RESTART);
		self.pending = None;
		info2!("Engine - stopped");
		self.emit(Event::Stopped);
	}

	/// Reopen on the default device.
	///
	/// A pending restart's FIFO is the one being written,
	/// it takes the place of the last one.
	fn recover(&mut self, error: OutputError) {
		self.close();
		self.shared.request.remove(Request::STOP | Request::RESTART);

		let pending = self.pending.take();
		let restarted = pending.is_some();
		let Some(fifo) = pending.or_else(|| self.fifo.clone()) else {
			self.emit(Event::Error(error));
			return;
		};

		warn2!("Engine - recovering from: {error}, reopening on the default device");
		if self.device.take().is_some() {
			self.emit(Event::DeviceChanged(self.device_id()));
		}

		let format = fifo.format();
		match self.open(fifo) {
			Ok(()) if restarted => {
				info2!("Engine - restarted during recovery, format: {format}");
				self.emit(Event::Restarted(format));
			},
			Ok(()) => (),
			Err(e) => {
				error2!("Engine - recovery failed: {e}");
				self.emit(Event::Error(e));
			},
		}
	}
}
