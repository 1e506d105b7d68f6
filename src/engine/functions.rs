//! The public control API of the [`Engine`].

//---------------------------------------------------------------------------------------------------- Use
use std::{sync::Arc,time::Duration};
use crossbeam::channel::{Receiver,RecvTimeoutError};
use crate::{
	engine::Engine,
	error::OutputError,
	event::Event,
	fifo::{AudioFifo,StreamFormat},
	macros::{debug2,info2,warn2},
	output::{AudioOutput,AudioOutputStruct,OutputDevice},
	signal::{Request,Volume},
	state::PlaybackState,
};

//---------------------------------------------------------------------------------------------------- Engine Impl
impl Engine {
	//---------------------------------------------------------------------------------------------------- Events
	#[must_use]
	/// A receiver of this engine's [`Event`]s.
	///
	/// All receivers share the same queue,
	/// each event is received once.
	pub fn events(&self) -> Receiver<Event> {
		self.events.clone()
	}

	/// Process all queued stream notices, without blocking.
	///
	/// Returns how many were processed.
	pub fn poll(&mut self) -> usize {
		let mut processed = 0;
		while let Ok(notice) = self.from_output.try_recv() {
			self.handle(notice);
			processed += 1;
		}
		processed
	}

	/// Wait up to `timeout` for a stream notice and process it.
	///
	/// Returns `false` on timeout.
	pub fn wait(&mut self, timeout: Duration) -> bool {
		match self.from_output.recv_timeout(timeout) {
			Ok(notice) => {
				self.handle(notice);
				true
			},
			Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => false,
		}
	}

	//---------------------------------------------------------------------------------------------------- Stream
	/// Start draining `fifo` in its current [`StreamFormat`].
	///
	/// Any current stream is torn down immediately, without a ramp.
	/// The new stream starts [`PlaybackState::Muted`] and unmutes
	/// once enough audio is buffered.
	///
	/// A pending [`Engine::stop`] or [`Engine::restart`] is cancelled,
	/// a [`Engine::mute`] is kept.
	///
	/// # Errors
	/// The format is invalid, or no stream could be opened,
	/// the engine is left stopped.
	pub fn start(&mut self, fifo: Arc<AudioFifo>) -> Result<(), OutputError> {
		info2!("Engine - start(), format: {}", fifo.format());

		self.close();
		self.pending = None;
		self.shared.request.remove(Request::STOP | Request::RESTART);
		self.open(fifo)
	}

	/// Switch to draining `fifo`, which is probably in a new format.
	///
	/// The current stream ramps down, and once muted is reopened for
	/// `fifo`. [`Event::Restarted`] is sent when that happened.
	///
	/// Without a current stream, this is [`Engine::start`].
	///
	/// # Errors
	/// Only when falling back to [`Engine::start`].
	pub fn restart(&mut self, fifo: Arc<AudioFifo>) -> Result<(), OutputError> {
		if self.output.is_none() {
			return self.start(fifo);
		}

		info2!("Engine - restart(), format: {}", fifo.format());
		self.pending = Some(fifo);
		self.shared.request.insert(Request::RESTART);
		Ok(())
	}

	/// Ramp down and tear down the stream.
	///
	/// [`Event::Stopped`] is sent when that happened.
	///
	/// This does nothing without a current stream.
	pub fn stop(&mut self) {
		if self.output.is_none() {
			return;
		}

		info2!("Engine - stop()");
		self.pending = None;
		self.shared.request.insert(Request::STOP);
	}

	#[must_use]
	/// Is there a stream? (playing, muted or finishing)
	pub const fn is_running(&self) -> bool {
		self.output.is_some()
	}

	#[must_use]
	/// The format of the current stream.
	pub fn format(&self) -> Option<StreamFormat> {
		self.output.as_ref().map(AudioOutput::format)
	}

	#[must_use]
	/// The current [`PlaybackState`].
	pub fn state(&self) -> PlaybackState {
		self.shared.state.get()
	}

	//---------------------------------------------------------------------------------------------------- Mute/Volume
	/// Mute (ramp down and stay muted) or unmute.
	///
	/// This survives restarts.
	pub fn mute(&self, mute: bool) {
		debug2!("Engine - mute({mute})");
		if mute {
			self.shared.request.insert(Request::MUTE);
		} else {
			self.shared.request.remove(Request::MUTE);
		}
	}

	#[must_use]
	/// Was [`Engine::mute`] requested?
	pub fn is_muted(&self) -> bool {
		self.shared.request.get().contains(Request::MUTE)
	}

	/// Set the volume from a `0..=100` UI slider.
	///
	/// See [`Volume::from_ui`].
	pub fn set_volume(&self, volume: u8) {
		self.set_linear_volume(Volume::from_ui(volume));
	}

	/// Set the linear volume, applied from the next callback on.
	pub fn set_linear_volume(&self, volume: Volume) {
		let volume = volume.fix();
		debug2!("Engine - set_linear_volume({volume})");
		self.shared.volume.set(volume);
	}

	#[must_use]
	/// The current linear volume.
	pub fn volume(&self) -> Volume {
		self.shared.volume.get()
	}

	//---------------------------------------------------------------------------------------------------- Devices
	/// All output devices, default first.
	///
	/// # Errors
	/// The backend could not list devices.
	pub fn devices(&self) -> Result<Vec<OutputDevice>, OutputError> {
		AudioOutputStruct::devices()
	}

	#[must_use]
	/// The selected device's id, `None` is the system default.
	pub fn device(&self) -> Option<&str> {
		self.device.as_deref()
	}

	/// Select the output device `id`.
	///
	/// An unknown `id` selects the default device.
	/// [`Event::DeviceChanged`] is sent with the resolved device,
	/// a running stream is restarted onto it.
	///
	/// # Errors
	/// The backend could not list devices, or there are none.
	pub fn set_device(&mut self, id: &str) -> Result<(), OutputError> {
		let devices = self.devices()?;

		let device = match devices.iter().find(|d| d.id == id) {
			Some(d) => d,
			None => {
				warn2!("Engine - unknown device: {id}, using default");
				devices
					.iter()
					.find(|d| d.is_default)
					.or_else(|| devices.first())
					.ok_or(OutputError::DeviceUnavailable)?
			},
		};
		let selected = (device.id == id).then(|| device.id.clone());
		info2!("Engine - set_device({id}), using: {}", device.id);

		self.emit(Event::DeviceChanged(device.id.clone()));
		if selected == self.device {
			return Ok(());
		}
		self.device = selected;
		self.reopen();
		Ok(())
	}

	/// Re-list devices and send [`Event::Devices`].
	///
	/// If the selected device is gone, the default device is
	/// selected and a running stream is restarted onto it.
	///
	/// # Errors
	/// The backend could not list devices.
	pub fn refresh_devices(&mut self) -> Result<Vec<OutputDevice>, OutputError> {
		let devices = self.devices()?;
		self.emit(Event::Devices(devices.clone()));

		if let Some(id) = &self.device {
			if !devices.iter().any(|d| &d.id == id) {
				warn2!("Engine - device {id} disappeared, using default");
				self.device = None;
				if let Some(default) = devices.iter().find(|d| d.is_default) {
					self.emit(Event::DeviceChanged(default.id.clone()));
				}
				self.reopen();
			}
		}

		Ok(devices)
	}

	/// Restart a running stream onto the same FIFO (and a new device).
	fn reopen(&mut self) {
		if self.output.is_none() {
			return;
		}
		if let Some(fifo) = self.pending.clone().or_else(|| self.fifo.clone()) {
			self.pending = Some(fifo);
			self.shared.request.insert(Request::RESTART);
		}
	}
}
