//! Dummy audio hardware output.
//!
//! This file implements the abstract `AudioOutput`
//! trait using a fake dummy backend.
//!
//! Audio is pulled from the sink by a thread that
//! doesn't actually connect to anything, one buffer
//! per buffer-length of real time, exactly like a
//! device would pull it.
//!
//! Functionally, it should behave the exact same
//! as other backends, except it doesn't actually
//! play any audio.
//!
//! This is used for testing purposes.

//----------------------------------------------------------------------------------------------- use
use crate::{
	error::OutputError,
	fifo::StreamFormat,
	output::{AudioOutput,AudioSink,Notifier,OutputDevice,Rendered,sort_devices},
	macros::{debug2,trace2,warn2},
};
use crossbeam::channel::{Sender,Receiver,RecvTimeoutError};
use std::{
	borrow::Cow,
	io::Read,
	thread::JoinHandle,
	time::Duration,
};

//----------------------------------------------------------------------------------------------- Constants
/// The one device this backend has.
pub(crate) const DUMMY_DEVICE_ID: &str = "dummy";

//----------------------------------------------------------------------------------------------- SinkReader
/// Pull-mode adapter: reading bytes from this renders the sink.
///
/// Returns `Ok(0)` (EOF) once the sink has completed.
pub(crate) struct SinkReader<S> {
	sink: S,
	channels: usize,
	scratch: Vec<i16>,
	complete: bool,
}

impl<S: AudioSink> SinkReader<S> {
	pub(crate) fn new(sink: S) -> Self {
		let channels = usize::from(sink.format().channels);
		Self {
			sink,
			channels,
			scratch: Vec::new(),
			complete: false,
		}
	}
}

impl<S: AudioSink> std::io::Read for SinkReader<S> {
	fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
		if self.complete {
			return Ok(0);
		}

		let bytes_per_frame = self.channels * std::mem::size_of::<i16>();
		let frames = buf.len() / bytes_per_frame;
		if frames == 0 {
			return Err(std::io::Error::new(
				std::io::ErrorKind::InvalidInput,
				"buffer is shorter than one frame",
			));
		}

		// Only allocates if `buf` grew.
		self.scratch.resize(frames * self.channels, 0);
		if self.sink.render(&mut self.scratch) == Rendered::Complete {
			self.complete = true;
		}

		let bytes: &[u8] = bytemuck::cast_slice(&self.scratch);
		buf[..bytes.len()].copy_from_slice(bytes);
		Ok(bytes.len())
	}
}

//----------------------------------------------------------------------------------------------- DummyAudioOutput
/// Messages to the dummy audio thread.
enum Control {
	Play,
	Pause,
	Shutdown,
}

/// A stream that "plays" into nothing.
pub(crate) struct DummyAudioOutput {
	/// Tell the audio thread to play/pause/exit.
	control: Sender<Control>,
	/// The audio thread, joined on drop.
	thread: Option<JoinHandle<()>>,
	/// Format the stream was opened with.
	format: StreamFormat,
	/// Are we currently playing?
	playing: bool,
}

impl DummyAudioOutput {
	/// The fake audio thread.
	fn run<S: AudioSink>(
		sink: S,
		frames_per_buffer: u32,
		period: Duration,
		control: &Receiver<Control>,
		notifier: &Notifier,
	) {
		let format = sink.format();
		let mut reader = SinkReader::new(sink);
		let mut buf = vec![0_u8; frames_per_buffer as usize * format.bytes_per_frame()];

		let handle = match audio_thread_priority::promote_current_thread_to_real_time(
			frames_per_buffer,
			format.sample_rate,
		) {
			Ok(handle) => Some(handle),
			Err(e) => {
				warn2!("AudioOutput - dummy thread was not promoted to real-time: {e}");
				None
			},
		};

		let mut playing = false;
		loop {
			let msg = if playing {
				match control.recv_timeout(period) {
					Ok(msg) => Some(msg),
					Err(RecvTimeoutError::Timeout) => None,
					Err(RecvTimeoutError::Disconnected) => break,
				}
			} else {
				// Hang until we're "playing".
				match control.recv() {
					Ok(msg) => Some(msg),
					Err(_) => break,
				}
			};

			match msg {
				Some(Control::Play) => playing = true,
				Some(Control::Pause) => playing = false,
				Some(Control::Shutdown) => break,
				// One buffer-length of time passed, pull one buffer.
				None => match reader.read(&mut buf) {
					Ok(0) => {
						trace2!("AudioOutput - dummy sink complete");
						notifier.finished();
						playing = false;
					},
					Ok(n) => trace2!("AudioOutput - dummy read {n} bytes"),
					Err(e) => {
						notifier.error(OutputError::Unknown(Cow::Owned(e.to_string())));
						playing = false;
					},
				},
			}
		}

		if let Some(handle) = handle {
			if let Err(e) = audio_thread_priority::demote_current_thread_from_real_time(handle) {
				warn2!("AudioOutput - dummy thread demotion failed: {e}");
			}
		}
		debug2!("AudioOutput - dummy thread exit");
	}
}

//----------------------------------------------------------------------------------------------- `AudioOutput` Impl
impl AudioOutput for DummyAudioOutput {
	#[cold]
	#[inline(never)]
	fn try_open<S: AudioSink>(
		sink: S,
		device: Option<&str>,
		frames_per_buffer: u32,
		notifier: Notifier,
	) -> Result<Self, OutputError> {
		let format = sink.format();
		debug2!("AudioOutput - try_open(), format: {format}, device: {device:?}, frames_per_buffer: {frames_per_buffer}");

		if device.is_some_and(|id| id != DUMMY_DEVICE_ID) {
			return Err(OutputError::DeviceUnavailable);
		}
		format.validate()?;
		if frames_per_buffer == 0 {
			return Err(OutputError::InvalidSpec);
		}

		let period = Duration::from_secs_f64(f64::from(frames_per_buffer) / f64::from(format.sample_rate));
		let (control, control_recv) = crossbeam::channel::unbounded();

		// Spawn the "dummy" audio thread.
		let thread = std::thread::Builder::new()
			.name("dabsink-dummy".into())
			.spawn(move || Self::run(sink, frames_per_buffer, period, &control_recv, &notifier))
			.map_err(|e| OutputError::Unknown(Cow::Owned(e.to_string())))?;

		Ok(Self {
			control,
			thread: Some(thread),
			format,
			playing: false,
		})
	}

	fn play(&mut self) -> Result<(), OutputError> {
		debug2!("AudioOutput - play()");
		self.control.send(Control::Play).map_err(|_| OutputError::StreamClosed)?;
		self.playing = true;
		Ok(())
	}

	fn pause(&mut self) -> Result<(), OutputError> {
		debug2!("AudioOutput - pause()");
		self.control.send(Control::Pause).map_err(|_| OutputError::StreamClosed)?;
		self.playing = false;
		Ok(())
	}

	fn is_playing(&self) -> bool {
		self.playing
	}

	fn format(&self) -> StreamFormat {
		self.format
	}

	fn device(&self) -> &str {
		DUMMY_DEVICE_ID
	}

	fn devices() -> Result<Vec<OutputDevice>, OutputError> {
		let mut devices = vec![OutputDevice {
			id: DUMMY_DEVICE_ID.into(),
			name: "Dummy output".into(),
			is_default: true,
		}];
		sort_devices(&mut devices);
		Ok(devices)
	}
}

impl Drop for DummyAudioOutput {
	fn drop(&mut self) {
		// The thread may already be gone.
		drop(self.control.send(Control::Shutdown));
		if let Some(thread) = self.thread.take() {
			if thread.join().is_err() {
				warn2!("AudioOutput - dummy thread panicked");
			}
		}
	}
}
