//! The render state machine.
//!
//! Every output callback (or dummy "tick") asks the [`Renderer`] to fill
//! a buffer of interleaved `i16` samples. The renderer decides from the
//! FIFO fill level and the pending [`Request`]s whether to output silence,
//! ramp up, play, or ramp down, and publishes every transition.
//!
//! Only [`PlaybackState::Muted`] and [`PlaybackState::Playing`] survive
//! between callbacks, the ramps always complete inside one callback.

//---------------------------------------------------------------------------------------------------- use
use std::sync::Arc;
use crossbeam::channel::Sender;
use crate::{
	error::OutputError,
	event::Event,
	fifo::{AudioFifo,StreamFormat},
	macros::{debug2,trace2,try_send_or_drop},
	output::{AudioSink,Rendered},
	render::{
		Shared,
		fade::{
			FADE_TIME_MS,HARD_MUTE_MS,
			apply_volume,fade_in,fade_out,mute_factor,unmute_factor,
		},
	},
	signal::Request,
	state::PlaybackState,
};

//---------------------------------------------------------------------------------------------------- Renderer
/// Drains one [`AudioFifo`] into an output stream.
///
/// A renderer is bound to the FIFO (and so the format) it was created for,
/// a restart creates a new one.
pub(crate) struct Renderer {
	fifo: Arc<AudioFifo>,
	shared: Arc<Shared>,
	events: Sender<Event>,

	format: StreamFormat,
	channels: usize,

	/// Frames in a full fade.
	fade_frames: usize,
	/// [`mute_factor`] for `fade_frames`, computed once.
	fade_factor: f32,
	/// Below this many bytes while playing: mute without a ramp.
	hard_mute_bytes: usize,
	/// Fill level that must be exceeded before unmuting.
	unmute_threshold_bytes: usize,

	/// Set once a stop/restart has completed, only silence after this.
	complete: bool,
}

impl Renderer {
	#[cold]
	#[inline(never)]
	/// Create a renderer for the `fifo`'s current format.
	///
	/// Every new stream begins [`PlaybackState::Muted`].
	///
	/// # Errors
	/// The FIFO's format is unusable (no channels, or below `1kHz`).
	pub(crate) fn new(
		fifo: Arc<AudioFifo>,
		shared: Arc<Shared>,
		events: Sender<Event>,
		unmute_threshold_ms: usize,
	) -> Result<Self, OutputError> {
		let format = fifo.format();
		format.validate()?;

		let fade_frames = format.frames_for_ms(FADE_TIME_MS);
		let this = Self {
			channels: usize::from(format.channels),
			fade_frames,
			fade_factor: mute_factor(fade_frames),
			hard_mute_bytes: format.bytes_for_ms(HARD_MUTE_MS),
			unmute_threshold_bytes: format.bytes_for_ms(unmute_threshold_ms),
			complete: false,
			format,
			fifo,
			shared,
			events,
		};

		this.shared.state.set(PlaybackState::Muted);
		debug2!("Renderer - new(), format: {format}, unmute threshold: {unmute_threshold_ms}ms");

		Ok(this)
	}

	/// Publish a state change.
	fn transition(&self, state: PlaybackState) {
		trace2!("Renderer - {} -> {state}", self.shared.state.get());
		self.shared.state.set(state);
		try_send_or_drop!(self.events, Event::StateChanged(state));
	}

	/// The coefficient for a ramp over `frames`.
	fn factor(&self, frames: usize) -> f32 {
		if frames == self.fade_frames {
			self.fade_factor
		} else {
			mute_factor(frames)
		}
	}

	const fn finish(request: Request) -> Rendered {
		if request.finishes_stream() {
			Rendered::Complete
		} else {
			Rendered::Continue
		}
	}

	fn render_muted(&self, out: &mut [i16], request: Request) -> Rendered {
		let bytes = out.len() * std::mem::size_of::<i16>();
		let high_water = std::cmp::max(self.unmute_threshold_bytes, bytes);

		// Wait for the FIFO to fill up.
		if self.fifo.bytes_available() <= high_water {
			out.fill(0);
			return Self::finish(request);
		}

		// Something wants us muted, consume audio at the
		// real-time rate so the FIFO never overflows.
		if !request.is_empty() {
			out.fill(0);
			self.fifo.skip(bytes);
			return Self::finish(request);
		}

		let read = self.fifo.read_samples(out);
		out[read..].fill(0);
		let volume = self.shared.volume.get().inner();

		self.transition(PlaybackState::Unmuting);
		let frames = std::cmp::min(read / self.channels, self.fade_frames);
		let ramp = frames * self.channels;
		if frames > 0 {
			let factor = unmute_factor(self.factor(frames));
			fade_in(&mut out[..ramp], self.channels, factor, volume);
		}
		apply_volume(&mut out[ramp..read], volume);
		self.transition(PlaybackState::Playing);

		Rendered::Continue
	}

	fn render_playing(&self, out: &mut [i16], request: Request) -> Rendered {
		let bytes = out.len() * std::mem::size_of::<i16>();
		let available = self.fifo.bytes_available();

		// Underrun, not even enough for a short ramp.
		if available < bytes && available < self.hard_mute_bytes {
			debug2!("Renderer - underrun, {available} bytes left, hard mute");
			out.fill(0);
			self.transition(PlaybackState::Muted);
			return Self::finish(request);
		}

		let read = self.fifo.read_samples(out);
		out[read..].fill(0);
		let volume = self.shared.volume.get().inner();

		if available < bytes {
			// Underrun, ramp down over whatever is left.
			debug2!("Renderer - underrun, {available}/{bytes} bytes, muting");
		} else if request.is_empty() {
			apply_volume(&mut out[..read], volume);
			return Rendered::Continue;
		}

		self.transition(PlaybackState::Muting);
		let frames = std::cmp::min(read / self.channels, self.fade_frames);
		let ramp = frames * self.channels;
		fade_out(&mut out[..ramp], self.channels, self.factor(frames), volume);
		out[ramp..].fill(0);
		self.transition(PlaybackState::Muted);

		Self::finish(request)
	}
}

//---------------------------------------------------------------------------------------------------- AudioSink
impl AudioSink for Renderer {
	fn format(&self) -> StreamFormat {
		self.format
	}

	fn render(&mut self, out: &mut [i16]) -> Rendered {
		if self.complete {
			out.fill(0);
			return Rendered::Complete;
		}

		let request = self.shared.request.get();
		let rendered = match self.shared.state.get() {
			PlaybackState::Muted => self.render_muted(out, request),
			_ => self.render_playing(out, request),
		};

		if rendered == Rendered::Complete {
			debug2!("Renderer - stream complete, request: {request:?}");
			self.complete = true;
		}

		rendered
	}
}

impl std::fmt::Debug for Renderer {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Renderer")
			.field("format", &self.format)
			.field("fade_frames", &self.fade_frames)
			.field("unmute_threshold_bytes", &self.unmute_threshold_bytes)
			.field("complete", &self.complete)
			.finish_non_exhaustive()
	}
}
