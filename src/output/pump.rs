//! Fixed-size rendering behind callbacks of any size.
//!
//! A device callback asks for however many frames it wants, at the
//! device's sample rate. [`Pump`] always renders the sink in chunks of
//! exactly `frames_per_buffer` frames, so a mute/unmute ramp spans its
//! full fade, resamples each chunk to the device's rate when they differ,
//! and hands the result out over as many callbacks as it takes.

//----------------------------------------------------------------------------------------------- use
use crate::{
	error::OutputError,
	output::{AudioSink,Rendered},
	macros::{debug2,error2},
	resampler::Resampler,
};

//----------------------------------------------------------------------------------------------- Pump
/// Adapts an [`AudioSink`] to the device's callback size and sample rate.
///
/// Output is interleaved with the sink's channel count.
#[cfg_attr(any(test, feature = "dummy"), allow(dead_code))]
pub(crate) struct Pump<S> {
	sink: S,
	/// One chunk at the sink's rate.
	chunk: Vec<i16>,
	/// `None` when the device runs at the sink's rate.
	resampler: Option<Resampler>,
	/// The last chunk, at the device's rate.
	ready: Vec<i16>,
	/// Next sample of `ready` to hand out.
	cursor: usize,
	/// The sink completed, nothing is rendered anymore.
	complete: bool,
}

#[cfg_attr(any(test, feature = "dummy"), allow(dead_code))]
impl<S: AudioSink> Pump<S> {
	#[cold]
	#[inline(never)]
	/// Render `sink` in chunks of `frames_per_buffer`, for a device at `device_rate`.
	pub(crate) fn new(sink: S, frames_per_buffer: usize, device_rate: u32) -> Result<Self, OutputError> {
		let format = sink.format();
		let channels = usize::from(format.channels);
		if frames_per_buffer == 0 {
			return Err(OutputError::InvalidSpec);
		}

		let resampler = if format.sample_rate == device_rate {
			None
		} else {
			debug2!("Pump - resampling {}Hz -> {device_rate}Hz", format.sample_rate);
			Some(Resampler::new(format.sample_rate, device_rate, frames_per_buffer, channels)?)
		};

		let ready = match &resampler {
			Some(r) => r.frames_out_max(),
			None => frames_per_buffer,
		};

		Ok(Self {
			sink,
			chunk: vec![0; frames_per_buffer * channels],
			resampler,
			ready: Vec::with_capacity(ready * channels),
			cursor: 0,
			complete: false,
		})
	}

	/// Render the next chunk into `ready`.
	fn refill(&mut self) {
		self.cursor = 0;

		if self.sink.render(&mut self.chunk) == Rendered::Complete {
			self.complete = true;
		}

		match &mut self.resampler {
			None => {
				self.ready.clear();
				self.ready.extend_from_slice(&self.chunk);
			},
			Some(r) => {
				if let Err(e) = r.process(&self.chunk, &mut self.ready) {
					error2!("Pump - resampling failed: {e}");
					self.ready.clear();
				}
			},
		}
	}

	/// Fill all of `out`.
	///
	/// Returns [`Rendered::Complete`] once the sink has completed
	/// _and_ everything it rendered has been handed out.
	pub(crate) fn fill(&mut self, out: &mut [i16]) -> Rendered {
		let mut filled = 0;

		while filled < out.len() {
			if self.cursor == self.ready.len() {
				if self.complete {
					break;
				}
				self.refill();
				if self.ready.is_empty() {
					break;
				}
			}

			let n = std::cmp::min(self.ready.len() - self.cursor, out.len() - filled);
			out[filled..filled + n].copy_from_slice(&self.ready[self.cursor..self.cursor + n]);
			filled += n;
			self.cursor += n;
		}

		out[filled..].fill(0);

		if self.complete && self.cursor == self.ready.len() {
			Rendered::Complete
		} else {
			Rendered::Continue
		}
	}
}

//----------------------------------------------------------------------------------------------- TESTS
#[cfg(test)]
mod tests {
	use super::*;
	use crate::fifo::StreamFormat;
	use pretty_assertions::assert_eq;

	/// Renders the call count, records each buffer length.
	struct Counter {
		format: StreamFormat,
		calls: i16,
		lens: Vec<usize>,
		complete_on: Option<i16>,
	}

	impl Counter {
		fn new(format: StreamFormat, complete_on: Option<i16>) -> Self {
			Self { format, calls: 0, lens: vec![], complete_on }
		}
	}

	impl AudioSink for Counter {
		fn format(&self) -> StreamFormat {
			self.format
		}

		fn render(&mut self, out: &mut [i16]) -> Rendered {
			self.calls += 1;
			self.lens.push(out.len());
			out.fill(self.calls);
			if self.complete_on == Some(self.calls) {
				Rendered::Complete
			} else {
				Rendered::Continue
			}
		}
	}

	const MONO: StreamFormat = StreamFormat::new(48_000, 1);

	#[test]
	fn invalid() {
		assert_eq!(Pump::new(Counter::new(MONO, None), 0, 48_000).err(), Some(OutputError::InvalidSpec));
	}

	#[test]
	// The sink sees 4-frame chunks whatever the callback size.
	fn fixed_chunks() {
		let mut pump = Pump::new(Counter::new(MONO, None), 4, 48_000).unwrap();

		let mut out = [0_i16; 3];
		let mut seen = vec![];
		for _ in 0..4 {
			assert_eq!(pump.fill(&mut out), Rendered::Continue);
			seen.extend_from_slice(&out);
		}
		assert_eq!(seen, [1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3]);

		let mut out = [0_i16; 10];
		assert_eq!(pump.fill(&mut out), Rendered::Continue);
		assert_eq!(out, [4, 4, 4, 4, 5, 5, 5, 5, 6, 6]);
		assert!(pump.sink.lens.iter().all(|len| *len == 4));
	}

	#[test]
	// Complete only once the last chunk has been handed out.
	fn completes_after_last_chunk() {
		let stereo = StreamFormat::new(48_000, 2);
		let mut pump = Pump::new(Counter::new(stereo, Some(2)), 2, 48_000).unwrap();

		let mut out = [0_i16; 6];
		assert_eq!(pump.fill(&mut out), Rendered::Continue);
		assert_eq!(out, [1, 1, 1, 1, 2, 2]);

		assert_eq!(pump.fill(&mut out), Rendered::Complete);
		assert_eq!(out, [2, 2, 0, 0, 0, 0]);

		// Not rendered again.
		assert_eq!(pump.fill(&mut out), Rendered::Complete);
		assert_eq!(out, [0; 6]);
		assert_eq!(pump.sink.calls, 2);
	}

	#[test]
	// 60ms of 32kHz fills 60ms of a 48kHz device.
	fn resamples_to_device_rate() {
		let format = StreamFormat::new(32_000, 2);
		let mut pump = Pump::new(Counter::new(format, None), 1920, 48_000).unwrap();

		let mut out = vec![0_i16; 2880 * 2];
		for _ in 0..3 {
			assert_eq!(pump.fill(&mut out), Rendered::Continue);
		}
		assert_eq!(pump.sink.calls, 3);
		assert!(pump.sink.lens.iter().all(|len| *len == 1920 * 2));
	}
}
