//! What an output backend drives.

//---------------------------------------------------------------------------------------------------- use
use crate::fifo::StreamFormat;

//---------------------------------------------------------------------------------------------------- Rendered
/// Result of one [`AudioSink::render`] call.
#[derive(Copy,Clone,Debug,PartialEq,Eq)]
pub(crate) enum Rendered {
	/// Keep calling.
	Continue,
	/// The stream may be torn down, the buffer just rendered
	/// is the last one containing audio.
	Complete,
}

//---------------------------------------------------------------------------------------------------- AudioSink
/// Something that produces interleaved `i16` audio on demand.
///
/// Backends call [`Self::render`] from their audio thread,
/// it must not block, allocate or lock anything contended.
pub(crate) trait AudioSink: Send + 'static {
	/// The format every rendered buffer is in.
	fn format(&self) -> StreamFormat;

	/// Fill all of `out`.
	///
	/// `out.len()` is always a whole number of frames.
	fn render(&mut self, out: &mut [i16]) -> Rendered;
}
