//! Requests from the control thread to the audio thread.

//---------------------------------------------------------------------------------------------------- use
use std::sync::atomic::{AtomicU8,Ordering};

//---------------------------------------------------------------------------------------------------- Request
bitflags::bitflags! {
	/// Pending requests, set by the control thread and observed once
	/// per callback by the audio thread.
	///
	/// Any set bit means "ramp down and stay muted".
	#[derive(Copy,Clone,Debug,Default,PartialEq,Eq,Hash)]
	pub struct Request: u8 {
		/// Stay muted until cleared.
		const MUTE    = 0b001;
		/// Mute, then finish the stream so it can be torn down.
		const STOP    = 0b010;
		/// Mute, then finish the stream so it can be reopened with a new format.
		const RESTART = 0b100;
	}
}

impl Request {
	/// No request pending.
	pub const NONE: Self = Self::empty();

	#[inline]
	#[must_use]
	/// Does this request end the stream once muted?
	pub const fn finishes_stream(self) -> bool {
		self.intersects(Self::STOP.union(Self::RESTART))
	}
}

//---------------------------------------------------------------------------------------------------- AtomicRequest
/// [`Request`] bits shared between the control and audio thread.
#[derive(Debug,Default)]
pub(crate) struct AtomicRequest(AtomicU8);

impl AtomicRequest {
	#[inline]
	pub(crate) fn get(&self) -> Request {
		Request::from_bits_truncate(self.0.load(Ordering::Acquire))
	}

	#[inline]
	pub(crate) fn insert(&self, request: Request) {
		self.0.fetch_or(request.bits(), Ordering::AcqRel);
	}

	#[inline]
	pub(crate) fn remove(&self, request: Request) {
		self.0.fetch_and(!request.bits(), Ordering::AcqRel);
	}
}

//---------------------------------------------------------------------------------------------------- TESTS
#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn insert_remove() {
		let r = AtomicRequest::default();
		assert_eq!(r.get(), Request::NONE);

		r.insert(Request::MUTE);
		r.insert(Request::RESTART);
		assert_eq!(r.get(), Request::MUTE | Request::RESTART);
		assert!(r.get().finishes_stream());

		r.remove(Request::STOP | Request::RESTART);
		assert_eq!(r.get(), Request::MUTE);
		assert!(!r.get().finishes_stream());
	}
}
