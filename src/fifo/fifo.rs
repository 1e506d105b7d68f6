//! Audio FIFO.
//!
//! A fixed-capacity byte ring buffer holding interleaved `i16` PCM,
//! shared between exactly one producer (the decoder thread) and
//! one consumer (the audio output callback).
//!
//! Only `count` is truly shared: `head` is only ever advanced by
//! the producer, `tail` only by the consumer. The bytes in
//! `[tail, tail + count)` belong to the consumer, the rest
//! belong to the producer, so both sides copy outside of the
//! `count` lock and only re-acquire it to publish the new count.

//---------------------------------------------------------------------------------------------------- use
use std::{
	cell::UnsafeCell,
	time::{Duration,Instant},
	sync::atomic::{AtomicU64,Ordering},
};
use parking_lot::{Condvar,Mutex};
use crate::{
	fifo::{AUDIO_FIFO_SIZE,StreamFormat},
	macros::{debug2,trace2,warn2},
};

//---------------------------------------------------------------------------------------------------- WritePolicy
/// What [`AudioFifo::write`] does when the chunk doesn't fit.
///
/// A chunk is never partially written and unread data is never overwritten.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy,Clone,Debug,PartialEq,Eq)]
pub enum WritePolicy {
	/// Drop the whole chunk immediately and count it.
	///
	/// Used by producers that must never stall, e.g. a radio hardware read thread.
	Drop,
	/// Wait (up to the given duration) for the consumer to free enough room,
	/// then drop the whole chunk if there still isn't any.
	Block(Duration),
}

impl WritePolicy {
	/// Backpressure for up to 1 second.
	pub const DEFAULT: Self = Self::Block(Duration::from_secs(1));
}

impl Default for WritePolicy {
	fn default() -> Self {
		Self::DEFAULT
	}
}

//---------------------------------------------------------------------------------------------------- WriteOutcome
/// The result of an [`AudioFifo`] write.
#[must_use]
#[derive(Copy,Clone,Debug,PartialEq,Eq)]
pub enum WriteOutcome {
	/// All bytes were written.
	Written(usize),
	/// Nothing was written, the chunk was dropped and counted in [`FifoStats`].
	Dropped,
}

impl WriteOutcome {
	#[inline]
	#[must_use]
	/// Was the chunk dropped?
	pub const fn is_dropped(&self) -> bool {
		matches!(self, Self::Dropped)
	}
}

//---------------------------------------------------------------------------------------------------- FifoStats
/// A snapshot of an [`AudioFifo`]'s counters, for diagnostics.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy,Clone,Debug,Default,PartialEq,Eq)]
pub struct FifoStats {
	/// Total bytes accepted by writes.
	pub written_bytes: u64,
	/// Total bytes consumed by reads and skips.
	pub read_bytes: u64,
	/// How many chunks were dropped on overflow.
	pub dropped_chunks: u64,
	/// How many bytes those dropped chunks contained.
	pub dropped_bytes: u64,
}

#[derive(Debug,Default)]
struct AtomicStats {
	written_bytes:  AtomicU64,
	read_bytes:     AtomicU64,
	dropped_chunks: AtomicU64,
	dropped_bytes:  AtomicU64,
}

//---------------------------------------------------------------------------------------------------- AudioFifo
/// Fixed-capacity single-producer/single-consumer PCM ring buffer.
///
/// Share it with `Arc`: the producer calls [`Self::write`], the
/// consumer calls [`Self::read`] / [`Self::skip`] / [`Self::bytes_available`].
///
/// ```rust
/// # use dabsink::fifo::*;
/// let fifo = AudioFifo::new(WritePolicy::Drop);
/// let chunk = [1_u8, 2, 3, 4];
/// assert_eq!(fifo.write(&chunk), WriteOutcome::Written(4));
///
/// let mut out = [0_u8; 8];
/// assert_eq!(fifo.read(&mut out), 4);
/// assert_eq!(&out[..4], &chunk);
/// assert!(fifo.is_empty());
/// ```
pub struct AudioFifo {
	/// The bytes, contiguous and wrapping.
	buffer: Box<[UnsafeCell<u8>]>,
	/// Producer side, the write offset.
	head: Mutex<usize>,
	/// Consumer side, the read offset.
	tail: Mutex<usize>,
	/// Valid bytes currently stored, `0..=capacity`.
	count: Mutex<usize>,
	/// Signalled on every `count` change.
	count_changed: Condvar,
	/// Format of the audio currently being written.
	format: Mutex<StreamFormat>,
	policy: WritePolicy,
	stats: AtomicStats,
}

// SAFETY:
// The only non-`Sync` field is `buffer`. It is only ever accessed through
// raw pointers to byte ranges that are exclusively owned by one side:
//
// - the producer writes `[head, head + len)` where `len <= capacity - count`
// - the consumer reads  `[tail, tail + len)` where `len <= count`
//
// `head` and `tail` are each held for the whole copy, so there is at most one
// writer and one reader in flight, and `count` is only changed after the copy
// is done, so the two ranges never overlap. `reset()` holds all three locks.
unsafe impl Sync for AudioFifo {}

impl AudioFifo {
	#[cold]
	#[inline(never)]
	#[must_use]
	/// Create an [`AudioFifo`] with the default capacity of [`AUDIO_FIFO_SIZE`] bytes.
	pub fn new(policy: WritePolicy) -> Self {
		Self::with_capacity(AUDIO_FIFO_SIZE, policy)
	}

	#[cold]
	#[inline(never)]
	#[must_use]
	/// Create an [`AudioFifo`] holding up to `capacity` bytes.
	///
	/// # Panics
	/// `capacity` must be non-zero.
	pub fn with_capacity(capacity: usize, policy: WritePolicy) -> Self {
		assert!(capacity > 0, "AudioFifo capacity must be non-zero");

		Self {
			buffer: (0..capacity).map(|_| UnsafeCell::new(0)).collect(),
			head: Mutex::new(0),
			tail: Mutex::new(0),
			count: Mutex::new(0),
			count_changed: Condvar::new(),
			format: Mutex::new(StreamFormat::DEFAULT),
			policy,
			stats: AtomicStats::default(),
		}
	}

	#[inline]
	#[must_use]
	/// Capacity in bytes.
	pub fn capacity(&self) -> usize {
		self.buffer.len()
	}

	#[inline]
	#[must_use]
	/// The policy [`Self::write`] follows on a full buffer.
	pub const fn policy(&self) -> WritePolicy {
		self.policy
	}

	#[inline]
	#[must_use]
	/// How many bytes are ready to be read.
	pub fn bytes_available(&self) -> usize {
		*self.count.lock()
	}

	#[inline]
	#[must_use]
	/// How many bytes can be written without dropping or blocking.
	pub fn bytes_free(&self) -> usize {
		self.capacity() - self.bytes_available()
	}

	#[inline]
	#[must_use]
	/// Is the FIFO empty?
	pub fn is_empty(&self) -> bool {
		self.bytes_available() == 0
	}

	#[inline]
	#[must_use]
	/// The format tag of the audio in this FIFO.
	pub fn format(&self) -> StreamFormat {
		*self.format.lock()
	}

	/// Set the format tag, called by the producer when the decoder's format changes.
	pub fn set_format(&self, format: StreamFormat) {
		*self.format.lock() = format;
	}

	#[must_use]
	/// Snapshot of the diagnostic counters.
	pub fn stats(&self) -> FifoStats {
		FifoStats {
			written_bytes:  self.stats.written_bytes.load(Ordering::Relaxed),
			read_bytes:     self.stats.read_bytes.load(Ordering::Relaxed),
			dropped_chunks: self.stats.dropped_chunks.load(Ordering::Relaxed),
			dropped_bytes:  self.stats.dropped_bytes.load(Ordering::Relaxed),
		}
	}

	/// Empty the FIFO: `count = 0`, `head = tail = 0`.
	///
	/// Only call this at session boundaries when no read or write is in
	/// flight; a producer blocked in [`Self::write`] will delay it.
	pub fn reset(&self) {
		debug2!("AudioFifo - reset()");

		let mut head  = self.head.lock();
		let mut tail  = self.tail.lock();
		let mut count = self.count.lock();
		*head  = 0;
		*tail  = 0;
		*count = 0;
		self.count_changed.notify_all();
	}

	//---------------------------------------------------------------------------------------------------- Producer
	/// Write `bytes` following this FIFO's [`WritePolicy`].
	///
	/// The chunk is written whole or not at all.
	pub fn write(&self, bytes: &[u8]) -> WriteOutcome {
		match self.policy {
			WritePolicy::Drop => self.write_inner(bytes, None),
			WritePolicy::Block(timeout) => self.write_inner(bytes, Some(timeout)),
		}
	}

	/// Write `bytes` or drop them if they don't fit right now, regardless of [`WritePolicy`].
	pub fn try_write(&self, bytes: &[u8]) -> WriteOutcome {
		self.write_inner(bytes, None)
	}

	/// Write interleaved samples, see [`Self::write`].
	pub fn write_samples(&self, samples: &[i16]) -> WriteOutcome {
		self.write(bytemuck::cast_slice(samples))
	}

	fn write_inner(&self, bytes: &[u8], timeout: Option<Duration>) -> WriteOutcome {
		let len = bytes.len();
		if len == 0 {
			return WriteOutcome::Written(0);
		}

		let bytes_per_frame = self.format().bytes_per_frame();
		if bytes_per_frame == 0 || len % bytes_per_frame != 0 {
			warn2!("AudioFifo - chunk of {len} bytes is not a whole number of {bytes_per_frame} byte frames");
			return self.drop_chunk(len);
		}

		// Could never fit, don't wait for it.
		let capacity = self.capacity();
		if len > capacity {
			return self.drop_chunk(len);
		}

		let mut head = self.head.lock();

		{
			let mut count = self.count.lock();
			if let Some(timeout) = timeout {
				let deadline = Instant::now() + timeout;
				while capacity - *count < len {
					trace2!("AudioFifo - full, waiting for {len} bytes of room");
					if self.count_changed.wait_until(&mut count, deadline).timed_out() {
						break;
					}
				}
			}
			if capacity - *count < len {
				drop(count);
				return self.drop_chunk(len);
			}
		}

		let start = *head;
		let first = std::cmp::min(len, capacity - start);
		// SAFETY: `[start, start + len)` (wrapping) is free space owned by the producer, see `unsafe impl Sync`.
		unsafe {
			let base = UnsafeCell::raw_get(self.buffer.as_ptr());
			std::ptr::copy_nonoverlapping(bytes.as_ptr(), base.add(start), first);
			std::ptr::copy_nonoverlapping(bytes.as_ptr().add(first), base, len - first);
		}
		*head = (start + len) % capacity;

		let mut count = self.count.lock();
		*count += len;
		debug_assert!(*count <= capacity);
		self.count_changed.notify_all();
		drop(count);

		self.stats.written_bytes.fetch_add(len as u64, Ordering::Relaxed);
		WriteOutcome::Written(len)
	}

	#[cold]
	fn drop_chunk(&self, len: usize) -> WriteOutcome {
		debug2!("AudioFifo - dropping chunk of {len} bytes");
		self.stats.dropped_chunks.fetch_add(1, Ordering::Relaxed);
		self.stats.dropped_bytes.fetch_add(len as u64, Ordering::Relaxed);
		WriteOutcome::Dropped
	}

	//---------------------------------------------------------------------------------------------------- Consumer
	/// Copy up to `out.len()` bytes out of the FIFO, returning how many were copied.
	///
	/// Never blocks on the producer. Returns `0` when empty.
	pub fn read(&self, out: &mut [u8]) -> usize {
		self.consume(out.len(), Some(out))
	}

	/// Read interleaved samples, returning how many _samples_ were read.
	pub fn read_samples(&self, out: &mut [i16]) -> usize {
		self.read(bytemuck::cast_slice_mut(out)) / std::mem::size_of::<i16>()
	}

	/// Discard up to `len` bytes without copying them, returning how many were discarded.
	pub fn skip(&self, len: usize) -> usize {
		self.consume(len, None)
	}

	fn consume(&self, len: usize, out: Option<&mut [u8]>) -> usize {
		let mut tail = self.tail.lock();

		let len = std::cmp::min(len, *self.count.lock());
		if len == 0 {
			return 0;
		}

		let capacity = self.capacity();
		let start = *tail;
		if let Some(out) = out {
			let first = std::cmp::min(len, capacity - start);
			// SAFETY: `[start, start + len)` (wrapping) is unread data owned by the consumer, see `unsafe impl Sync`.
			unsafe {
				let base = UnsafeCell::raw_get(self.buffer.as_ptr());
				std::ptr::copy_nonoverlapping(base.add(start), out.as_mut_ptr(), first);
				std::ptr::copy_nonoverlapping(base, out.as_mut_ptr().add(first), len - first);
			}
		}
		*tail = (start + len) % capacity;

		let mut count = self.count.lock();
		*count -= len;
		self.count_changed.notify_all();
		drop(count);

		self.stats.read_bytes.fetch_add(len as u64, Ordering::Relaxed);
		len
	}
}

impl std::fmt::Debug for AudioFifo {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AudioFifo")
			.field("capacity", &self.capacity())
			.field("count", &self.bytes_available())
			.field("format", &self.format())
			.field("policy", &self.policy)
			.finish_non_exhaustive()
	}
}
