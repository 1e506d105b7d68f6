//! DAB audio output.
//!
//! Plays decoded DAB/DAB+ audio (interleaved `i16` PCM) on the system's audio
//! output without clicks or pops, whatever the decoder and the device do:
//!
//! - [`AudioFifo`]: a fixed-capacity SPSC ring buffer between the decoder thread
//!   and the audio callback, that never partially writes a chunk
//!   and never overwrites unread audio.
//! - [`Engine`]: owns the output stream. The audio callback runs a
//!   mute/fade state machine ([`PlaybackState`]): every transition between
//!   silence and audio is a 60ms exponential ramp, underruns fade out,
//!   and the stream only unmutes once enough audio is buffered.
//! - [`Session`]: switches between two FIFOs when the decoded format changes,
//!   so the engine can ramp down the old format and restart on the new one.
//!
//! Everything the UI needs to know arrives as an [`Event`].
//!
//! ```rust,no_run
//! use dabsink::*;
//!
//! let (mut session, mut producer) = Session::new(Config::DEFAULT);
//! let events = session.events();
//!
//! // Decoder thread.
//! std::thread::spawn(move || loop {
//!     let samples = [0_i16; 2 * 1152];
//!     let _ = producer.push(&samples, StreamFormat::new(48_000, 2));
//! });
//!
//! // Control/UI thread.
//! session.engine().set_volume(80);
//! loop {
//!     session.poll();
//!     for event in events.try_iter() {
//!         println!("{event:?}");
//!     }
//!     # break;
//! }
//! ```

//---------------------------------------------------------------------------------------------------- Lints
#![allow(
    clippy::len_zero,
    clippy::type_complexity,
    clippy::module_inception,
)]

#![deny(
    nonstandard_style,
    deprecated,
    missing_docs,
    // `bitflags!` allows these on its generated items.
    unused_mut,
    unused_doc_comments,
)]

#![forbid(
    unused_unsafe,
    future_incompatible,
    break_with_label_and_loop,
    coherence_leak_check,
    duplicate_macro_attributes,
    exported_private_dependencies,
    for_loops_over_fallibles,
    large_assignments,
    overlapping_range_endpoints,
    private_in_public,
    semicolon_in_expressions_from_macros,
    redundant_semicolons,
    unconditional_recursion,
    unreachable_patterns,
    unused_allocation,
    unused_braces,
    unused_comparisons,
    unused_parens,
    unused_labels,
    while_true,
    keyword_idents,
    non_ascii_idents,
    noop_method_call,
	unreachable_pub,
    single_use_lifetimes,
	// variant_size_differences,
)]

//---------------------------------------------------------------------------------------------------- Public API
pub mod fifo;
pub use fifo::{AudioFifo,StreamFormat};

pub mod signal;
pub use signal::Volume;

pub mod state;
pub use state::PlaybackState;

pub mod config;
pub use config::Config;

pub mod error;
pub use error::OutputError;

mod event;
pub use event::Event;

mod output;
pub use output::{OutputDevice,AUDIO_OUTPUT_BACKEND};

mod engine;
pub use engine::Engine;

mod session;
pub use session::{AudioProducer,Session};

//---------------------------------------------------------------------------------------------------- Private Usage
mod render;
#[cfg(feature = "cpal")]
mod resampler;
mod atomic;
mod macros;

#[cfg(test)]
mod tests;
