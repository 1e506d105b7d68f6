//! Playback state shared between the audio thread, the engine and the UI.

mod playback;
pub use playback::PlaybackState;
pub(crate) use playback::AtomicPlaybackState;
