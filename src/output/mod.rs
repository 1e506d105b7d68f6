//! Audio output backends.

mod device;
pub use device::OutputDevice;
pub(crate) use device::sort_devices;

mod notice;
pub(crate) use notice::{Notice,NoticeKind,Notifier};

mod sink;
pub(crate) use sink::{AudioSink,Rendered};

mod output;
pub(crate) use output::AudioOutput;

#[cfg(feature = "cpal")]
mod convert;
#[cfg(feature = "cpal")]
mod pump;

// Use the dummy backend if:
// - testing
// - it is enabled
// - no real backend is enabled
cfg_if::cfg_if! {
	if #[cfg(any(test, feature = "dummy", not(feature = "cpal")))] {
		mod dummy;
		pub(crate) use dummy::DummyAudioOutput as AudioOutputStruct;
		/// The audio output backend used.
		pub const AUDIO_OUTPUT_BACKEND: &str = "dummy";
	} else {
		mod cpal;
		pub(crate) use self::cpal::Cpal as AudioOutputStruct;
		/// The audio output backend used.
		pub const AUDIO_OUTPUT_BACKEND: &str = "cpal";
	}
}
