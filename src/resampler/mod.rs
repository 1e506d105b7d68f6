//! Sample rate conversion for devices that can't run at the stream's rate.

mod resampler;
pub(crate) use resampler::Resampler;
