//! Fade arithmetic.
//!
//! Gain ramps are exponential: one multiply per frame.
//! The mute coefficient carries the gain from 0dB down to [`FADE_MIN_DB`]
//! over the ramp, the unmute ramp starts at [`FADE_MIN_LIN`] and grows by
//! `2 - coefficient` per frame, which approximates `1 / coefficient`
//! without a division or a second `powf()` at runtime.

//---------------------------------------------------------------------------------------------------- Constants
/// Duration of a full mute/unmute ramp.
pub(crate) const FADE_TIME_MS: usize = 60;

/// Gain at the end of a mute ramp (and the start of an unmute ramp) in dB.
pub(crate) const FADE_MIN_DB: f32 = -60.0;

/// [`FADE_MIN_DB`] as a linear gain.
pub(crate) const FADE_MIN_LIN: f32 = 0.001;

/// With less than this much audio buffered while playing,
/// there is nothing worth ramping: mute instantly.
pub(crate) const HARD_MUTE_MS: usize = 1;

//---------------------------------------------------------------------------------------------------- Coefficients
#[inline]
#[must_use]
#[allow(clippy::cast_precision_loss)]
/// Per-frame multiplier that takes the gain from `0dB` to [`FADE_MIN_DB`] in `frames` frames.
///
/// For a full ramp `frames == FADE_TIME_MS * sample_rate_khz`, so this is
/// `10^(FADE_MIN_DB / (20 * FADE_TIME_MS * sample_rate_khz))`.
pub(crate) fn mute_factor(frames: usize) -> f32 {
	debug_assert!(frames > 0);
	10_f32.powf(FADE_MIN_DB / (20.0 * frames as f32))
}

#[inline]
#[must_use]
/// The unmute multiplier matching a mute coefficient.
pub(crate) fn unmute_factor(mute_factor: f32) -> f32 {
	2.0 - mute_factor
}

//---------------------------------------------------------------------------------------------------- Ramps
#[inline]
fn scale(sample: i16, gain: f32) -> i16 {
	// `as` saturates, `gain` is never above `1.0` here.
	#[allow(clippy::cast_possible_truncation)]
	{ (gain * f32::from(sample)).round() as i16 }
}

/// Ramp interleaved `samples` down, the gain is multiplied by `coefficient`
/// _before_ each frame so the first frame is already attenuated.
///
/// `volume` is folded into the gain, each sample is rounded once.
pub(crate) fn fade_out(samples: &mut [i16], channels: usize, coefficient: f32, volume: f32) {
	let mut gain = 1.0_f32;
	for frame in samples.chunks_exact_mut(channels) {
		gain *= coefficient;
		let g = gain * volume;
		for s in frame {
			*s = scale(*s, g);
		}
	}
}

/// Ramp interleaved `samples` up from [`FADE_MIN_LIN`], the gain is multiplied
/// by `coefficient` _after_ each frame and never exceeds `1.0`.
///
/// `volume` is folded into the gain, each sample is rounded once.
pub(crate) fn fade_in(samples: &mut [i16], channels: usize, coefficient: f32, volume: f32) {
	let mut gain = FADE_MIN_LIN;
	for frame in samples.chunks_exact_mut(channels) {
		let g = gain * volume;
		for s in frame.iter_mut() {
			*s = scale(*s, g);
		}
		gain = f32::min(gain * coefficient, 1.0);
	}
}

/// Apply a linear volume, rounding half away from zero.
///
/// Full scale is a no-op.
pub(crate) fn apply_volume(samples: &mut [i16], volume: f32) {
	if volume >= 1.0 {
		return;
	}
	for s in samples {
		*s = scale(*s, volume);
	}
}

//---------------------------------------------------------------------------------------------------- TESTS
#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	const FULL_RAMP_48K: usize = FADE_TIME_MS * 48;

	#[test]
	fn full_ramp_reaches_floor() {
		let c = mute_factor(FULL_RAMP_48K);
		let end = c.powi(FULL_RAMP_48K as i32);
		assert!((end - FADE_MIN_LIN).abs() < 1e-4, "{end}");
	}

	#[test]
	fn short_ramp_reaches_floor() {
		for frames in [48, 100, 1000] {
			let end = mute_factor(frames).powi(frames as i32);
			assert!((end - FADE_MIN_LIN).abs() < 1e-4, "{frames}: {end}");
		}
	}

	#[test]
	fn unmute_factor_approximates_inverse() {
		let c = mute_factor(FULL_RAMP_48K);
		let inverse = 1.0 / c;
		assert!((unmute_factor(c) - inverse).abs() < 1e-4);
	}

	#[test]
	fn fade_out_monotonic() {
		let mut samples = vec![10_000_i16; FULL_RAMP_48K];
		fade_out(&mut samples, 1, mute_factor(FULL_RAMP_48K), 1.0);
		assert!(samples[0] < 10_000);
		for w in samples.windows(2) {
			assert!(w[1] <= w[0]);
			assert!(w[1] >= 0);
		}
		assert!(*samples.last().unwrap() <= 11);
	}

	#[test]
	fn fade_in_monotonic() {
		let mut samples = vec![-10_000_i16; FULL_RAMP_48K * 2];
		fade_in(&mut samples, 2, unmute_factor(mute_factor(FULL_RAMP_48K)), 1.0);
		assert_eq!(samples[0], -10);
		assert_eq!(samples[0], samples[1]);
		for w in samples.windows(2) {
			// Magnitude never shrinks.
			assert!(w[1] <= w[0]);
			assert!(w[1] >= -10_000);
		}
		assert!(*samples.last().unwrap() < -9_000);
	}

	#[test]
	fn ramp_rounds_once() {
		// 5 * 0.5 * 0.5 = 1.25, rounding the volume first would give round(2.5 * 0.5) = 2.
		let mut samples = [5_i16, -5];
		fade_out(&mut samples, 2, 0.5, 0.5);
		assert_eq!(samples, [1, -1]);

		// 2000 * 0.001 * 0.25 = 0.5, then clamped to full gain.
		let mut samples = [2000_i16, 2000];
		fade_in(&mut samples, 1, 1000.0, 0.25);
		assert_eq!(samples, [1, 500]);
	}

	#[test]
	fn volume() {
		let mut samples = [1000, -1000, 3, -3, i16::MAX, i16::MIN];
		apply_volume(&mut samples, 0.5);
		assert_eq!(samples, [500, -500, 2, -2, 16_384, -16_384]);

		let mut samples = [1000, -1000];
		apply_volume(&mut samples, 1.0);
		assert_eq!(samples, [1000, -1000]);
	}
}
