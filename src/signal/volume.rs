//! Output volume.

//---------------------------------------------------------------------------------------------------- use
use crate::atomic::AtomicF32;
use std::sync::atomic::Ordering;

//---------------------------------------------------------------------------------------------------- Volume
/// Audio volume level
///
/// This is a wrapper around [`f32`] that is between `0.0..=1.0`,
/// where `0.0` represents silence and `1.0` represents using the
/// decoded audio sample as-is, aka, max volume.
///
/// This unit is linear, not logarithmic - so `1.0` is 2x louder than `0.5`.
///
/// User interfaces usually present a logarithmic `0..=100` slider,
/// see [`Volume::from_ui`] and [`Volume::to_ui`].
#[derive(Copy,Clone,Debug,PartialEq,PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Volume(f32);

impl Volume {
	/// ```rust
	/// # use dabsink::signal::*;
	/// assert_eq!(Volume::MAX.inner(), 1.0);
	/// ```
	pub const MAX: Self = Self(1.0);
	/// ```rust
	/// # use dabsink::signal::*;
	/// assert_eq!(Volume::MIN.inner(), 0.0);
	/// ```
	pub const MIN: Self = Self(0.0);
	/// ```rust
	/// # use dabsink::signal::*;
	/// assert_eq!(Volume::DEFAULT.inner(), 1.0);
	/// ```
	pub const DEFAULT: Self = Self::MAX;

	#[inline]
	#[must_use]
	/// Create a new [`Volume`] from a [`f32`].
	///
	/// This constructor uses the same rules as [`Self::fix`],
	/// as the input is ran through that function before returning.
	pub fn new(volume: f32) -> Self {
		Self(volume).fix()
	}

	#[inline]
	#[must_use]
	/// Checks a [`Volume`] for correctness and fixes it
	///
	/// # Saturating
	/// If the input [`f32`] is greater than [`Volume::MAX`],
	/// it will saturate and return [`Volume::MAX`]
	///
	/// # `NaN` & `infinity` & negatives
	/// - If [`f32::NAN`] is passed, [`Volume::MIN`] is returned
	/// - If [`f32::INFINITY`] is passed, [`Volume::MAX`] is returned
	/// - If [`f32::NEG_INFINITY`] is passed, [`Volume::MIN`] is returned
	/// - If a negative float is passed, [`Volume::MIN`] is returned
	///
	/// ```rust
	/// # use dabsink::signal::*;
	/// // Normal.
	/// assert_eq!(Volume::new(0.00).inner(), 0.00);
	/// assert_eq!(Volume::new(0.25).inner(), 0.25);
	/// assert_eq!(Volume::new(1.00).inner(), 1.00);
	///
	/// // Saturating.
	/// assert_eq!(Volume::new(1.1), Volume::MAX);
	///
	/// // Weird floats.
	/// assert_eq!(Volume::new(f32::NAN),          Volume::MIN);
	/// assert_eq!(Volume::new(f32::INFINITY),     Volume::MAX);
	/// assert_eq!(Volume::new(f32::NEG_INFINITY), Volume::MIN);
	/// assert_eq!(Volume::new(-1.0),              Volume::MIN);
	/// ```
	pub fn fix(self) -> Self {
		use std::num::FpCategory as F;
		match self.0.classify() {
			F::Normal => {
				if self.0 > 1.0 {
					Self::MAX
				} else if self.0.is_sign_negative() {
					Self::MIN
				} else {
					Self(self.0)
				}
			},
			F::Infinite => {
				if self.0.is_sign_positive() {
					Self::MAX
				} else {
					Self::MIN
				}
			},
			F::Zero | F::Nan | F::Subnormal => Self::MIN,
		}
	}

	#[must_use]
	/// Convert a logarithmic UI volume (`0..=100`) into a linear [`Volume`].
	///
	/// Values above `100` saturate.
	///
	/// ```rust
	/// # use dabsink::signal::*;
	/// assert_eq!(Volume::from_ui(0),   Volume::MIN);
	/// assert_eq!(Volume::from_ui(100), Volume::MAX);
	/// assert_eq!(Volume::from_ui(255), Volume::MAX);
	/// assert!(Volume::from_ui(50).inner() < 0.5);
	/// ```
	pub fn from_ui(volume: u8) -> Self {
		let v = f32::from(volume.min(100)) / 100.0;
		if v >= 1.0 {
			return Self::MAX;
		}
		Self::new(-(1.0 - v).ln() / 100_f32.ln())
	}

	#[must_use]
	/// Convert back into a logarithmic UI volume (`0..=100`).
	///
	/// ```rust
	/// # use dabsink::signal::*;
	/// assert_eq!(Volume::MIN.to_ui(), 0);
	/// assert_eq!(Volume::MAX.to_ui(), 100);
	/// ```
	pub fn to_ui(self) -> u8 {
		// The log curve saturates at UI 99, so full scale maps to 100.
		if self.0 >= 1.0 {
			100
		} else {
			let v = 1.0 - (-self.0 * 100_f32.ln()).exp();
			#[allow(clippy::cast_possible_truncation,clippy::cast_sign_loss)]
			{ (v * 100.0).round() as u8 }
		}
	}

	#[inline]
	#[must_use]
	/// Returns the inner [`f32`]
	pub const fn inner(&self) -> f32 {
		self.0
	}
}

impl Default for Volume {
	#[inline]
	fn default() -> Self {
		Self::DEFAULT
	}
}

impl std::fmt::Display for Volume {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl From<f32> for Volume {
	#[inline]
	fn from(volume: f32) -> Self {
		Self::new(volume)
	}
}

//---------------------------------------------------------------------------------------------------- AtomicVolume
/// [`Volume`] shared between the control thread (writer) and the audio thread (reader).
pub(crate) struct AtomicVolume(AtomicF32);

impl AtomicVolume {
	#[cold]
	#[inline(never)]
	pub(crate) fn new(volume: Volume) -> Self {
		Self(AtomicF32::new(volume.inner()))
	}

	#[inline]
	pub(crate) fn store(&self, volume: Volume, ordering: Ordering) {
		self.0.store(volume.inner(), ordering);
	}

	#[inline]
	pub(crate) fn load(&self, ordering: Ordering) -> Volume {
		Volume(self.0.load(ordering))
	}

	#[inline]
	pub(crate) fn set(&self, volume: Volume) {
		self.store(volume, Ordering::Release);
	}

	#[inline]
	pub(crate) fn get(&self) -> Volume {
		self.load(Ordering::Acquire)
	}
}

impl std::fmt::Debug for AtomicVolume {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_tuple("AtomicVolume")
			.field(&self.0.load(Ordering::Relaxed))
			.finish()
	}
}

//---------------------------------------------------------------------------------------------------- TESTS
#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn atomic_volume_0_to_100() {
		let mut v = 0.0;
		while v <= 1.0 {
			let atomic = AtomicVolume::new(v.into());
			assert_eq!(atomic.get().inner(), v);
			v += 0.1;
		}
	}

	#[test]
	fn ui_scale_is_monotonic() {
		let mut last = Volume::MIN;
		for ui in 1..=98 {
			let v = Volume::from_ui(ui);
			assert!(v > last, "{ui}: {v} <= {last}");
			assert!((0.0..=1.0).contains(&v.inner()));
			last = v;
		}
	}

	#[test]
	fn ui_round_trip() {
		for ui in 0..=98 {
			assert_eq!(Volume::from_ui(ui).to_ui(), ui);
		}
	}

	#[test]
	fn ui_scale_points() {
		// -ln(0.5) / ln(100)
		assert!((Volume::from_ui(50).inner() - 0.150_515).abs() < 1e-4);
		// -ln(0.01) / ln(100) == 1.0
		assert!((Volume::from_ui(99).inner() - 1.0).abs() < 1e-4);
	}
}
