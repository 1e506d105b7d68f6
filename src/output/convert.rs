//! Sample format and channel conversion for device buffers.

//----------------------------------------------------------------------------------------------- use
use cpal::{FromSample,Sample};

//----------------------------------------------------------------------------------------------- Convert
/// Convert and copy interleaved `input` into `output`.
///
/// Channels are mapped round-robin (mono goes to every output
/// channel, stereo alternates), a mono output gets the average.
#[cfg_attr(any(test, feature = "dummy"), allow(dead_code))]
pub(crate) fn write_frames<T>(input: &[i16], input_channels: usize, output: &mut [T], output_channels: usize)
where
	T: Sample + FromSample<i16>,
{
	let frames = output
		.chunks_exact_mut(output_channels)
		.zip(input.chunks_exact(input_channels));

	if input_channels == output_channels {
		for (o, i) in frames {
			for (o, i) in o.iter_mut().zip(i) {
				*o = T::from_sample(*i);
			}
		}
	} else if output_channels == 1 {
		for (o, i) in frames {
			let sum: i32 = i.iter().copied().map(i32::from).sum();
			// The average of `i16`'s fits an `i16`.
			#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
			let avg = (sum / input_channels as i32) as i16;
			o[0] = T::from_sample(avg);
		}
	} else {
		for (o, i) in frames {
			for (c, o) in o.iter_mut().enumerate() {
				*o = T::from_sample(i[c % input_channels]);
			}
		}
	}
}

//----------------------------------------------------------------------------------------------- TESTS
#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn same_layout() {
		let mut out = [0_i16; 4];
		write_frames(&[1, -2, 3, -4], 2, &mut out, 2);
		assert_eq!(out, [1, -2, 3, -4]);
	}

	#[test]
	fn mono_to_stereo() {
		let mut out = [0_i16; 4];
		write_frames(&[100, 200], 1, &mut out, 2);
		assert_eq!(out, [100, 100, 200, 200]);
	}

	#[test]
	fn stereo_to_mono() {
		let mut out = [0_i16; 2];
		write_frames(&[100, 300, i16::MAX, i16::MAX], 2, &mut out, 1);
		assert_eq!(out, [200, i16::MAX]);
	}

	#[test]
	fn stereo_to_surround() {
		let mut out = [0_i16; 6];
		write_frames(&[1, 2], 2, &mut out, 6);
		assert_eq!(out, [1, 2, 1, 2, 1, 2]);
	}

	#[test]
	fn to_f32() {
		let mut out = [1.0_f32; 2];
		write_frames(&[0, i16::MIN], 1, &mut out, 2);
		assert_eq!(out, [0.0, 0.0]);

		write_frames(&[i16::MIN], 1, &mut out, 2);
		assert_eq!(out, [-1.0, -1.0]);
	}

	#[test]
	fn to_u16() {
		let mut out = [0_u16; 1];
		write_frames(&[0], 1, &mut out, 1);
		assert_eq!(out, [32_768]);
	}
}
