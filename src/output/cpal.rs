//! Audio hardware output.
//!
//! This file implements the abstract `AudioOutput`
//! trait using `cpal` as a backend.
//!
//! For documentation on `AudioOutput`, see `output.rs`.
//!
//! `cpal` calls our callback from its own audio thread, whatever
//! number of frames the device asks for. The sink is rendered in
//! fixed chunks through a [`Pump`], which also resamples when the
//! device can't run at the sink's rate. If the device can't take
//! `i16` at the sink's channel count, the callback converts the
//! sample format and maps channels.

//----------------------------------------------------------------------------------------------- use
use crate::{
	error::OutputError,
	fifo::StreamFormat,
	output::{AudioOutput,AudioSink,Notifier,OutputDevice,Rendered,sort_devices,convert::write_frames,pump::Pump},
	macros::{debug2,trace2,warn2},
};
use cpal::{
	traits::{DeviceTrait,StreamTrait,HostTrait},
	FromSample,SampleFormat,SizedSample,SupportedBufferSize,SupportedStreamConfig,
};
use std::borrow::Cow;

//----------------------------------------------------------------------------------------------- Cpal
/// A `cpal` output stream.
pub(crate) struct Cpal {
	/// The actual audio stream.
	stream: cpal::Stream,
	/// Sink format the stream was opened for.
	format: StreamFormat,
	/// Device name, `cpal` names double as ids.
	device: String,
	/// Are we currently playing?
	playing: bool,
}

impl Cpal {
	/// Find the device named `id`, or the default one.
	fn find_device(host: &cpal::Host, id: Option<&str>) -> Result<cpal::Device, OutputError> {
		let Some(id) = id else {
			return host.default_output_device().ok_or(OutputError::DeviceUnavailable);
		};

		for device in host.output_devices()? {
			if device.name().is_ok_and(|name| name == id) {
				return Ok(device);
			}
		}

		Err(OutputError::DeviceUnavailable)
	}

	/// Pick the config closest to `format`.
	///
	/// In order of preference:
	/// 1. exact rate and channels, `i16` then `f32` then `u16`
	/// 2. exact rate, any channel count
	/// 3. the device's default config, the [`Pump`] resamples
	fn pick_config(device: &cpal::Device, format: StreamFormat) -> Result<SupportedStreamConfig, OutputError> {
		let rate = cpal::SampleRate(format.sample_rate);
		let channels = cpal::ChannelCount::from(format.channels);

		let supported: Vec<_> = device
			.supported_output_configs()?
			.filter(|c| c.min_sample_rate() <= rate && rate <= c.max_sample_rate())
			.collect();

		for sample_format in [SampleFormat::I16, SampleFormat::F32, SampleFormat::U16] {
			if let Some(c) = supported.iter().find(|c| c.channels() == channels && c.sample_format() == sample_format) {
				return Ok(c.clone().with_sample_rate(rate));
			}
		}

		if let Some(c) = supported.iter().find(|c| c.sample_format() == SampleFormat::I16).or_else(|| supported.first()) {
			warn2!("AudioOutput - {format} unsupported, using {} channels, {}", c.channels(), c.sample_format());
			return Ok(c.clone().with_sample_rate(rate));
		}

		let default = device.default_output_config()?;
		warn2!("AudioOutput - {format} unsupported, using device default: {default:?}");
		Ok(default)
	}

	/// Build the stream for device sample type `T`.
	fn build<T, S>(
		device: &cpal::Device,
		config: &cpal::StreamConfig,
		mut pump: Pump<S>,
		sink_channels: usize,
		notifier: Notifier,
	) -> Result<cpal::Stream, OutputError>
	where
		T: SizedSample + FromSample<i16>,
		S: AudioSink,
	{
		let device_channels = usize::from(config.channels);
		let mut scratch = Vec::<i16>::new();
		let mut finished = false;
		let errors = notifier.clone();

		// The actual callback `cpal` will call when polling for audio data.
		let data_callback = move |output: &mut [T], _: &cpal::OutputCallbackInfo| {
			trace2!("AudioOutput - data callback, output.len(): {}", output.len());

			if finished {
				output.fill(T::EQUILIBRIUM);
				return;
			}

			// Only allocates if the device asks for more than ever before.
			let frames = output.len() / device_channels;
			scratch.resize(frames * sink_channels, 0);

			if pump.fill(&mut scratch) == Rendered::Complete {
				finished = true;
				notifier.finished();
			}

			write_frames(&scratch, sink_channels, output, device_channels);
		};

		// The callback `cpal` will call when errors occur.
		let error_callback = move |error: cpal::StreamError| {
			errors.error(error.into());
		};

		Ok(device.build_output_stream(config, data_callback, error_callback, None)?)
	}
}

//----------------------------------------------------------------------------------------------- `AudioOutput` Impl
impl AudioOutput for Cpal {
	#[cold]
	#[inline(never)]
	fn try_open<S: AudioSink>(
		sink: S,
		device: Option<&str>,
		frames_per_buffer: u32,
		notifier: Notifier,
	) -> Result<Self, OutputError> {
		let format = sink.format();
		debug2!("AudioOutput - try_open(), format: {format}, device: {device:?}, frames_per_buffer: {frames_per_buffer}");
		format.validate()?;

		// Get default host.
		let host = cpal::default_host();
		let device = Self::find_device(&host, device)?;
		let name = device.name()?;

		let supported = Self::pick_config(&device, format)?;
		debug2!("AudioOutput - device: {name}, config:\n{supported:#?}");

		// The same length of time at the device's rate.
		let device_rate = supported.sample_rate().0;
		let device_frames = u64::from(frames_per_buffer) * u64::from(device_rate) / u64::from(format.sample_rate);
		let buffer_size = match (supported.buffer_size(), u32::try_from(device_frames)) {
			(SupportedBufferSize::Range { min, max }, Ok(frames)) if (*min..=*max).contains(&frames) => {
				cpal::BufferSize::Fixed(frames)
			},
			_ => cpal::BufferSize::Default,
		};
		let config = cpal::StreamConfig {
			buffer_size,
			..supported.config()
		};

		let pump = Pump::new(sink, frames_per_buffer as usize, device_rate)?;
		let channels = usize::from(format.channels);

		// Build the audio stream.
		let stream = match supported.sample_format() {
			SampleFormat::I16 => Self::build::<i16, S>(&device, &config, pump, channels, notifier)?,
			SampleFormat::I32 => Self::build::<i32, S>(&device, &config, pump, channels, notifier)?,
			SampleFormat::U16 => Self::build::<u16, S>(&device, &config, pump, channels, notifier)?,
			SampleFormat::F32 => Self::build::<f32, S>(&device, &config, pump, channels, notifier)?,
			SampleFormat::F64 => Self::build::<f64, S>(&device, &config, pump, channels, notifier)?,
			_ => return Err(OutputError::InvalidFormat),
		};

		// Streams may start playing on creation on some platforms.
		stream.pause()?;

		Ok(Self {
			stream,
			format,
			device: name,
			playing: false,
		})
	}

	fn play(&mut self) -> Result<(), OutputError> {
		debug2!("AudioOutput - play()");
		self.stream.play()?;
		self.playing = true;
		Ok(())
	}

	fn pause(&mut self) -> Result<(), OutputError> {
		debug2!("AudioOutput - pause()");
		self.stream.pause()?;
		self.playing = false;
		Ok(())
	}

	fn is_playing(&self) -> bool {
		self.playing
	}

	fn format(&self) -> StreamFormat {
		self.format
	}

	fn device(&self) -> &str {
		&self.device
	}

	fn devices() -> Result<Vec<OutputDevice>, OutputError> {
		let host = cpal::default_host();
		let default = host.default_output_device().and_then(|d| d.name().ok());

		let mut devices = Vec::new();
		for device in host.output_devices()? {
			let Ok(name) = device.name() else {
				continue;
			};
			devices.push(OutputDevice {
				is_default: default.as_deref() == Some(name.as_str()),
				id: name.clone(),
				name,
			});
		}

		sort_devices(&mut devices);
		Ok(devices)
	}
}

//----------------------------------------------------------------------------------------------- Error re-map
impl From<cpal::DefaultStreamConfigError> for OutputError {
	fn from(error: cpal::DefaultStreamConfigError) -> Self {
		use cpal::DefaultStreamConfigError as E;
		match error {
			E::DeviceNotAvailable => Self::DeviceUnavailable,
			E::StreamTypeNotSupported => Self::InvalidFormat,
			E::BackendSpecific { err } => Self::Unknown(Cow::Owned(err.description)),
		}
	}
}

impl From<cpal::SupportedStreamConfigsError> for OutputError {
	fn from(error: cpal::SupportedStreamConfigsError) -> Self {
		use cpal::SupportedStreamConfigsError as E;
		match error {
			E::DeviceNotAvailable => Self::DeviceUnavailable,
			E::InvalidArgument => Self::InvalidSpec,
			E::BackendSpecific { err } => Self::Unknown(Cow::Owned(err.description)),
		}
	}
}

impl From<cpal::StreamError> for OutputError {
	fn from(error: cpal::StreamError) -> Self {
		use cpal::StreamError as E;
		match error {
			E::DeviceNotAvailable => Self::DeviceUnavailable,
			E::BackendSpecific { err } => Self::Unknown(Cow::Owned(err.description)),
		}
	}
}

impl From<cpal::BuildStreamError> for OutputError {
	fn from(error: cpal::BuildStreamError) -> Self {
		use cpal::BuildStreamError as E;
		match error {
			E::DeviceNotAvailable | E::InvalidArgument | E::StreamIdOverflow => Self::DeviceUnavailable,
			E::StreamConfigNotSupported => Self::InvalidFormat,
			E::BackendSpecific { err } => Self::Unknown(Cow::Owned(err.description)),
		}
	}
}

impl From<cpal::PlayStreamError> for OutputError {
	fn from(error: cpal::PlayStreamError) -> Self {
		use cpal::PlayStreamError as E;
		match error {
			E::DeviceNotAvailable => Self::DeviceUnavailable,
			E::BackendSpecific { err } => Self::Unknown(Cow::Owned(err.description)),
		}
	}
}

impl From<cpal::PauseStreamError> for OutputError {
	fn from(error: cpal::PauseStreamError) -> Self {
		use cpal::PauseStreamError as E;
		match error {
			E::DeviceNotAvailable => Self::DeviceUnavailable,
			E::BackendSpecific { err } => Self::Unknown(Cow::Owned(err.description)),
		}
	}
}

impl From<cpal::DevicesError> for OutputError {
	fn from(error: cpal::DevicesError) -> Self {
		use cpal::DevicesError as E;
		match error {
			E::BackendSpecific { err } => Self::Unknown(Cow::Owned(err.description)),
		}
	}
}

impl From<cpal::DeviceNameError> for OutputError {
	fn from(error: cpal::DeviceNameError) -> Self {
		use cpal::DeviceNameError as E;
		match error {
			E::BackendSpecific { err } => Self::Unknown(Cow::Owned(err.description)),
		}
	}
}
