//! `Engine` tests, driven by the dummy backend in real time.

//---------------------------------------------------------------------------------------------------- Use
use std::{sync::Arc,time::{Duration,Instant}};
use crossbeam::channel::Receiver;
use pretty_assertions::assert_eq;
use crate::{
	config::Config,
	engine::Engine,
	error::OutputError,
	event::Event,
	fifo::{AudioFifo,StreamFormat,WritePolicy},
	output::{Notice,NoticeKind},
	signal::Volume,
	state::PlaybackState,
	tests::{frames_of,is_subsequence},
};

//---------------------------------------------------------------------------------------------------- Helpers
const STEREO: StreamFormat = StreamFormat::new(48_000, 2);
const TIMEOUT: Duration = Duration::from_secs(10);

/// 60ms callbacks, 60ms unmute threshold.
fn engine() -> (Engine, Receiver<Event>) {
	let engine = Engine::new(Config {
		unmute_threshold_ms: 60,
		..Config::DEFAULT
	});
	let events = engine.events();
	(engine, events)
}

/// A FIFO holding `ms` of a constant tone.
fn fifo(format: StreamFormat, ms: usize) -> Arc<AudioFifo> {
	let fifo = Arc::new(AudioFifo::new(WritePolicy::Drop));
	fifo.set_format(format);
	let frame: Vec<i16> = (0..format.channels).map(|c| 1000 + i16::from(c)).collect();
	assert!(!fifo.write_samples(&frames_of(&frame, format.frames_for_ms(ms))).is_dropped());
	fifo
}

/// Poll the engine and collect events until `want` is seen.
fn until(engine: &mut Engine, events: &Receiver<Event>, want: &Event) -> Vec<Event> {
	let deadline = Instant::now() + TIMEOUT;
	let mut seen = vec![];

	while Instant::now() < deadline {
		engine.wait(Duration::from_millis(5));
		while let Ok(event) = events.try_recv() {
			let done = &event == want;
			seen.push(event);
			if done {
				return seen;
			}
		}
	}

	panic!("timed out waiting for {want:?}, seen: {seen:?}");
}

fn playing() -> Event {
	Event::StateChanged(PlaybackState::Playing)
}

fn muted() -> Event {
	Event::StateChanged(PlaybackState::Muted)
}

//---------------------------------------------------------------------------------------------------- Tests
#[test]
fn start_unmutes() {
	let (mut engine, events) = engine();
	assert!(!engine.is_running());

	engine.start(fifo(STEREO, 300)).unwrap();
	assert!(engine.is_running());
	assert_eq!(engine.format(), Some(STEREO));

	let seen = until(&mut engine, &events, &playing());
	assert_eq!(seen, [Event::StateChanged(PlaybackState::Unmuting), playing()]);
	assert_eq!(engine.state(), PlaybackState::Playing);
}

#[test]
fn start_invalid_format() {
	let (mut engine, _events) = engine();
	let fifo = Arc::new(AudioFifo::new(WritePolicy::Drop));
	fifo.set_format(StreamFormat::new(0, 2));

	assert_eq!(engine.start(fifo), Err(OutputError::InvalidSampleRate));
	assert!(!engine.is_running());
}

#[test]
fn stop() {
	let (mut engine, events) = engine();
	engine.start(fifo(STEREO, 800)).unwrap();
	until(&mut engine, &events, &playing());

	engine.stop();
	let seen = until(&mut engine, &events, &Event::Stopped);
	assert!(is_subsequence(&[Event::StateChanged(PlaybackState::Muting), muted(), Event::Stopped], &seen), "{seen:?}");
	assert!(!engine.is_running());
	assert_eq!(engine.format(), None);

	// Nothing to stop.
	engine.stop();
	assert!(!engine.wait(Duration::from_millis(50)));
}

#[test]
fn restart_new_format() {
	let (mut engine, events) = engine();
	engine.start(fifo(STEREO, 800)).unwrap();
	until(&mut engine, &events, &playing());

	let mono = StreamFormat::new(32_000, 1);
	engine.restart(fifo(mono, 800)).unwrap();

	let seen = until(&mut engine, &events, &Event::Restarted(mono));
	assert!(is_subsequence(&[muted(), Event::Restarted(mono)], &seen), "{seen:?}");
	assert_eq!(engine.format(), Some(mono));

	let seen = until(&mut engine, &events, &playing());
	assert_eq!(seen, [Event::StateChanged(PlaybackState::Unmuting), playing()]);
}

#[test]
fn restart_without_stream_starts() {
	let (mut engine, events) = engine();
	engine.restart(fifo(STEREO, 300)).unwrap();
	assert!(engine.is_running());
	until(&mut engine, &events, &playing());
}

#[test]
fn underrun_mutes() {
	let (mut engine, events) = engine();
	engine.start(fifo(STEREO, 100)).unwrap();
	until(&mut engine, &events, &playing());

	// Nothing else is written, the stream stays up.
	until(&mut engine, &events, &muted());
	assert!(engine.is_running());
	assert_eq!(engine.state(), PlaybackState::Muted);
}

#[test]
fn mute_unmute() {
	let (mut engine, events) = engine();
	engine.start(fifo(STEREO, 900)).unwrap();
	until(&mut engine, &events, &playing());

	engine.mute(true);
	assert!(engine.is_muted());
	let seen = until(&mut engine, &events, &muted());
	assert_eq!(seen, [Event::StateChanged(PlaybackState::Muting), muted()]);

	engine.mute(false);
	assert!(!engine.is_muted());
	until(&mut engine, &events, &playing());
}

#[test]
fn callback_covers_a_fade() {
	let (engine, _events) = engine();
	// 60ms
	assert_eq!(engine.frames_per_buffer(STEREO), 2880);
	assert_eq!(engine.frames_per_buffer(StreamFormat::new(32_000, 1)), 1920);

	let mut engine = Engine::new(Config { frames_per_buffer: Some(480), ..Config::DEFAULT });
	assert_eq!(engine.frames_per_buffer(STEREO), 2880);
	engine.config.frames_per_buffer = Some(4800);
	assert_eq!(engine.frames_per_buffer(STEREO), 4800);
}

#[test]
fn volume() {
	let (engine, _events) = engine();
	assert_eq!(engine.volume(), Volume::MAX);

	engine.set_volume(50);
	assert!((engine.volume().inner() - 0.150_515).abs() < 1e-4);

	engine.set_volume(0);
	assert_eq!(engine.volume(), Volume::MIN);

	engine.set_linear_volume(Volume::new(0.25));
	assert_eq!(engine.volume(), Volume::new(0.25));
}

#[test]
fn stale_notices_ignored() {
	let (mut engine, events) = engine();
	engine.start(fifo(STEREO, 300)).unwrap();
	let stream = engine.stream;

	engine.to_engine.send(Notice { stream: stream - 1, kind: NoticeKind::Finished }).unwrap();
	engine.to_engine.send(Notice { stream: stream + 1, kind: NoticeKind::Error(OutputError::DeviceUnavailable) }).unwrap();
	assert_eq!(engine.poll(), 2);

	assert!(engine.is_running());
	assert_eq!(engine.stream, stream);
	assert!(!events.try_iter().any(|e| matches!(e, Event::Error(_))));
}

#[test]
fn device_error_recovers() {
	let (mut engine, events) = engine();
	engine.start(fifo(STEREO, 300)).unwrap();
	let stream = engine.stream;

	engine.to_engine.send(Notice { stream, kind: NoticeKind::Error(OutputError::DeviceUnavailable) }).unwrap();
	assert_eq!(engine.poll(), 1);

	assert!(engine.is_running());
	assert_eq!(engine.stream, stream + 1);
	until(&mut engine, &events, &playing());
}

#[test]
fn device_error_during_restart() {
	let (mut engine, events) = engine();
	engine.start(fifo(STEREO, 300)).unwrap();
	let stream = engine.stream;

	// A restart the stream hasn't acted on yet.
	let mono = StreamFormat::new(32_000, 1);
	let new = fifo(mono, 300);
	engine.pending = Some(Arc::clone(&new));

	engine.to_engine.send(Notice { stream, kind: NoticeKind::Error(OutputError::DeviceUnavailable) }).unwrap();
	assert_eq!(engine.poll(), 1);

	assert!(engine.is_running());
	assert!(engine.pending.is_none());
	assert_eq!(engine.format(), Some(mono));
	assert!(engine.fifo.as_ref().is_some_and(|f| Arc::ptr_eq(f, &new)));
	assert!(events.try_iter().any(|e| e == Event::Restarted(mono)));
	until(&mut engine, &events, &playing());
}

#[test]
fn device_error_without_recovery() {
	let mut engine = Engine::new(Config {
		recover_device: false,
		..Config::DEFAULT
	});
	let events = engine.events();
	engine.start(fifo(STEREO, 300)).unwrap();
	let stream = engine.stream;

	engine.to_engine.send(Notice { stream, kind: NoticeKind::Error(OutputError::DeviceUnavailable) }).unwrap();
	engine.poll();

	assert!(!engine.is_running());
	assert!(events.try_iter().any(|e| e == Event::Error(OutputError::DeviceUnavailable)));
}

#[test]
fn unexpected_finish_recovers() {
	let (mut engine, _events) = engine();
	engine.start(fifo(STEREO, 300)).unwrap();
	let stream = engine.stream;

	engine.to_engine.send(Notice { stream, kind: NoticeKind::Finished }).unwrap();
	engine.poll();

	assert!(engine.is_running());
	assert_eq!(engine.stream, stream + 1);
}

#[test]
fn unknown_device_falls_back() {
	let (mut engine, events) = engine();
	engine.start(fifo(STEREO, 300)).unwrap();
	let stream = engine.stream;

	engine.set_device("hdmi").unwrap();
	assert_eq!(engine.device(), None);
	assert!(events.try_iter().any(|e| e == Event::DeviceChanged("dummy".into())));

	// Already on the default device, no restart.
	assert!(engine.pending.is_none());
	assert_eq!(engine.stream, stream);
}

#[test]
fn set_device_restarts() {
	let (mut engine, events) = engine();
	engine.start(fifo(STEREO, 300)).unwrap();
	until(&mut engine, &events, &playing());

	engine.set_device("dummy").unwrap();
	assert_eq!(engine.device(), Some("dummy"));
	until(&mut engine, &events, &Event::Restarted(STEREO));
	assert!(engine.is_running());
}

#[test]
fn refresh_devices_falls_back() {
	let mut engine = Engine::new(Config {
		device: Some("usb".into()),
		..Config::DEFAULT
	});
	let events = engine.events();

	let devices = engine.refresh_devices().unwrap();
	assert_eq!(devices.len(), 1);
	assert_eq!(engine.device(), None);

	let seen: Vec<Event> = events.try_iter().collect();
	assert_eq!(seen, [Event::Devices(devices), Event::DeviceChanged("dummy".into())]);
}

#[test]
fn drop_while_running() {
	let (mut engine, events) = engine();
	engine.start(fifo(STEREO, 300)).unwrap();
	until(&mut engine, &events, &playing());
	drop(engine);
}
