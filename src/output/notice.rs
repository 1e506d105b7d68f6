//! Notices sent from an output stream to the engine.

//---------------------------------------------------------------------------------------------------- use
use crossbeam::channel::Sender;
use crate::{
	error::OutputError,
	macros::try_send_or_drop,
};

//---------------------------------------------------------------------------------------------------- Notice
/// What happened to a stream.
#[derive(Clone,Debug,PartialEq,Eq)]
pub(crate) enum NoticeKind {
	/// The sink completed, the stream can be dropped.
	Finished,
	/// The backend reported an error, the stream is probably dead.
	Error(OutputError),
}

/// A [`NoticeKind`] tagged with the stream it came from.
///
/// Streams are numbered by the engine, a notice from a stream
/// that has since been replaced is stale and ignored.
#[derive(Clone,Debug,PartialEq,Eq)]
pub(crate) struct Notice {
	pub(crate) stream: u64,
	pub(crate) kind: NoticeKind,
}

//---------------------------------------------------------------------------------------------------- Notifier
/// Handed to a backend on open, used from its audio/error threads.
#[derive(Clone,Debug)]
pub(crate) struct Notifier {
	stream: u64,
	sender: Sender<Notice>,
}

impl Notifier {
	pub(crate) const fn new(stream: u64, sender: Sender<Notice>) -> Self {
		Self { stream, sender }
	}

	pub(crate) fn finished(&self) {
		try_send_or_drop!(self.sender, Notice { stream: self.stream, kind: NoticeKind::Finished });
	}

	pub(crate) fn error(&self, error: OutputError) {
		try_send_or_drop!(self.sender, Notice { stream: self.stream, kind: NoticeKind::Error(error) });
	}
}
