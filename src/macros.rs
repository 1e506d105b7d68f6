// Global macros for internal dabsink usage.

//---------------------------------------------------------------------------------------------------- Channels
// `try_send` a message on a bounded channel, dropping it if the
// receiver is full or gone.
//
// Used from the real-time audio thread, which must never
// block on a slow (or absent) UI consumer.
macro_rules! try_send_or_drop {
	($channel:expr, $($msg:tt)+) => {
		if $channel.try_send($($msg)+).is_err() {
			$crate::macros::trace2!("channel full or disconnected, message dropped");
		}
	}
}
pub(crate) use try_send_or_drop;

//---------------------------------------------------------------------------------------------------- Logging
// Logs with `log` but only if the log feature is enabled.

macro_rules! error2 {
	($($arg:tt)+) => {{
		#[cfg(feature = "log")]
		::log::error!($($arg)+);
	}};
}
pub(crate) use error2;

macro_rules! warn2 {
	($($arg:tt)+) => {{
		#[cfg(feature = "log")]
		::log::warn!($($arg)+);
	}};
}
pub(crate) use warn2;

macro_rules! info2 {
	($($arg:tt)+) => {{
		#[cfg(feature = "log")]
		::log::info!($($arg)+);
	}};
}
pub(crate) use info2;

macro_rules! debug2 {
	($($arg:tt)+) => {{
		#[cfg(feature = "log")]
		::log::debug!($($arg)+);
	}};
}
pub(crate) use debug2;

macro_rules! trace2 {
	($($arg:tt)+) => {{
		#[cfg(feature = "log")]
		::log::trace!($($arg)+);
	}};
}
pub(crate) use trace2;
