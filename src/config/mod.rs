//! Configuration for the [`Engine`](crate::Engine).

mod config;
pub use config::Config;

mod constants;
pub(crate) use constants::{
	DEFAULT_EVENT_CAPACITY,
	DEFAULT_UNMUTE_THRESHOLD_MS,
};
