//! Configuration defaults.

//---------------------------------------------------------------------------------------------------- Use
use crate::render::fade::FADE_TIME_MS;

//---------------------------------------------------------------------------------------------------- Constants
/// FIFO fill level that must be exceeded before a muted stream unmutes.
///
/// Six fade windows.
pub(crate) const DEFAULT_UNMUTE_THRESHOLD_MS: usize = 6 * FADE_TIME_MS;

/// Capacity of the [`Event`](crate::Event) channel.
pub(crate) const DEFAULT_EVENT_CAPACITY: usize = 64;

//---------------------------------------------------------------------------------------------------- Tests
#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_unmute_threshold() {
		assert_eq!(DEFAULT_UNMUTE_THRESHOLD_MS, 360);
	}
}
