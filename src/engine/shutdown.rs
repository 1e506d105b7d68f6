//! `Engine` shutdown.

//---------------------------------------------------------------------------------------------------- Use
use crate::{
	engine::Engine,
	macros::info2,
	signal::Request,
};

//---------------------------------------------------------------------------------------------------- Drop
impl Drop for Engine {
	#[cold]
	#[inline(never)]
	fn drop(&mut self) {
		// Anything still rendering only outputs silence from here on.
		self.shared.request.insert(Request::STOP);
		self.close();
		info2!("Engine - shutdown ... OK");
	}
}
