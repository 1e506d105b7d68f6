//! The mute/fade state machine run by the audio thread.

pub(crate) mod fade;

mod shared;
pub(crate) use shared::Shared;

mod renderer;
pub(crate) use renderer::Renderer;
