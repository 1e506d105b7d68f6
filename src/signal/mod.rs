//! Control signals: volume and mute/stop/restart requests.

mod volume;
pub use volume::Volume;
pub(crate) use volume::AtomicVolume;

mod request;
pub use request::Request;
pub(crate) use request::AtomicRequest;
