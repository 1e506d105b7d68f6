//! A decoder-to-speaker session: [`Session`] and [`AudioProducer`].

mod session;
pub use session::{AudioProducer,Session};
