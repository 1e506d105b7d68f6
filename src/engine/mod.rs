//! The control-thread facade: [`Engine`].

mod engine;
pub use engine::Engine;

mod functions;
mod stream;
mod shutdown;

#[cfg(test)]
mod tests;
