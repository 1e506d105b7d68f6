//! General errors that can occur.

mod output;
pub use output::OutputError;
