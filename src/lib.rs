//! Discrete-tick simulator of a small real-time kernel: five scheduling
//! policies, an I/O model, interrupt service routines, and RAM-limited
//! swapping, with an immutable snapshot published after every tick.

pub mod config;
pub mod error;
pub mod io;
pub mod kernel;
pub mod logger;

pub use error::SimError;
