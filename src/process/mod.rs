//! Generator process spawning, piping and probing.

mod command;
mod error;
mod generate;
mod pipe;
mod probe;

pub use command::*;
pub use error::*;
pub use generate::*;
pub use pipe::*;
pub use probe::*;
