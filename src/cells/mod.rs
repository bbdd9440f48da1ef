//! Cell model, sink contract and the streaming cell splitter.

mod collector;
mod parser;
mod types;
mod writer;

pub use collector::*;
pub use parser::*;
pub use types::*;
pub use writer::*;
