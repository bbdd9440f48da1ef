//! llm-cells - Split streaming LLM output into notebook cells.

pub mod cells;
pub mod channel;
pub mod config;
pub mod display;
pub mod process;
pub mod scanner;
