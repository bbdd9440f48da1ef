//! Configuration types.

use serde::{Deserialize, Serialize};

use crate::cells::DEFAULT_CUE;
use crate::process::{DEFAULT_PROBE_TIMEOUT, DEFAULT_VERSION_FLAG};

/// System prompt describing the cell wire format to the generator.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant writing into a notebook. \
Reply in markdown. To start a code cell, write a line containing only %python, \
%typescript, %javascript or %shell. To return to prose, write a line containing \
only %markdown.";

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How to run the generator.
    pub generator: GeneratorConfig,
    /// How to split its output into cells.
    pub cells: CellsConfig,
}

/// Configuration for the generator command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Binary to run.
    pub command: String,
    /// System prompt, always passed with `--system`.
    pub system_prompt: String,
    /// Model passed with `--model`.
    pub model: Option<String>,
    /// Stop sequence passed with `--stop`.
    pub stop_sequence: Option<String>,
    /// Extra flags appended after the built-in ones.
    pub extra_args: Vec<String>,
    /// Flag used to probe that the command runs.
    pub version_flag: String,
    /// Deadline for the version probe, in seconds.
    pub probe_timeout_secs: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            command: "llm".to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            model: None,
            stop_sequence: None,
            extra_args: Vec::new(),
            version_flag: DEFAULT_VERSION_FLAG.to_string(),
            probe_timeout_secs: DEFAULT_PROBE_TIMEOUT.as_secs(),
        }
    }
}

/// Configuration for the cell splitter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellsConfig {
    /// Speaker cue added to prose that lacks one.
    pub default_cue: String,
}

impl Default for CellsConfig {
    fn default() -> Self {
        Self {
            default_cue: DEFAULT_CUE.to_string(),
        }
    }
}
