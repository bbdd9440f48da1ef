//! Generator command-line construction.

use crate::config::GeneratorConfig;

/// Builder for configuring generator process arguments.
#[derive(Debug, Clone, Default)]
pub struct GeneratorCommand {
    path: String,
    system_prompt: String,
    model: Option<String>,
    stop_sequence: Option<String>,
    extra_args: Vec<String>,
}

impl GeneratorCommand {
    /// Create a new builder for the binary at `path`.
    #[must_use]
    pub fn new(path: impl Into<String>, system_prompt: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            system_prompt: system_prompt.into(),
            ..Default::default()
        }
    }

    /// Create a builder from the `[generator]` configuration table.
    #[must_use]
    pub fn from_config(config: &GeneratorConfig) -> Self {
        let mut command = Self::new(&config.command, &config.system_prompt)
            .extra_args(config.extra_args.iter().map(String::as_str));
        if let Some(model) = &config.model {
            command = command.model(model);
        }
        if let Some(stop) = &config.stop_sequence {
            command = command.stop_sequence(stop);
        }
        command
    }

    /// Select the model.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Stop generating at `stop`.
    #[must_use]
    pub fn stop_sequence(mut self, stop: impl Into<String>) -> Self {
        self.stop_sequence = Some(stop.into());
        self
    }

    /// Append arbitrary flags after the built-in ones.
    #[must_use]
    pub fn extra_args<'a>(mut self, args: impl IntoIterator<Item = &'a str>) -> Self {
        self.extra_args
            .extend(args.into_iter().map(ToString::to_string));
        self
    }

    /// Get the binary path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Get the system prompt.
    #[must_use]
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Build the command-line arguments.
    #[must_use]
    pub fn build_args(&self) -> Vec<String> {
        let mut args = vec!["--system".to_string(), self.system_prompt.clone()];

        if let Some(model) = &self.model {
            args.push("--model".to_string());
            args.push(model.clone());
        }

        if let Some(stop) = &self.stop_sequence {
            args.push("--stop".to_string());
            args.push(stop.clone());
        }

        args.extend(self.extra_args.iter().cloned());
        args
    }
}
