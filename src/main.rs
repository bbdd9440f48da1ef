//! llm-cells - Split streaming LLM output into notebook cells.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::io::AsyncReadExt;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use llm_cells::cells::{BotResponse, CellCollector, CellWriter, ParseError};
use llm_cells::channel::ByteReader;
use llm_cells::config::{Config, ConfigError, ConfigLoader};
use llm_cells::display::{self, TerminalSink};
use llm_cells::process::{probe_version, stream_cells, GeneratorCommand, PipeError};

#[derive(Parser)]
#[command(
    name = "llm-cells",
    about = "Split streaming LLM output into notebook cells",
    version
)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Config file to use instead of the default search paths.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a prompt to the generator and print its reply as cells.
    Ask {
        /// The prompt. Read from stdin when omitted.
        prompt: Option<String>,
        /// Model to request.
        #[arg(short, long)]
        model: Option<String>,
        /// Print the cells as JSON once the reply is complete.
        #[arg(long, conflicts_with = "raw")]
        json: bool,
        /// Print `%type` header lines instead of colored labels.
        #[arg(long)]
        raw: bool,
    },
    /// Split saved generator output into cells.
    Parse {
        /// File to read. Read from stdin when omitted.
        file: Option<PathBuf>,
        /// Print the cells as JSON.
        #[arg(long, conflicts_with = "raw")]
        json: bool,
        /// Print `%type` header lines instead of colored labels.
        #[arg(long)]
        raw: bool,
        /// Speaker cue added to prose that lacks one.
        #[arg(long)]
        cue: Option<String>,
    },
    /// Check that the generator command runs.
    Probe,
}

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Pipe(#[from] PipeError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode cells: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    fn is_cancelled(&self) -> bool {
        match self {
            Self::Pipe(e) => e.is_cancelled(),
            Self::Parse(e) => e.is_cancelled(),
            _ => false,
        }
    }
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_config(path: Option<PathBuf>) -> Result<Config, ConfigError> {
    let loader = path.map_or_else(ConfigLoader::new, ConfigLoader::with_path);
    loader.load()
}

fn print_json(cells: &CellCollector) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(cells.cells())?);
    Ok(())
}

async fn read_stdin() -> Result<String, std::io::Error> {
    let mut input = String::new();
    tokio::io::stdin().read_to_string(&mut input).await?;
    Ok(input)
}

async fn ask(
    config: &Config,
    prompt: Option<String>,
    model: Option<String>,
    json: bool,
    raw: bool,
) -> Result<(), AppError> {
    let prompt = match prompt {
        Some(prompt) => prompt,
        None => read_stdin().await?,
    };
    let mut command = GeneratorCommand::from_config(&config.generator);
    if let Some(model) = model {
        command = command.model(model);
    }
    let cue = &config.cells.default_cue;

    tracing::info!(command = command.path(), "Asking generator");
    if json {
        let cells = stream_cells(&command, &prompt, cue, CellCollector::new()).await?;
        print_json(&cells)
    } else {
        stream_cells(&command, &prompt, cue, TerminalSink::stdout(raw)).await?;
        Ok(())
    }
}

async fn parse(
    config: &Config,
    file: Option<PathBuf>,
    cue: Option<String>,
    json: bool,
    raw: bool,
) -> Result<(), AppError> {
    let cue = cue.unwrap_or_else(|| config.cells.default_cue.clone());
    if json {
        let mut sink = CellCollector::new();
        parse_into(file, cue, &mut sink).await?;
        print_json(&sink)
    } else {
        parse_into(file, cue, &mut TerminalSink::stdout(raw)).await
    }
}

async fn parse_into<W>(file: Option<PathBuf>, cue: String, sink: &mut W) -> Result<(), AppError>
where
    W: CellWriter,
{
    match file {
        Some(path) => {
            tracing::debug!(path = %path.display(), "Parsing file");
            let file = tokio::fs::File::open(&path).await?;
            BotResponse::with_cue(ByteReader::new(file), cue)
                .copy(sink)
                .await?;
        }
        None => {
            BotResponse::with_cue(ByteReader::new(tokio::io::stdin()), cue)
                .copy(sink)
                .await?;
        }
    }
    Ok(())
}

async fn probe(config: &Config) -> Result<(), AppError> {
    let generator = &config.generator;
    let timeout = Duration::from_secs(generator.probe_timeout_secs);
    match probe_version(&generator.command, &generator.version_flag, timeout).await {
        Ok(version) => {
            display::print_probe(&generator.command, Some(&version));
            Ok(())
        }
        Err(e) => {
            display::print_probe(&generator.command, None);
            Err(e.into())
        }
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let config = load_config(cli.config)?;

    match cli.command {
        Commands::Ask {
            prompt,
            model,
            json,
            raw,
        } => ask(&config, prompt, model, json, raw).await,
        Commands::Parse {
            file,
            json,
            raw,
            cue,
        } => parse(&config, file, cue, json, raw).await,
        Commands::Probe => probe(&config).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_cancelled() => {
            tracing::debug!("Output consumer went away");
            ExitCode::SUCCESS
        }
        Err(e) => {
            display::print_error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}
