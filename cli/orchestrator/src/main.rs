//! irbridge command-line driver
//!
//! Reads inputs from files (or stdin for `-`), calls one facade operation,
//! and writes the engine's result buffer to stdout or `--output`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use config::{BackendKind, Config, ConfigError};
use encoding::EncodingError;
use facade::{
    BindingError, BindingFacade, GraphImportOptions, ResultBuffer, SavedModelV1Options, Text,
    TextFunction, TosaOptions,
};

#[derive(Debug)]
enum CliError {
    Config(ConfigError),
    Binding(BindingError),
    Io(io::Error),
}

/// Display implementation for CliError.
impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Config(e) => write!(f, "configuration error: {}", e),
            CliError::Binding(e) => write!(f, "{}", e),
            CliError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

/// Error trait implementation for CliError.
impl std::error::Error for CliError {}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self { CliError::Config(e) }
}

impl From<BindingError> for CliError {
    fn from(e: BindingError) -> Self { CliError::Binding(e) }
}

impl From<EncodingError> for CliError {
    fn from(e: EncodingError) -> Self { CliError::Binding(BindingError::Encoding(e)) }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self { CliError::Io(e) }
}

/// Command-line interface configuration for irbridge.
#[derive(Parser, Debug)]
#[command(
    name = "irbridge",
    about = "Drive the compiler engine's import and conversion entry points",
    version = umbrella::irbridge_meta::VERSION
)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
    /// Configuration file (default: <config dir>/irbridge/config.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Engine backend, overriding the configuration (`command` or `dry-run`)
    #[arg(long, global = true)]
    engine: Option<BackendKind>,
    /// Write the result here instead of stdout
    #[arg(long, short, global = true)]
    output: Option<PathBuf>,
    /// Print location info in the emitted IR
    #[arg(long, global = true)]
    debug_info: bool,
    /// Debug-level logging
    #[arg(long, short, global = true)]
    verbose: bool,
}

/// Available irbridge commands, one per engine entry point.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Import a serialized graph definition
    ImportGraphdef {
        /// Graph definition text file
        input: PathBuf,
        /// Pass pipeline to run after import
        #[arg(long)]
        pass_pipeline: Option<String>,
        /// Input node name (repeatable)
        #[arg(long = "input-name")]
        input_names: Vec<String>,
        /// Input data type (repeatable)
        #[arg(long = "input-data-type")]
        input_data_types: Vec<String>,
        /// Input shape, e.g. `1x224x224x3` (repeatable)
        #[arg(long = "input-data-shape")]
        input_data_shapes: Vec<String>,
        /// Output node name (repeatable)
        #[arg(long = "output-name")]
        output_names: Vec<String>,
    },
    /// Import a textual function definition
    ImportFunction {
        /// Function definition text file
        input: PathBuf,
        /// Pass pipeline to run after import
        #[arg(long)]
        pass_pipeline: Option<String>,
    },
    /// Convert a saved model's object graph
    ConvertSavedModel {
        /// Saved model directory
        saved_model_path: PathBuf,
        /// Exported-name filter
        #[arg(long)]
        exported_names: Option<String>,
    },
    /// Convert a legacy saved model, lite variant
    ConvertSavedModelV1Lite {
        /// Saved model directory
        saved_model_path: PathBuf,
        /// Exported-name filter
        #[arg(long)]
        exported_names: Option<String>,
        /// Meta-graph tag filter
        #[arg(long)]
        tags: Option<String>,
        /// Upgrade legacy graph constructs
        #[arg(long, default_value_t = true, action = ArgAction::Set)]
        upgrade_legacy: bool,
    },
    /// Convert a legacy saved model
    ConvertSavedModelV1 {
        /// Saved model directory
        saved_model_path: PathBuf,
        /// Exported-name filter
        #[arg(long)]
        exported_names: Option<String>,
        /// Meta-graph tag filter
        #[arg(long)]
        tags: Option<String>,
        /// Lift variables into function arguments
        #[arg(long, default_value_t = true, action = ArgAction::Set)]
        lift_variables: bool,
        /// Keep variables in the session initializer
        #[arg(long)]
        include_variables_in_initializers: bool,
        /// Upgrade legacy graph constructs
        #[arg(long, default_value_t = true, action = ArgAction::Set)]
        upgrade_legacy: bool,
    },
    /// Run a pass pipeline over IR text
    RunPassPipeline {
        /// IR text file
        input: PathBuf,
        /// Pass pipeline description
        #[arg(long)]
        pass_pipeline: String,
    },
    /// Write IR text as bytecode
    WriteBytecode {
        /// IR text file
        input: PathBuf,
        /// Destination bytecode file
        destination: PathBuf,
    },
    /// Convert a flat-buffer model to TOSA bytecode
    TfliteToTosa {
        /// Source flat-buffer model
        flatbuffer: PathBuf,
        /// Destination bytecode file
        bytecode: PathBuf,
        /// Store large constants outside the bytecode
        #[arg(long)]
        use_external_constant: bool,
        /// Input array name, in order (repeatable)
        #[arg(long = "input-array")]
        input_arrays: Vec<String>,
        /// Output array name, in order (repeatable)
        #[arg(long = "output-array")]
        output_arrays: Vec<String>,
    },
}

/// Main entry point for the irbridge application.
fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("irbridge: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = Config::load_or_default(cli.config.as_deref())?;
    logging::init(&config.logging.level, cli.verbose);

    if let Some(backend) = cli.engine {
        config.engine.backend = backend;
    }
    let show_debug_info = cli.debug_info || config.defaults.show_debug_info;
    tracing::debug!(backend = %config.engine.backend, show_debug_info, "configuration loaded");
    let facade = BindingFacade::new(command::engine_from_config(&config.engine));

    let result = execute(&facade, cli.cmd, &config, show_debug_info)?;
    emit(&result, cli.output.as_deref())
}

fn execute(
    facade: &BindingFacade,
    cmd: Commands,
    config: &Config,
    show_debug_info: bool,
) -> Result<ResultBuffer, CliError> {
    let buffer = match cmd {
        Commands::ImportGraphdef {
            input,
            pass_pipeline,
            input_names,
            input_data_types,
            input_data_shapes,
            output_names,
        } => {
            let graphdef = read_input(&input)?;
            let pass_pipeline = pass_pipeline.or_else(|| config.defaults.pass_pipeline.clone());
            let options = GraphImportOptions {
                input_names: present(input_names),
                input_data_types: present(input_data_types),
                input_data_shapes: present(input_data_shapes),
                output_names: present(output_names),
            };
            facade.import_graphdef(&graphdef, optional(&pass_pipeline), show_debug_info, &options)?
        }
        Commands::ImportFunction { input, pass_pipeline } => {
            let function = TextFunction::new(read_utf8(&input, "function_def")?);
            let pass_pipeline = pass_pipeline.or_else(|| config.defaults.pass_pipeline.clone());
            facade.import_function(&function, optional(&pass_pipeline), show_debug_info)?
        }
        Commands::ConvertSavedModel { saved_model_path, exported_names } => facade.convert_saved_model(
            &saved_model_path,
            optional(&exported_names),
            show_debug_info,
        )?,
        Commands::ConvertSavedModelV1Lite { saved_model_path, exported_names, tags, upgrade_legacy } =>
            facade.convert_saved_model_v1_lite(
                &saved_model_path,
                optional(&exported_names),
                optional(&tags),
                upgrade_legacy,
                show_debug_info,
            )?,
        Commands::ConvertSavedModelV1 {
            saved_model_path,
            exported_names,
            tags,
            lift_variables,
            include_variables_in_initializers,
            upgrade_legacy,
        } => {
            let options =
                SavedModelV1Options { lift_variables, include_variables_in_initializers, upgrade_legacy };
            facade.convert_saved_model_v1(
                &saved_model_path,
                optional(&exported_names),
                optional(&tags),
                &options,
                show_debug_info,
            )?
        }
        Commands::RunPassPipeline { input, pass_pipeline } => {
            let mlir_txt = read_input(&input)?;
            facade.run_pass_pipeline(&mlir_txt, &pass_pipeline, show_debug_info)?
        }
        Commands::WriteBytecode { input, destination } => {
            let mlir_txt = read_input(&input)?;
            facade.write_bytecode(&destination, &mlir_txt)?
        }
        Commands::TfliteToTosa {
            flatbuffer,
            bytecode,
            use_external_constant,
            input_arrays,
            output_arrays,
        } => {
            let options = TosaOptions {
                use_external_constant,
                ordered_input_arrays: present(input_arrays),
                ordered_output_arrays: present(output_arrays),
            };
            facade.tflite_to_tosa_bytecode(&flatbuffer, &bytecode, &options)?
        }
    };
    Ok(buffer)
}

/// Repeated flags given zero times mean "not supplied".
fn present(items: Vec<String>) -> Option<Vec<String>> {
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

fn optional(value: &Option<String>) -> Option<Text<'_>> { value.as_deref().map(Text::from) }

/// Raw bytes of `path`, or of stdin for `-`.
fn read_input(path: &Path) -> Result<Vec<u8>, CliError> {
    if path == Path::new("-") {
        let mut buf = Vec::new();
        io::stdin().lock().read_to_end(&mut buf)?;
        return Ok(buf);
    }
    Ok(std::fs::read(path)?)
}

fn read_utf8(path: &Path, param: &'static str) -> Result<String, CliError> {
    String::from_utf8(read_input(path)?).map_err(|e| {
        CliError::from(EncodingError { param, valid_up_to: e.utf8_error().valid_up_to() })
    })
}

fn emit(result: &ResultBuffer, output: Option<&Path>) -> Result<(), CliError> {
    match output {
        Some(path) => std::fs::write(path, result.as_bytes())?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(result.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}
