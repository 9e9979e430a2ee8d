mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cmd::{cmd_model, cmd_resolve, cmd_tasks};
use output::{OutputFormat, Status, print_status};

/// bgraph - Inspect the build model of a multi-project build
#[derive(Parser)]
#[command(name = "bgraph")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable debug logging
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Configure projects one at a time instead of in parallel
  #[arg(long, global = true)]
  sequential: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Show projects, configurations, and components
  Model {
    /// Path to the build description (default: build.json)
    #[arg(default_value = "build.json")]
    file: PathBuf,

    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
  },

  /// Resolve the transitive dependency set of a configuration
  Resolve {
    /// Path to the build description
    file: PathBuf,

    /// Project path, e.g. `:app`
    project: String,

    /// Configuration name, e.g. `runtimeClasspath`
    configuration: String,

    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
  },

  /// Show the realized task graph in execution order
  Tasks {
    /// Path to the build description (default: build.json)
    #[arg(default_value = "build.json")]
    file: PathBuf,

    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
  },
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  let filter = if cli.verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
  };
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let parallel = !cli.sequential;
  let result = match cli.command {
    Commands::Model { file, format } => cmd_model(&file, parallel, format),
    Commands::Resolve {
      file,
      project,
      configuration,
      format,
    } => cmd_resolve(&file, &project, &configuration, parallel, format),
    Commands::Tasks { file, format } => cmd_tasks(&file, parallel, format),
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      print_status(Status::Failed, &format!("{:#}", err));
      ExitCode::FAILURE
    }
  }
}
