//! Command line front-end of the message compiler.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use i18n_message_compiler::emit::JsonManifestEmitter;
use i18n_message_compiler::generate::{
    DEFAULT_INPUT_DIR,
    DEFAULT_OUTPUT_DIR,
};
use i18n_message_compiler::{
    GenerateOptions,
    GenerateOutcome,
    generate,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "i18n-msgc", version, about = "Compile per-locale JSON messages into typed message definitions.")]
struct Cli {
    /// Directory holding config.json and one <locale>.json per language
    #[arg(long, value_name = "DIR", default_value = DEFAULT_INPUT_DIR)]
    input: PathBuf,

    /// Directory receiving the generated artifacts; emptied on every run
    #[arg(long, value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    output: PathBuf,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let options = GenerateOptions { input_dir: cli.input, output_dir: cli.output };
    match generate(&options, &JsonManifestEmitter) {
        Ok(GenerateOutcome::ConfigBootstrapped(path)) => {
            tracing::info!("Edit {} and run again to generate messages", path.display());
            ExitCode::SUCCESS
        }
        Ok(GenerateOutcome::Generated { .. }) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` wins over the `-v` flags.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}
