//! Command line entry point for `wsgen`.

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;
use wsgen_core::{GeneratorConfig, generate_from_url, write_output};

const MISSING_TARGET: &str = "Please provide target (http link to AsyncAPI document)";

/// Generate TypeScript declarations from a WebSocket AsyncAPI document.
#[derive(Parser, Debug)]
#[command(name = "wsgen", version)]
pub struct Cli {
    /// URL of the AsyncAPI document to fetch
    #[arg(value_name = "TARGET")]
    pub target: Option<String>,
}

/// Run the CLI on a fresh runtime and return the process exit code.
pub fn run_cli(args: Vec<String>) -> i32 {
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("Failed to create tokio runtime: {err}");
            return 1;
        }
    };

    runtime.block_on(run_cli_async(args))
}

/// Parse `args` and run with the default configuration.
pub async fn run_cli_async(args: Vec<String>) -> i32 {
    match Cli::try_parse_from(args) {
        Ok(cli) => run(cli, &GeneratorConfig::default()).await,
        Err(e) => {
            let code = e.exit_code();
            let _ = e.print();
            code
        }
    }
}

/// Fetch, generate and write once. Returns the exit code.
pub async fn run(cli: Cli, config: &GeneratorConfig) -> i32 {
    match execute(cli.target.as_deref(), config).await {
        Ok(()) => {
            println!("Generated {}", config.output_path.display());
            0
        }
        Err(err) => {
            eprintln!("{err}");
            1
        }
    }
}

async fn execute(target: Option<&str>, config: &GeneratorConfig) -> Result<(), String> {
    let target = target.ok_or_else(|| MISSING_TARGET.to_string())?;
    debug!(%target, "Starting generation");
    let output = generate_from_url(target, config)
        .await
        .map_err(|err| err.to_string())?;
    write_output(&config.output_path, &output).map_err(|err| err.to_string())
}

/// Install the stderr subscriber.
///
/// `WSGEN_LOG` takes a plain level ("trace", "debug", "info", "warn", "error")
/// applied to the wsgen crates, or a full filter spec like
/// `wsgen_core=debug,reqwest=warn`.
pub fn init_tracing() {
    let filter = match std::env::var("WSGEN_LOG") {
        Ok(level) if is_plain_level(&level) => crate_filter(&level),
        Ok(spec) => spec,
        Err(_) => crate_filter("info"),
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(EnvFilter::new(filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn crate_filter(level: &str) -> String {
    format!("{}={level},wsgen_core={level}", module_path!())
}

fn is_plain_level(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    )
}
