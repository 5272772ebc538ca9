//! Forklift CLI binary
//!
//! Thin command-line surface over the forklift-core primitives: fork + exec
//! + reap round trips from a shell, bare image replacement, and application
//! identity display.

use anyhow::Context;
use clap::{Parser, Subcommand};
use forklift_core::argv::ArgumentVector;
use forklift_core::commands::{create_child, format_reap};
use forklift_core::config::{load_app_info_from_toml_path, PlatformCapabilities};
use forklift_core::launch::{replace_image, Forked};
use forklift_core::wait::{reap, HangPolicy, ReapResult, TracePolicy, WaitRequest, WaitTarget};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

#[derive(Parser)]
#[command(name = "forklift")]
#[command(about = "Create, replace, and reap child processes")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log filter (RUST_LOG takes precedence)
    #[arg(long, default_value = "warn")]
    log: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Fork, exec the program in the child, and reap it
    Run {
        /// Program to execute (looked up in PATH)
        program: String,
        /// Arguments passed to the program
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Replace this process image with the program (does not return on success)
    Exec {
        /// Program to execute (looked up in PATH)
        program: String,
        /// Arguments passed to the program
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Print application identity from a TOML config
    Info {
        /// Path to the identity TOML file
        #[arg(long, value_name = "FILE")]
        config: PathBuf,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    forklift_core::utils::init_tracing(&cli.log).context("failed to initialize logging")?;

    match cli.command {
        Commands::Run { program, args } => run(&program, &args),
        Commands::Exec { program, args } => {
            let argv = ArgumentVector::new(&program, &args)?;
            // Only the failure path returns
            let err = match replace_image(&argv) {
                Err(e) => e,
                Ok(never) => match never {},
            };
            Err(err.into())
        }
        Commands::Info { config } => {
            let info = load_app_info_from_toml_path(&config)?;
            println!("name: {}", info.name);
            if let Some(long_name) = &info.long_name {
                println!("longName: {long_name}");
            }
            println!("version: {}", info.version);
            println!("patchLevel: {}", info.patch_level);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn run(program: &str, args: &[String]) -> anyhow::Result<ExitCode> {
    // Build the vector up front; the child side must go straight to exec
    let argv = ArgumentVector::new(program, args)?;

    match create_child()? {
        Forked::Child => {
            let err = match replace_image(&argv) {
                Err(e) => e,
                Ok(never) => match never {},
            };
            eprintln!("forklift: {err}");
            std::process::exit(127);
        }
        Forked::Parent { child } => {
            let request = WaitRequest {
                hang: HangPolicy::Block,
                trace: TracePolicy::IgnoreStopped,
                target: WaitTarget::Pid(child.as_raw()),
            };
            let outcome = reap(&request, &PlatformCapabilities::detect())?;
            if let Some(line) = format_reap(&outcome) {
                println!("{line}");
            }
            match outcome {
                ReapResult::Exited { code, .. } => {
                    Ok(ExitCode::from(u8::try_from(code).unwrap_or(1)))
                }
                other => {
                    error!("child did not exit normally: {:?}", other);
                    Ok(ExitCode::FAILURE)
                }
            }
        }
    }
}
