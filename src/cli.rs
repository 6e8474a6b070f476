// src/cli.rs

//! CLI argument parsing using `clap`.

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};

use crate::dag::TargetCall;

/// Command-line arguments for `scriptdag`.
///
/// Options go before the target list; everything after the first target is
/// read as targets and their `-param value` pairs.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "scriptdag",
    version,
    about = "Run build targets declared in a script, in dependency order.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the build script (TOML).
    #[arg(
        long,
        value_name = "PATH",
        env = "SCRIPTDAG_SCRIPT",
        default_value = "Scriptdag.toml"
    )]
    pub script: String,

    /// Set a user property, e.g. `-D version=1.2`. Repeatable.
    #[arg(short = 'D', value_name = "KEY=VALUE", value_parser = parse_property)]
    pub define: Vec<(String, String)>,

    /// Print the documented targets and exit without running anything.
    #[arg(short = 'p', long)]
    pub projecthelp: bool,

    /// Resolve and print the execution order, but don't run any target.
    #[arg(long)]
    pub dry_run: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SCRIPTDAG_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Targets to run, each optionally followed by `-param value` pairs.
    #[arg(value_name = "TARGET", trailing_var_arg = true)]
    pub targets: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

fn parse_property(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{s}'")),
    }
}

/// Split the trailing arguments into target calls.
///
/// `compile -profile release package` gives two calls; the first carries
/// `profile = release`.
pub fn parse_target_calls(tokens: &[String]) -> Result<Vec<TargetCall>> {
    let mut calls: Vec<TargetCall> = Vec::new();
    let mut iter = tokens.iter();

    while let Some(token) = iter.next() {
        match token.strip_prefix('-').map(|t| t.trim_start_matches('-')) {
            Some(param) if !param.is_empty() => {
                let Some(call) = calls.last_mut() else {
                    bail!("parameter '{token}' given before any target");
                };
                let Some(value) = iter.next() else {
                    bail!("parameter '{token}' of target '{}' has no value", call.name);
                };
                call.args.insert(param.to_string(), value.clone());
            }
            _ => calls.push(TargetCall::new(token.clone())),
        }
    }

    Ok(calls)
}
