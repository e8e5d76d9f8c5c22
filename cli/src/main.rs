/*!

This is the command line interface for synthesizing a vSphere VM fleet
specification. It loads the run parameters from the environment, resolves the
named inventory through `govc`, derives one instance specification per
requested index, and writes the complete resource graph as JSON for an
external plan/apply engine.

!*/

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Builder;
use fleet_synth::config::SynthConfig;
use fleet_synth::fleet::synthesize;
use fleet_synth::inventory::GovcResolver;
use log::{info, LevelFilter};
use std::fs::File;
use std::path::PathBuf;

/// Synthesize a declarative vSphere VM fleet specification.
#[derive(Debug, Parser)]
#[clap(author, version, about)]
struct Args {
    /// Set logging verbosity [trace|debug|info|warn|error]. If the environment variable `RUST_LOG`
    /// is present, it overrides the default logging behavior. See https://docs.rs/env_logger/latest
    #[clap(long = "log-level", default_value = "info")]
    log_level: LevelFilter,
    /// Where to write the serialized resource graph.
    #[clap(long = "output", default_value = "fleet.json")]
    output: PathBuf,
    /// Path to the SSH public key injected into each instance. Defaults to
    /// `.ssh/id_rsa.pub` under the invoking user's home directory.
    #[clap(long = "ssh-public-key")]
    ssh_public_key: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();
    init_logger(args.log_level);
    if let Err(e) = run(args) {
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config =
        SynthConfig::from_env().context("Unable to load configuration from environment")?;

    let key_path = match args.ssh_public_key {
        Some(path) => path,
        None => default_key_path()?,
    };
    let ssh_public_key = std::fs::read_to_string(&key_path)
        .with_context(|| format!("Unable to read SSH public key '{}'", key_path.display()))?
        .trim()
        .to_string();

    let resolver = GovcResolver::new(&config.credentials)?;
    let graph = synthesize(&config, &resolver, &ssh_public_key)?;

    let file = File::create(&args.output)
        .with_context(|| format!("Unable to create output file '{}'", args.output.display()))?;
    serde_json::to_writer_pretty(&file, &graph).context("Unable to serialize resource graph")?;
    info!(
        "Wrote {} instance specification(s) to '{}'",
        graph.fleet.instances.len(),
        args.output.display()
    );
    println!("synth complete");
    Ok(())
}

fn default_key_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set; pass --ssh-public-key")?;
    Ok(PathBuf::from(home).join(".ssh").join("id_rsa.pub"))
}

/// Initialize the logger with the value passed by `--log-level` (or its default) when the
/// `RUST_LOG` environment variable is not present. If present, the `RUST_LOG` environment variable
/// overrides `--log-level`/`level`.
fn init_logger(level: LevelFilter) {
    match std::env::var(env_logger::DEFAULT_FILTER_ENV).ok() {
        Some(_) => {
            // RUST_LOG exists; env_logger will use it.
            Builder::from_default_env().init();
        }
        None => {
            // RUST_LOG does not exist; set the level for our crates only.
            Builder::new()
                .filter(Some(env!("CARGO_CRATE_NAME")), level)
                .filter(Some("fleet_synth"), level)
                .init();
        }
    }
}
