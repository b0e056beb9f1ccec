//! `prefs` binary.
//!
//! Opens the configured store, builds a registry from the declared
//! preferences, and reads or writes them through the same bindings an
//! application would use.

mod cli;
mod parse;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use prefs_config::{PrefsConfig, StoreBackend};
use prefs_registry::Registry;
use tracing::info;

use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();

	setup_tracing(cli.verbose);

	let config = load_config(cli.config.as_deref())?;
	if config.store.backend == StoreBackend::Memory {
		tracing::warn!("memory backend configured, changes are discarded on exit");
	}

	let registry = config.build_registry().context("failed to build preference registry")?;
	registry.ready().await;
	info!(preferences = registry.len(), "registry ready");

	match cli.command {
		Command::List => list(&registry),
		Command::Get { key } => get(&registry, &key),
		Command::Set { key, value } => set(&registry, &key, &value).await,
		Command::Reset { key } => reset(&registry, &key).await,
	}
}

fn load_config(path: Option<&Path>) -> Result<PrefsConfig> {
	match path {
		Some(path) => PrefsConfig::load(path).with_context(|| format!("failed to load {}", path.display())),
		None => {
			let path: PathBuf = PrefsConfig::default_path().context("no configuration directory on this platform")?;
			Ok(PrefsConfig::load_or_default(&path)?)
		}
	}
}

fn list(registry: &Registry) -> Result<()> {
	if registry.is_empty() {
		println!("no preferences declared");
		return Ok(());
	}
	for key in registry.keys() {
		let binding = registry.dynamic(key)?;
		let current = binding.current_wire();
		let marker = if current == binding.default_wire() { "  # default" } else { "" };
		println!("{key} = {}{marker}", render(current));
	}
	Ok(())
}

fn get(registry: &Registry, key: &str) -> Result<()> {
	let binding = registry.dynamic(key)?;
	println!("{}", render(binding.current_wire()));
	Ok(())
}

async fn set(registry: &Registry, key: &str, text: &str) -> Result<()> {
	let binding = registry.dynamic(key)?;
	let wire = parse::parse_wire(binding.wire_kind(), text).with_context(|| format!("invalid value for '{key}'"))?;

	let mut failures = registry.write_failures();
	binding.update_wire(wire)?;
	registry.flush().await;

	if let Ok(failure) = failures.try_recv() {
		bail!("write to '{}' failed: {}", failure.key, failure.error);
	}
	info!(key, "preference updated");
	Ok(())
}

async fn reset(registry: &Registry, key: &str) -> Result<()> {
	let binding = registry.dynamic(key)?;

	let mut failures = registry.write_failures();
	binding.reset();
	registry.flush().await;

	if let Ok(failure) = failures.try_recv() {
		bail!("reset of '{}' failed: {}", failure.key, failure.error);
	}
	info!(key, "preference reset");
	Ok(())
}

fn render(value: Option<prefs_wire::WireValue>) -> String {
	value.map_or_else(|| "<unencodable>".to_string(), |v| v.to_string())
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_env("PREFS_LOG").unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new("prefs=debug,info")
		} else {
			EnvFilter::new("warn")
		}
	});

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(verbose)
		.init();
}
