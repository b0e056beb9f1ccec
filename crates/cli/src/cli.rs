use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "prefs")]
#[command(about = "Inspect and edit persisted preferences")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Configuration file (defaults to the platform config directory)
	#[arg(short, long, value_name = "PATH")]
	pub config: Option<PathBuf>,

	/// Verbose logging
	#[arg(short, long)]
	pub verbose: bool,

	/// Subcommand to execute.
	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// List every declared preference with its current value
	List,
	/// Print the current value of one preference
	Get {
		/// Preference key.
		key: String,
	},
	/// Store a new value
	///
	/// Sets take comma-separated items; JSON preferences take JSON text.
	Set {
		/// Preference key.
		key: String,
		/// New value, parsed according to the preference's type.
		value: String,
	},
	/// Remove the stored value so the default applies again
	Reset {
		/// Preference key.
		key: String,
	},
}
