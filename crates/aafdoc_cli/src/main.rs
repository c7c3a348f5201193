#![allow(missing_docs)]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd;

#[derive(Parser)]
#[command(name = "aafdoc", about = "AAF/MXF inspection and linking tools")]
struct Cli {
	/// Log debug output to stderr.
	#[arg(short, long, global = true)]
	verbose: bool,
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Partition, operational pattern, primer, and object counts.
	Info(cmd::info::Args),
	/// Flat listing of decoded local sets.
	Objects(cmd::objects::Args),
	/// Strong-reference tree from the preface.
	Dump(cmd::dump::Args),
	/// Link packages into a fresh model and report the outcome.
	Link(cmd::link::Args),
}

fn main() {
	let cli = Cli::parse();
	init_tracing(cli.verbose);

	if let Err(err) = run(cli.command) {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn init_tracing(verbose: bool) {
	let filter = if verbose {
		EnvFilter::new("debug")
	} else {
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
	};
	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn run(command: Commands) -> aafdoc::aaf::Result<()> {
	match command {
		Commands::Info(args) => cmd::info::run(args),
		Commands::Objects(args) => cmd::objects::run(args),
		Commands::Dump(args) => cmd::dump::run(args),
		Commands::Link(args) => cmd::link::run(args),
	}
}
