//! `cairn`: loads content from the configured datapacks and reports what happened.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use cairn_content::Lifecycle;
use cairn_data::{DataSource, DirectorySource, EntryOutcome, LoadReport, Skipped};
use cairn_primitives::Priority;
use clap::{Parser, Subcommand};

mod config;
mod sources;

use config::{Config, ConfigOrigin};

#[derive(Parser, Debug)]
#[command(name = "cairn")]
#[command(about = "Load and check cairn content packs")]
struct Args {
	/// Config file (default: ./cairn.toml if present)
	#[arg(short, long, value_name = "PATH", global = true)]
	config: Option<PathBuf>,

	/// Verbose logging
	#[arg(short, long, global = true)]
	verbose: bool,

	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Load every configured pack and print the registries (default)
	Load,
	/// Validate one pack directory without loading it
	Check {
		#[arg(value_name = "PACK_DIR")]
		pack: PathBuf,
	},
}

fn main() -> anyhow::Result<ExitCode> {
	let args = Args::parse();
	let (config, origin) = Config::load(args.config.as_deref())?;

	setup_tracing(args.verbose, &config.log_level);
	match &origin {
		ConfigOrigin::File(path) => tracing::debug!(path = %path.display(), "cli.config.loaded"),
		ConfigOrigin::Defaults => tracing::debug!("cli.config.defaults"),
	}

	match args.command.unwrap_or(Command::Load) {
		Command::Load => load(&config),
		Command::Check { pack } => check(&pack),
	}
}

fn setup_tracing(verbose: bool, level: &str) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new("debug")
		} else {
			EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
		}
	});
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.init();
}

fn load(config: &Config) -> anyhow::Result<ExitCode> {
	let (manager, pack_failures) = sources::collect(config).context("failed to open the core pack")?;
	let lifecycle = Lifecycle::bootstrap(&[]).context("failed to set up registries")?;
	let mut report = lifecycle.load(&manager).context("failed to load content")?;
	if config.reload_on_start {
		report = lifecycle.reload(&manager).context("failed to reload content")?;
	}

	println!("sources:");
	for source in manager.sources() {
		let pack = source.datapack().map(ToString::to_string).unwrap_or_else(|| "-".to_owned());
		println!("  {:<24} priority {:>5}  {pack}", source.name(), source.priority());
	}
	for failure in &pack_failures {
		println!("  skipped: {failure}");
	}

	println!("registries:");
	for summary in lifecycle.summary() {
		println!(
			"  {:>2} {:<28} {:>5} entries  {}{}",
			summary.index,
			summary.key.to_string(),
			summary.len,
			if summary.frozen { "frozen" } else { "open" },
			if summary.reloadable { ", reloadable" } else { "" },
		);
	}

	for failure in &report.population.failures {
		println!("listener failed: {failure}");
	}
	print_load_report(&report.data);
	println!("{report}");
	Ok(ExitCode::SUCCESS)
}

fn print_load_report(report: &LoadReport) {
	for record in &report.entries {
		match &record.outcome {
			EntryOutcome::Loaded(_) => {}
			EntryOutcome::Rejected(error) => println!("rejected {} ({}): {error}", record.path, record.source),
			EntryOutcome::Failed(error) => println!("failed   {} ({}): {error}", record.path, record.source),
		}
	}
	for skipped in &report.skipped {
		match skipped {
			Skipped::UnknownType { path, type_name } => println!("skipped  {path}: unknown type {type_name:?}"),
			Skipped::UnknownIndexFile { path, file } => println!("skipped  {path}: no type claims {file:?}"),
			Skipped::Malformed(error) => println!("skipped  {error}"),
		}
	}
	for missing in report.missing() {
		println!("missing  {} listed in {} (expected {})", missing.id, missing.index, missing.path);
	}
}

fn check(pack: &Path) -> anyhow::Result<ExitCode> {
	let source = DirectorySource::datapack(pack, Priority::Normal)
		.with_context(|| format!("{} is not a valid pack", pack.display()))?;
	if let Some(meta) = source.datapack() {
		println!("{meta}");
		if !meta.description.is_empty() {
			println!("  {}", meta.description);
		}
		println!("  authors: {}", meta.authors.join(", "));
	}

	let source: Arc<dyn DataSource> = Arc::new(source);
	let scan = cairn_data::scan(&source);
	let mut kinds: BTreeMap<(String, String), usize> = BTreeMap::new();
	for entry in &scan.entries {
		let entry = entry.entry();
		let kind = if entry.is_namespace_level() {
			format!("<{}>", entry.filename())
		} else {
			entry.type_name().to_owned()
		};
		*kinds.entry((entry.namespace().to_owned(), kind)).or_default() += 1;
	}
	for ((namespace, kind), count) in &kinds {
		println!("  {namespace:<16} {kind:<24} {count:>5}");
	}
	for error in &scan.malformed {
		println!("  malformed: {error}");
	}

	Ok(if scan.malformed.is_empty() {
		ExitCode::SUCCESS
	} else {
		ExitCode::FAILURE
	})
}
