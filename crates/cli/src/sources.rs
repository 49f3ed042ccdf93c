//! Turns the config into data sources.

use std::path::Path;

use cairn_content::core_pack;
use cairn_data::{DataManager, DirectorySource, PackError};

use crate::config::Config;

/// Builds the manager for `config`: the core pack, every plugin pack, and every datapack
/// under the datapack directory.
///
/// A pack that fails to open is reported and left out; the others still load.
pub fn collect(config: &Config) -> Result<(DataManager, Vec<PackError>), PackError> {
	let mut manager = DataManager::new();
	let mut failures = Vec::new();
	manager.add_source(core_pack()?)?;

	for plugin in &config.plugins {
		let opened = DirectorySource::new(plugin.name.as_str(), &plugin.path, plugin.priority.value())
			.and_then(|source| manager.add_source(source));
		if let Err(error) = opened {
			tracing::warn!(plugin = %plugin.name, %error, "cli.plugin.skipped");
			failures.push(error);
		}
	}

	for dir in datapack_dirs(&config.datapacks.directory) {
		let opened = DirectorySource::datapack(&dir, config.datapacks.priority.value())
			.and_then(|source| manager.add_source(source));
		if let Err(error) = opened {
			tracing::warn!(pack = %dir.display(), %error, "cli.datapack.skipped");
			failures.push(error);
		}
	}

	Ok((manager, failures))
}

/// Every subdirectory, sorted by path. Ones without a descriptor fail in
/// [`DirectorySource::datapack`] and get reported.
fn datapack_dirs(root: &Path) -> Vec<std::path::PathBuf> {
	let entries = match std::fs::read_dir(root) {
		Ok(entries) => entries,
		Err(error) => {
			tracing::debug!(root = %root.display(), %error, "cli.datapacks.absent");
			return Vec::new();
		}
	};
	let mut dirs: Vec<_> = entries
		.filter_map(Result::ok)
		.map(|entry| entry.path())
		.filter(|path| path.is_dir())
		.collect();
	dirs.sort();
	dirs
}
