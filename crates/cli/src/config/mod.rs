//! `cairn.toml`.
//!
//! Every field is optional. Relative paths are resolved against the directory holding
//! the config file.

use std::path::{Path, PathBuf};

use cairn_primitives::Priority;
use serde::Deserialize;

/// Read when `--config` is not given.
pub const DEFAULT_CONFIG: &str = "cairn.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("failed to read {}: {source}", path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("invalid config {}: {source}", path.display())]
	Parse {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("plugin pack {0:?} is declared twice")]
	DuplicatePlugin(String),
}

/// A priority given by name (`"high"`) or by value (`600`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PrioritySetting {
	Named(Priority),
	Value(i32),
}

impl PrioritySetting {
	pub fn value(self) -> i32 {
		match self {
			Self::Named(priority) => priority.value(),
			Self::Value(value) => value,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
	pub log_level: String,
	pub datapacks: DatapackConfig,
	pub plugins: Vec<PluginPack>,
	/// Runs one reload pass right after startup.
	pub reload_on_start: bool,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			log_level: "info".to_owned(),
			datapacks: DatapackConfig::default(),
			plugins: Vec::new(),
			reload_on_start: false,
		}
	}
}

/// External datapacks: every subdirectory of `directory` holding a `pack.json`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatapackConfig {
	pub directory: PathBuf,
	pub priority: PrioritySetting,
}

impl Default for DatapackConfig {
	fn default() -> Self {
		Self {
			directory: PathBuf::from("datapacks"),
			priority: PrioritySetting::Named(Priority::Low),
		}
	}
}

/// A directory standing in for one plugin's bundled pack.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PluginPack {
	pub name: String,
	pub path: PathBuf,
	#[serde(default = "normal")]
	pub priority: PrioritySetting,
}

fn normal() -> PrioritySetting {
	PrioritySetting::Named(Priority::Normal)
}

/// Where the config came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOrigin {
	File(PathBuf),
	/// The default file was absent; defaults apply.
	Defaults,
}

impl Config {
	pub fn parse(path: &Path, text: &str) -> Result<Self, ConfigError> {
		let mut config: Self = toml::from_str(text).map_err(|source| ConfigError::Parse {
			path: path.to_path_buf(),
			source,
		})?;
		for (index, plugin) in config.plugins.iter().enumerate() {
			if config.plugins[..index].iter().any(|other| other.name == plugin.name) {
				return Err(ConfigError::DuplicatePlugin(plugin.name.clone()));
			}
		}
		if let Some(base) = path.parent() {
			config.resolve_paths(base);
		}
		Ok(config)
	}

	/// Reads `explicit`, or [`DEFAULT_CONFIG`] if it exists. Only an explicit path must
	/// exist.
	pub fn load(explicit: Option<&Path>) -> Result<(Self, ConfigOrigin), ConfigError> {
		let path = match explicit {
			Some(path) => path.to_path_buf(),
			None => {
				let path = PathBuf::from(DEFAULT_CONFIG);
				if !path.exists() {
					return Ok((Self::default(), ConfigOrigin::Defaults));
				}
				path
			}
		};
		let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
			path: path.clone(),
			source,
		})?;
		Ok((Self::parse(&path, &text)?, ConfigOrigin::File(path)))
	}

	fn resolve_paths(&mut self, base: &Path) {
		self.datapacks.directory = base.join(&self.datapacks.directory);
		for plugin in &mut self.plugins {
			plugin.path = base.join(&plugin.path);
		}
	}
}

#[cfg(test)]
mod tests;
