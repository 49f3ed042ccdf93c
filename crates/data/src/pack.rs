use std::io;

use serde::{Deserialize, Serialize};

use crate::error::PackError;

/// Descriptor file at the root of every datapack.
pub const PACK_DESCRIPTOR: &str = "pack.json";

/// Descriptor of vanilla datapacks, which are recognised only to be refused.
pub const LEGACY_DESCRIPTOR: &str = "pack.mcmeta";

/// Datapack metadata read from `pack.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackMeta {
	pub name: String,
	pub version: String,
	#[serde(default)]
	pub description: String,
	pub authors: Vec<String>,
}

impl PackMeta {
	pub fn from_slice(pack: &str, bytes: &[u8]) -> Result<Self, PackError> {
		serde_json::from_slice(bytes).map_err(|source| PackError::MalformedDescriptor {
			pack: pack.to_owned(),
			source,
		})
	}
}

impl std::fmt::Display for PackMeta {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{} {}", self.name, self.version)
	}
}

/// Loads the descriptor of `pack` through `read`, which returns `None` for absent files.
pub(crate) fn read_descriptor(
	pack: &str,
	read: impl Fn(&str) -> io::Result<Option<Vec<u8>>>,
) -> Result<PackMeta, PackError> {
	let io_error = |source| PackError::Io {
		pack: pack.to_owned(),
		source,
	};

	if let Some(bytes) = read(PACK_DESCRIPTOR).map_err(io_error)? {
		return PackMeta::from_slice(pack, &bytes);
	}
	if read(LEGACY_DESCRIPTOR).map_err(io_error)?.is_some() {
		return Err(PackError::LegacyDescriptor { pack: pack.to_owned() });
	}
	Err(PackError::MissingDescriptor { pack: pack.to_owned() })
}

#[cfg(test)]
mod tests;
