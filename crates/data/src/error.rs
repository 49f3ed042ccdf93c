use std::io;

use cairn_primitives::{IdError, ResourceId};
use cairn_registry::RegistryError;

/// Failure scoped to one data entry. Logged, recorded in the load report, never fatal.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
	#[error("failed to read {path}: {source}")]
	Io {
		path: String,
		#[source]
		source: io::Error,
	},

	#[error("malformed JSON in {path}: {source}")]
	Json {
		path: String,
		#[source]
		source: serde_json::Error,
	},

	#[error("schema violation: {0}")]
	Schema(String),

	#[error(transparent)]
	Registry(#[from] RegistryError),

	#[error("no file for {id} at {path}")]
	MissingEntry { id: ResourceId, path: String },

	#[error("invalid data path {path:?}: {reason}")]
	InvalidPath { path: String, reason: &'static str },

	#[error(transparent)]
	InvalidId(#[from] IdError),

	#[error("data type implementation failed: {0}")]
	Extension(String),
}

impl DataError {
	/// Whether this is an identifier collision (a lower or equal priority duplicate).
	pub fn is_collision(&self) -> bool {
		matches!(
			self,
			Self::Registry(RegistryError::DuplicateKey { .. } | RegistryError::DuplicateValue { .. })
		)
	}

	pub(crate) fn schema(message: impl std::fmt::Display) -> Self {
		Self::Schema(message.to_string())
	}
}

/// Failure scoped to one datapack or source.
#[derive(Debug, thiserror::Error)]
pub enum PackError {
	#[error("pack {pack} has no pack.json descriptor")]
	MissingDescriptor { pack: String },

	#[error("pack {pack} only has a pack.mcmeta descriptor; vanilla datapacks are not supported")]
	LegacyDescriptor { pack: String },

	#[error("pack {pack} has a malformed descriptor: {source}")]
	MalformedDescriptor {
		pack: String,
		#[source]
		source: serde_json::Error,
	},

	#[error("failed to read pack {pack}: {source}")]
	Io {
		pack: String,
		#[source]
		source: io::Error,
	},

	#[error("failed to walk pack {pack}: {source}")]
	Walk {
		pack: String,
		#[source]
		source: ignore::Error,
	},

	#[error("a data source named {0:?} is already loaded")]
	DuplicateSource(String),
}

/// Conflicting data type declarations. Startup-fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeRegistryError {
	#[error("data type name {type_name:?} is already claimed by {existing}")]
	DuplicateType { type_name: String, existing: ResourceId },

	#[error("index file {file:?} is already claimed by {existing}")]
	DuplicateIndexFile { file: String, existing: ResourceId },

	#[error(transparent)]
	Registry(#[from] RegistryError),
}

/// Renders a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
	if let Some(message) = payload.downcast_ref::<&str>() {
		format!("panicked: {message}")
	} else if let Some(message) = payload.downcast_ref::<String>() {
		format!("panicked: {message}")
	} else {
		"panicked".to_owned()
	}
}
