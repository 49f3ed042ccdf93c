use cairn_data::PackError;
use cairn_primitives::IdError;
use cairn_registry::{DirectoryError, RegistryError};

/// Configuration and state-misuse failures of the content lifecycle.
///
/// Entry-scoped load failures never show up here; they are recorded in the
/// [`cairn_data::LoadReport`].
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
	#[error(transparent)]
	Directory(#[from] DirectoryError),

	#[error(transparent)]
	Registry(#[from] RegistryError),

	#[error(transparent)]
	Id(#[from] IdError),

	#[error(transparent)]
	Pack(#[from] PackError),

	#[error("extension {extension} failed to set up: {source}")]
	Extension {
		extension: String,
		#[source]
		source: DirectoryError,
	},

	#[error("content is already loaded")]
	AlreadyLoaded,

	#[error("content must be loaded before it can be reloaded")]
	NotLoaded,
}
