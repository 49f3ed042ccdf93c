//! Data entry paths.
//!
//! Entries live under `data/<namespace>/<type>/<key...>.<ext>`. A file directly under
//! the namespace (`data/<namespace>/<file>.<ext>`) is a namespace-level entry with an
//! empty type; these are the index files of indexed data types.

use std::io::Read;
use std::sync::Arc;

use cairn_primitives::{IdError, ResourceId};
use serde::de::DeserializeOwned;

use crate::error::DataError;
use crate::source::DataSource;

/// Root directory of every entry path.
pub const DATA_DIR: &str = "data/";

/// Extension of sidecar files that are never treated as entries.
pub const META_EXTENSION: &str = ".meta";

/// One content file, classified from its path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DataEntry {
	path: Arc<str>,
	namespace: Arc<str>,
	type_name: Arc<str>,
	key: Arc<str>,
	filename: Arc<str>,
}

impl DataEntry {
	/// Parses a source-relative path.
	///
	/// Backslashes are normalised and a leading `/` is ignored. The key is everything
	/// after the type segment minus the final extension; the filename is the last segment.
	pub fn parse(raw: &str) -> Result<Self, DataError> {
		let invalid = |reason| DataError::InvalidPath {
			path: raw.to_owned(),
			reason,
		};

		let normalized = raw.replace('\\', "/");
		let path = normalized.strip_prefix('/').unwrap_or(&normalized);
		let rest = path
			.strip_prefix(DATA_DIR)
			.ok_or_else(|| invalid("path must start with data/"))?;

		let (namespace, rest) = rest
			.split_once('/')
			.ok_or_else(|| invalid("missing namespace"))?;
		if namespace.is_empty() {
			return Err(invalid("empty namespace"));
		}

		let (type_name, key_with_ext) = match rest.split_once('/') {
			Some((type_name, key)) => (type_name, key),
			None => ("", rest),
		};
		if key_with_ext.is_empty() {
			return Err(invalid("missing key"));
		}

		let last_slash = key_with_ext.rfind('/');
		let filename = match last_slash {
			Some(at) => &key_with_ext[at + 1..],
			None => key_with_ext,
		};
		if filename.is_empty() {
			return Err(invalid("missing filename"));
		}
		let key = match key_with_ext.rfind('.') {
			Some(dot) if last_slash.is_none_or(|slash| dot > slash) => &key_with_ext[..dot],
			_ => key_with_ext,
		};

		Ok(Self {
			path: Arc::from(path),
			namespace: Arc::from(namespace),
			type_name: Arc::from(type_name),
			key: Arc::from(key),
			filename: Arc::from(filename),
		})
	}

	/// Normalised path, relative to the source root.
	pub fn path(&self) -> &str {
		&self.path
	}

	pub fn namespace(&self) -> &str {
		&self.namespace
	}

	/// Type segment; empty for namespace-level entries.
	pub fn type_name(&self) -> &str {
		&self.type_name
	}

	pub fn key(&self) -> &str {
		&self.key
	}

	pub fn filename(&self) -> &str {
		&self.filename
	}

	pub fn is_namespace_level(&self) -> bool {
		self.type_name.is_empty()
	}

	/// `namespace:key`.
	pub fn id(&self) -> Result<ResourceId, IdError> {
		ResourceId::new(&self.namespace, &self.key)
	}
}

/// Path of the per-entry file an indexed type looks up for `id`.
pub fn entry_path(id: &ResourceId, type_name: &str, extension: &str) -> String {
	format!("{DATA_DIR}{}/{type_name}/{}.{extension}", id.namespace(), id.name())
}

/// Whether a source file is considered for entry classification at all.
///
/// Directories never reach this point. Files outside `data/`, files shallower than
/// `data/<namespace>/<file>`, and `.meta` sidecars are ignored.
pub fn is_candidate_path(path: &str) -> bool {
	let path = path.strip_prefix('/').unwrap_or(path);
	path.starts_with(DATA_DIR) && path.split('/').count() >= 3 && !path.ends_with(META_EXTENSION)
}

/// A [`DataEntry`] paired with the source that can open it.
#[derive(Clone)]
pub struct SourcedEntry {
	entry: DataEntry,
	source: Arc<dyn DataSource>,
}

impl SourcedEntry {
	pub fn new(entry: DataEntry, source: Arc<dyn DataSource>) -> Self {
		Self { entry, source }
	}

	pub fn entry(&self) -> &DataEntry {
		&self.entry
	}

	pub fn path(&self) -> &str {
		self.entry.path()
	}

	pub fn source_name(&self) -> &str {
		self.source.name()
	}

	pub fn read_bytes(&self) -> Result<Vec<u8>, DataError> {
		let io_error = |source| DataError::Io {
			path: self.entry.path().to_owned(),
			source,
		};
		let mut reader = self.source.open(self.entry.path()).map_err(io_error)?;
		let mut bytes = Vec::new();
		reader.read_to_end(&mut bytes).map_err(io_error)?;
		Ok(bytes)
	}

	pub fn read_json<P: DeserializeOwned>(&self) -> Result<P, DataError> {
		let bytes = self.read_bytes()?;
		serde_json::from_slice(&bytes).map_err(|source| DataError::Json {
			path: self.entry.path().to_owned(),
			source,
		})
	}
}

impl std::fmt::Debug for SourcedEntry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SourcedEntry")
			.field("path", &self.entry.path())
			.field("source", &self.source.name())
			.finish()
	}
}
