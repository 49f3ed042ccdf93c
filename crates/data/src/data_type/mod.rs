//! Per-content-kind loading strategies.
//!
//! A [`DataType`] claims a type name (the `<type>` path segment) and turns entries of
//! that type into registry values. Indexed types instead claim a namespace-level index
//! file and pull their per-entry files on demand through [`LoadContext::open_entry`].

use cairn_primitives::{Priority, ResourceId};
use cairn_registry::RegistryLifecycle;
use rustc_hash::FxHashMap;

use crate::entry::{SourcedEntry, entry_path};
use crate::error::DataError;

mod indexed;
mod json;

pub use indexed::{IndexLoader, IndexedDataType, IndexedOutcome};
pub use json::JsonDataType;

/// Strategy that loads one kind of content into its target registry.
pub trait DataType: Send + Sync + 'static {
	/// Path segment this type claims (`data/<ns>/<type>/...`).
	fn type_name(&self) -> &str;

	/// Types with higher priority load first.
	fn priority(&self) -> i32 {
		Priority::Normal.value()
	}

	/// Namespace-level index file claimed by an indexed type.
	fn index_file(&self) -> Option<&str> {
		None
	}

	fn is_indexed(&self) -> bool {
		self.index_file().is_some()
	}

	/// Registry the loaded values land in.
	fn target(&self) -> &dyn RegistryLifecycle;

	/// Loads one entry. For indexed types `entry` is the index file.
	fn load(&self, entry: &SourcedEntry, ctx: &LoadContext<'_>) -> Result<Loaded, DataError>;
}

/// What a successful [`DataType::load`] produced.
#[derive(Debug)]
pub enum Loaded {
	Entry(ResourceId),
	/// Per-id outcomes of an index file, in index order.
	Index(Vec<IndexedOutcome>),
}

/// Per-entry files of indexed types, keyed by full path. The first (highest priority)
/// file parked under a path is the one served.
#[derive(Debug, Default)]
pub(crate) struct Parked {
	entries: FxHashMap<String, SourcedEntry>,
}

impl Parked {
	pub(crate) fn park(&mut self, entry: SourcedEntry) -> bool {
		match self.entries.entry(entry.path().to_owned()) {
			std::collections::hash_map::Entry::Occupied(_) => false,
			std::collections::hash_map::Entry::Vacant(slot) => {
				slot.insert(entry);
				true
			}
		}
	}

	pub(crate) fn len(&self) -> usize {
		self.entries.len()
	}

	fn get(&self, path: &str) -> Option<&SourcedEntry> {
		self.entries.get(path)
	}
}

/// Context handed to [`DataType::load`].
pub struct LoadContext<'a> {
	type_name: &'a str,
	parked: &'a Parked,
}

impl<'a> LoadContext<'a> {
	pub(crate) fn new(type_name: &'a str, parked: &'a Parked) -> Self {
		Self { type_name, parked }
	}

	/// Looks up `data/<id ns>/<type>/<id name>.<extension>` among the parked files.
	pub fn open_entry(&self, id: &ResourceId, extension: &str) -> Option<&'a SourcedEntry> {
		self.parked.get(&entry_path(id, self.type_name, extension))
	}

	/// Like [`LoadContext::open_entry`], failing with [`DataError::MissingEntry`].
	pub fn require_entry(&self, id: &ResourceId, extension: &str) -> Result<&'a SourcedEntry, DataError> {
		self.open_entry(id, extension).ok_or_else(|| DataError::MissingEntry {
			id: id.clone(),
			path: entry_path(id, self.type_name, extension),
		})
	}

	pub fn type_name(&self) -> &str {
		self.type_name
	}
}
