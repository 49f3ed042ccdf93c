use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use cairn_primitives::ResourceId;
use cairn_registry::{Registry, RegistryLifecycle, RegistryValue};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;

use super::{DataType, LoadContext, Loaded};
use crate::entry::SourcedEntry;
use crate::error::{DataError, panic_message};

/// Builds one value per id listed in an index file.
pub trait IndexLoader: Send + Sync + 'static {
	type Value: ?Sized + RegistryValue;

	/// Per-id metadata carried by the index.
	type Meta: DeserializeOwned;

	/// Builds the value for `id`. Per-entry files are reached through
	/// [`LoadContext::open_entry`].
	fn load_entry(
		&self,
		id: &ResourceId,
		meta: Self::Meta,
		ctx: &LoadContext<'_>,
	) -> Result<Arc<Self::Value>, DataError>;
}

/// Outcome of one id listed in an index file.
#[derive(Debug)]
pub struct IndexedOutcome {
	/// Key as written in the index.
	pub key: String,
	pub result: Result<ResourceId, DataError>,
}

/// Data type driven by a namespace-level index file (`data/<ns>/<index_file>`).
///
/// The index is a JSON object mapping ids to metadata. Ids without a namespace take the
/// index file's namespace. Every id is loaded independently: an error or a panic in the
/// loader for one id does not affect the others.
pub struct IndexedDataType<L: IndexLoader> {
	type_name: String,
	index_file: String,
	priority: i32,
	registry: Arc<dyn Registry<L::Value>>,
	loader: L,
}

impl<L: IndexLoader> IndexedDataType<L> {
	pub fn new(
		type_name: impl Into<String>,
		index_file: impl Into<String>,
		registry: Arc<dyn Registry<L::Value>>,
		loader: L,
	) -> Self {
		Self {
			type_name: type_name.into(),
			index_file: index_file.into(),
			priority: cairn_primitives::Priority::Normal.value(),
			registry,
			loader,
		}
	}

	pub fn with_priority(mut self, priority: impl Into<i32>) -> Self {
		self.priority = priority.into();
		self
	}

	fn load_one(
		&self,
		entry: &SourcedEntry,
		key: &str,
		meta: serde_json::Value,
		ctx: &LoadContext<'_>,
	) -> Result<ResourceId, DataError> {
		let id = ResourceId::parse_with_default(key, entry.entry().namespace())?;
		let meta: L::Meta = serde_json::from_value(meta).map_err(|source| DataError::Json {
			path: format!("{}#{key}", entry.path()),
			source,
		})?;
		let value = self.loader.load_entry(&id, meta, ctx)?;
		self.registry.register(id.clone(), value)?;
		Ok(id)
	}
}

impl<L: IndexLoader> DataType for IndexedDataType<L> {
	fn type_name(&self) -> &str {
		&self.type_name
	}

	fn priority(&self) -> i32 {
		self.priority
	}

	fn index_file(&self) -> Option<&str> {
		Some(&self.index_file)
	}

	fn target(&self) -> &dyn RegistryLifecycle {
		&*self.registry
	}

	fn load(&self, entry: &SourcedEntry, ctx: &LoadContext<'_>) -> Result<Loaded, DataError> {
		let index: IndexMap<String, serde_json::Value> = entry.read_json()?;
		let outcomes = index
			.into_iter()
			.map(|(key, meta)| {
				let result = catch_unwind(AssertUnwindSafe(|| self.load_one(entry, &key, meta, ctx)))
					.unwrap_or_else(|payload| Err(DataError::Extension(panic_message(payload.as_ref()))));
				IndexedOutcome { key, result }
			})
			.collect();
		Ok(Loaded::Index(outcomes))
	}
}
